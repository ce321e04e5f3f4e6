// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! sentinel-decode
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Safe `execTransaction` unwrapping.
pub mod exec;
/// The 4byte.directory client.
pub mod fourbyte;

pub use exec::{exec_transaction_selector, unwrap_exec_transaction, ExecUnwrapError, InnerCall};
pub use fourbyte::{FourByteClient, LookupError};

use alloy_primitives::Address;
use sentinel_abi::{decode_params, parse_signature, AbiValue};
use sentinel_effects::{
    analyze_effect, delegatecall_execution_effect, eth_transfer_effect, EffectInputs,
};
use sentinel_multisend::{parse_multisend, MultiSendKind, MULTISEND_SELECTOR};
use sentinel_profile::TrustProfile;
use sentinel_registry::{analyze_params, AbiFunction, AbiRegistry, SelectorRegistry};
use sentinel_trust::{batch_header_severity, can_interpret_selector, classify, header_severity};
use sentinel_types::{
    Analysis, BatchCall, BatchCounts, BatchInfo, BatchType, Calldata, CalldataError,
    ContractClassification, DecodedParam, DelegatecallClassification, EffectType, HeaderSeverity,
    Operation, Selector, SelectorClassification, SemanticSource, Severity, SubCallCategory,
    TrustContext,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Configuration of a [`Decoder`].
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    /// Chain directory name for ABI resolution. Defaults to `ethereum`.
    pub chain: Option<String>,
    /// Root of the ABI registry; `None` disables local-ABI resolution.
    pub abi_root: Option<PathBuf>,
    /// External signature lookup client; `None` keeps the decoder fully
    /// offline.
    pub fourbyte: Option<FourByteClient>,
}

/// One decode invocation's inputs.
#[derive(Debug, Clone, Copy)]
pub struct DecodeRequest<'a> {
    /// Hex calldata, `0x`-prefix optional.
    pub calldata: &'a str,
    /// Target contract, when known.
    pub to: Option<&'a Address>,
    /// CALL or DELEGATECALL.
    pub operation: Operation,
    /// Normalized trust profile, treated as immutable.
    pub profile: Option<&'a TrustProfile>,
    /// Load-failure summary when a profile was supplied but rejected.
    pub profile_error: Option<&'a str>,
}

impl<'a> DecodeRequest<'a> {
    /// A plain CALL with no target and no profile.
    pub fn new(calldata: &'a str) -> Self {
        Self {
            calldata,
            to: None,
            operation: Operation::Call,
            profile: None,
            profile_error: None,
        }
    }
}

/// The decode orchestrator. Owns the registries and the (optional)
/// external lookup client; holds no per-request state.
#[derive(Debug)]
pub struct Decoder {
    registry: SelectorRegistry,
    abis: Option<AbiRegistry>,
    fourbyte: Option<FourByteClient>,
    chain: String,
}

impl Decoder {
    /// Build a decoder from configuration.
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            registry: SelectorRegistry::new(),
            abis: config.abi_root.map(AbiRegistry::new),
            fourbyte: config.fourbyte,
            chain: config.chain.unwrap_or_else(|| "ethereum".to_string()),
        }
    }

    /// A fully offline decoder with no ABI root and no external lookup.
    pub fn offline() -> Self {
        Self::new(DecoderConfig::default())
    }

    /// Drop the ABI cache. Call when profiles or ABI files change on disk.
    pub fn clear_abi_cache(&self) {
        if let Some(abis) = &self.abis {
            abis.clear_cache();
        }
    }

    /// Decode with the external lookup permitted (suspends only there).
    ///
    /// The only hard error is malformed calldata; everything else is
    /// carried inside the returned analysis.
    pub async fn decode(&self, req: DecodeRequest<'_>) -> Result<Analysis, CalldataError> {
        let calldata = Calldata::parse(req.calldata)?;
        let selector = calldata.selector();

        let mut external = None;
        let unresolved_locally = selector != MULTISEND_SELECTOR
            && self.registry.lookup(&selector).is_none()
            && self.local_abi_function(&req, &selector).is_none();
        if unresolved_locally {
            if let Some(client) = &self.fourbyte {
                match client.lookup(&selector).await {
                    Ok(matches) if !matches.is_empty() => external = Some(matches),
                    Ok(_) => debug!(%selector, "external lookup returned no candidates"),
                    // Timeouts and transport failures degrade to an
                    // unresolved selector.
                    Err(e) => warn!(%selector, error = %e, "external lookup failed"),
                }
            }
        }

        Ok(self.analyze_parts(
            &calldata,
            req.to,
            req.operation,
            req.profile,
            req.profile_error,
            external,
        ))
    }

    /// Decode with no external lookups at all. Batch sub-calls always go
    /// through this path.
    pub fn decode_offline(&self, req: DecodeRequest<'_>) -> Result<Analysis, CalldataError> {
        let calldata = Calldata::parse(req.calldata)?;
        Ok(self.analyze_parts(
            &calldata,
            req.to,
            req.operation,
            req.profile,
            req.profile_error,
            None,
        ))
    }

    fn local_abi_function(
        &self,
        req: &DecodeRequest<'_>,
        selector: &Selector,
    ) -> Option<AbiFunction> {
        let abis = self.abis.as_ref()?;
        let to = req.to?;
        let declared_path = req
            .profile
            .and_then(|p| p.trusted_contract(to))
            .and_then(|c| c.abi_path.clone());
        let abi = abis.lookup(&self.chain, to, declared_path.as_deref())?;
        abi.function_by_selector(selector).cloned()
    }

    /// Steps 2–11 of the pipeline, fully synchronous.
    fn analyze_parts(
        &self,
        calldata: &Calldata,
        to: Option<&Address>,
        operation: Operation,
        profile: Option<&TrustProfile>,
        profile_error: Option<&str>,
        external: Option<Vec<String>>,
    ) -> Analysis {
        let selector = calldata.selector();
        if selector == MULTISEND_SELECTOR {
            return self.analyze_batch(calldata, to, operation, profile, profile_error);
        }

        let mut analysis = Analysis::unresolved(calldata.to_hex(), selector);
        analysis.is_delegatecall = operation == Operation::DelegateCall;

        // Resolution cascade: curated table → local ABI → external.
        let info = self.registry.lookup(&selector);
        let mut abi_fn = None;
        let mut signature: Option<String> = None;

        if let Some(info) = info {
            analysis.verified = true;
            analysis.source = SemanticSource::VerifiedDb;
            analysis.description = Some(info.description.to_string());
            analysis.function_name = Some(info.name.to_string());
            signature = Some(info.signature.to_string());
            debug!(%selector, signature = info.signature, "resolved from verified registry");
        } else if let (Some(to), Some(abis)) = (to, self.abis.as_ref()) {
            let declared_path = profile
                .and_then(|p| p.trusted_contract(to))
                .and_then(|c| c.abi_path.clone());
            if let Some(abi) = abis.lookup(&self.chain, to, declared_path.as_deref()) {
                if let Some(f) = abi.function_by_selector(&selector) {
                    analysis.abi_verified = true;
                    analysis.source = SemanticSource::LocalAbi;
                    analysis.function_name = Some(f.name.clone());
                    signature = Some(f.signature.clone());
                    abi_fn = Some(f.clone());
                    debug!(%selector, signature = %f.signature, "resolved from local ABI");
                }
            }
        }

        if signature.is_none() {
            if let Some(matches) = external {
                if let Some(first) = matches.first() {
                    analysis.source = SemanticSource::ExternalUnverified;
                    analysis.function_name = parse_signature(first)
                        .ok()
                        .map(|p| p.name);
                    signature = Some(first.clone());
                    analysis.all_matches = Some(matches);
                    debug!(%selector, "resolved from external lookup, unverified");
                }
            }
        }

        // Trust classification, whenever a target is known.
        let mut trust_ctx =
            to.map(|to| classify(profile, profile_error, to, &selector, operation));

        // Trust-profile label promotion. A label may supply semantics only
        // when nothing verified did, and an unverified external signature
        // survives only when its name matches the label case-insensitively
        // (a mismatched 4byte collision must not bootstrap parameter
        // decoding).
        let mut promoted_label: Option<String> = None;
        if let (Some(ctx), Some(profile), Some(to)) = (trust_ctx.as_ref(), profile, to) {
            if can_interpret_selector(ctx) && !analysis.verified && !analysis.abi_verified {
                if let Some(label) = profile.selector_label(to, &selector) {
                    promoted_label = Some(label.to_string());
                    analysis.trust_profile_verified = true;
                    analysis.source = SemanticSource::TrustProfile;
                    if analysis.all_matches.is_some() {
                        let name_matches = analysis
                            .function_name
                            .as_deref()
                            .is_some_and(|name| name.eq_ignore_ascii_case(label));
                        if !name_matches {
                            debug!(
                                %selector,
                                label,
                                "external signature name does not match profile label; \
                                 dropping the signature"
                            );
                            signature = None;
                        }
                    }
                    analysis.function_name = Some(label.to_string());
                }
            }
        }

        // Parameter decoding.
        let mut attrs = None;
        if let Some(sig) = &signature {
            match parse_signature(sig)
                .and_then(|parsed| {
                    decode_params(&parsed.inputs, calldata.params()).map(|v| (parsed, v))
                }) {
                Ok((parsed, values)) => {
                    attrs = info
                        .and_then(|i| i.analyzer)
                        .map(|a| analyze_params(a, &values));
                    analysis.params = Some(name_params(&parsed, &values, info, abi_fn.as_ref()));
                    analysis.signature = Some(sig.clone());
                }
                Err(e) => match analysis.source {
                    // A trusted signature that fails to decode is a real
                    // defect and is surfaced.
                    SemanticSource::VerifiedDb | SemanticSource::LocalAbi => {
                        warn!(%selector, error = %e, "trusted signature failed to decode");
                        analysis.decode_error = Some(e.to_string());
                    }
                    // An unverified signature that fails to decode is
                    // simply wrong; drop it.
                    _ => {
                        debug!(%selector, error = %e, "unverified signature dropped");
                        if !analysis.trust_profile_verified {
                            analysis.source = SemanticSource::Unverified;
                            analysis.function_name = None;
                        }
                    }
                },
            }
        }

        // Effect analysis.
        let effect_type = if analysis.verified {
            info.map(|i| i.effect_type).unwrap_or(EffectType::Unknown)
        } else if analysis.trust_profile_verified {
            EffectType::TrustProfileSemantic
        } else if analysis.abi_verified {
            EffectType::AbiVerified
        } else {
            EffectType::Unknown
        };
        let label = promoted_label
            .as_deref()
            .or(analysis.function_name.as_deref());
        analysis.effect = analyze_effect(&EffectInputs {
            effect_type,
            source: analysis.source,
            label,
            attrs: attrs.as_ref(),
            profile,
            target: to,
        });

        // Overrides and header severity.
        analysis.trust_blocked = trust_ctx
            .as_ref()
            .is_some_and(|ctx| ctx.profile_loaded && !can_interpret_selector(ctx));

        if operation == Operation::DelegateCall && !delegatecall_whitelisted(trust_ctx.as_ref()) {
            // Override 1: unwhitelisted DELEGATECALL trumps everything.
            analysis.effect =
                delegatecall_execution_effect(profile, to, analysis.source);
            analysis.header_severity = Some(HeaderSeverity::Critical);
            info!(%selector, "unwhitelisted DELEGATECALL, forced CRITICAL");
        } else {
            if analysis.trust_blocked {
                // Override 2: the gate rewrites severity, keeping the
                // original for display.
                analysis.effect.original_severity = Some(analysis.effect.severity);
                analysis.effect.severity = Severity::Unknown;
                analysis.effect.trust_override = true;
                debug!(%selector, "trust gate blocked interpretation");
            }
            analysis.header_severity = match trust_ctx.as_ref() {
                Some(ctx) => header_severity(ctx, operation),
                // No target at all: a DELEGATECALL can still never be
                // whitelisted.
                None if operation == Operation::DelegateCall => Some(HeaderSeverity::Critical),
                None => None,
            };
        }

        // Override 3: a local ABI independently verifies the function, so
        // first-use warnings are noise.
        if analysis.abi_verified {
            if let Some(ctx) = trust_ctx.as_mut() {
                ctx.warnings.retain(|w| !w.contains("first time"));
            }
        }

        analysis.trust_context = trust_ctx;
        analysis
    }

    /// Batch path: parse the packed payload and recurse offline over each
    /// sub-call, in input order.
    fn analyze_batch(
        &self,
        calldata: &Calldata,
        to: Option<&Address>,
        operation: Operation,
        profile: Option<&TrustProfile>,
        profile_error: Option<&str>,
    ) -> Analysis {
        let selector = calldata.selector();
        let mut analysis = Analysis::unresolved(calldata.to_hex(), selector);
        analysis.is_batch = true;
        analysis.is_delegatecall = operation == Operation::DelegateCall;

        let info = self
            .registry
            .lookup(&selector)
            .expect("multiSend is curated");
        analysis.verified = true;
        analysis.source = SemanticSource::VerifiedDb;
        analysis.description = Some(info.description.to_string());
        analysis.function_name = Some(info.name.to_string());
        analysis.signature = Some(info.signature.to_string());
        if let Ok(parsed) = parse_signature(info.signature) {
            if let Ok(values) = decode_params(&parsed.inputs, calldata.params()) {
                analysis.params = Some(name_params(&parsed, &values, Some(info), None));
            }
        }

        let trust_ctx =
            to.map(|to| classify(profile, profile_error, to, &selector, operation));
        let profile_loaded = profile.is_some();

        match parse_multisend(calldata.as_bytes(), to) {
            Ok(sub_calls) => {
                let batch_type = match to.and_then(|t| {
                    sentinel_multisend::known_deployments().kind_of(t)
                }) {
                    Some(MultiSendKind::CallOnly) => BatchType::MultiSendCallOnly,
                    _ => BatchType::MultiSend,
                };

                let mut calls = Vec::with_capacity(sub_calls.len());
                let mut counts = BatchCounts::default();
                let mut overall = Severity::Low;
                let mut summaries = Vec::with_capacity(sub_calls.len());

                for (index, sub) in sub_calls.into_iter().enumerate() {
                    let sub_analysis =
                        self.analyze_sub_call(&sub, profile, profile_error);
                    let severity = sub_analysis.effect.severity;
                    let category = SubCallCategory::from_severity(severity);
                    counts.record(category);
                    overall = overall.max(severity);
                    summaries.push(sub_call_summary(&sub_analysis, sub.operation));
                    calls.push(BatchCall {
                        index,
                        operation: sub.operation,
                        to: sub.to,
                        value: sub.value,
                        data_len: sub.data.len(),
                        category,
                        analysis: sub_analysis,
                    });
                }
                if calls.is_empty() {
                    overall = Severity::Unknown;
                }

                analysis.effect = analyze_effect(&EffectInputs {
                    effect_type: EffectType::BatchOperation,
                    source: SemanticSource::VerifiedDb,
                    label: Some(info.name),
                    attrs: None,
                    profile,
                    target: to,
                });
                analysis.effect.severity = overall;
                analysis.header_severity = batch_header_severity(profile_loaded, &summaries);
                analysis.batch = Some(BatchInfo {
                    batch_type,
                    calls,
                    counts,
                    overall_severity: overall,
                    error: None,
                    raw_calldata: None,
                });
                info!(
                    sub_calls = analysis.batch.as_ref().map(|b| b.calls.len()),
                    overall = %overall,
                    "batch analyzed"
                );
            }
            Err(e) => {
                // Failure policy: the batch is unparseable as a whole; the
                // outer decode still succeeds.
                warn!(error = %e, "batch failed to parse");
                analysis.effect = analyze_effect(&EffectInputs {
                    effect_type: EffectType::BatchOperation,
                    source: SemanticSource::VerifiedDb,
                    label: Some(info.name),
                    attrs: None,
                    profile,
                    target: to,
                });
                analysis.effect.severity = Severity::Unknown;
                analysis
                    .effect
                    .warnings
                    .push("The batch payload could not be parsed; nothing inside it can be verified"
                        .to_string());
                analysis.header_severity = batch_header_severity(profile_loaded, &[]);
                analysis.batch = Some(BatchInfo {
                    batch_type: BatchType::UnparseableBatch,
                    calls: Vec::new(),
                    counts: BatchCounts::default(),
                    overall_severity: Severity::Unknown,
                    error: Some(e.to_string()),
                    raw_calldata: Some(calldata.to_hex()),
                });
            }
        }

        // The DELEGATECALL override applies to the batch wrapper itself.
        if operation == Operation::DelegateCall && !delegatecall_whitelisted(trust_ctx.as_ref()) {
            analysis.effect = delegatecall_execution_effect(profile, to, analysis.source);
            analysis.header_severity = Some(HeaderSeverity::Critical);
        }

        analysis.trust_blocked = trust_ctx
            .as_ref()
            .is_some_and(|ctx| ctx.profile_loaded && !can_interpret_selector(ctx));
        analysis.trust_context = trust_ctx;
        analysis
    }

    fn analyze_sub_call(
        &self,
        sub: &sentinel_multisend::SubCall,
        profile: Option<&TrustProfile>,
        profile_error: Option<&str>,
    ) -> Analysis {
        if sub.data.is_empty() {
            // An empty payload is a plain ETH transfer.
            let selector = Selector([0, 0, 0, 0]);
            let mut analysis = Analysis::unresolved("0x".to_string(), selector);
            analysis.effect = eth_transfer_effect(profile, &sub.to, &sub.value);
            let ctx = classify(profile, profile_error, &sub.to, &selector, sub.operation);
            analysis.header_severity = header_severity(&ctx, sub.operation);
            analysis.trust_context = Some(ctx);
            analysis.is_delegatecall = sub.operation == Operation::DelegateCall;
            return analysis;
        }
        match Calldata::from_bytes(sub.data.clone()) {
            Ok(inner) => self.analyze_parts(
                &inner,
                Some(&sub.to),
                sub.operation,
                profile,
                profile_error,
                // Offline: no external lookups during batch expansion.
                None,
            ),
            Err(e) => {
                // 1–3 bytes of data: not even a selector.
                let mut analysis = Analysis::unresolved(
                    format!("0x{}", hex::encode(&sub.data)),
                    Selector([0, 0, 0, 0]),
                );
                analysis.decode_error = Some(e.to_string());
                analysis
            }
        }
    }
}

fn delegatecall_whitelisted(ctx: Option<&TrustContext>) -> bool {
    matches!(
        ctx.and_then(|c| c.delegatecall.as_ref())
            .map(|d| d.classification),
        Some(DelegatecallClassification::Trusted)
    )
}

fn sub_call_summary(
    analysis: &Analysis,
    operation: Operation,
) -> sentinel_trust::SubCallTrustSummary {
    let ctx = analysis.trust_context.as_ref();
    sentinel_trust::SubCallTrustSummary {
        is_delegatecall: operation == Operation::DelegateCall,
        trust_blocked: analysis.trust_blocked,
        contract_unknown: ctx.is_some_and(|c| c.contract == ContractClassification::Unknown),
        selector_not_allowed: ctx
            .is_some_and(|c| c.selector == SelectorClassification::NotAllowed),
        contract_trusted: ctx.is_some_and(|c| c.contract == ContractClassification::Trusted),
    }
}

/// Zip decoded values with the best available parameter names.
fn name_params(
    parsed: &sentinel_abi::ParsedSignature,
    values: &[AbiValue],
    info: Option<&sentinel_registry::SelectorInfo>,
    abi_fn: Option<&AbiFunction>,
) -> Vec<DecodedParam> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let name = info
                .and_then(|info| info.params.get(i).map(|n| n.to_string()))
                .or_else(|| {
                    abi_fn.and_then(|f| {
                        f.inputs
                            .get(i)
                            .filter(|p| !p.name.is_empty())
                            .map(|p| p.name.clone())
                    })
                })
                .unwrap_or_else(|| format!("param{i}"));
            let kind = parsed
                .inputs
                .get(i)
                .map(|t| t.canonical())
                .unwrap_or_default();
            DecodedParam {
                name,
                kind,
                value: value.clone(),
            }
        })
        .collect()
}
