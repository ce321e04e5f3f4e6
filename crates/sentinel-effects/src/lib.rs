// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! sentinel-effects
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Address and amount display rules.
pub mod display;
/// Label-pattern severity heuristics.
pub mod heuristics;
/// Base severity/permanence per effect type.
pub mod taxonomy;

pub use heuristics::severity_from_label;
pub use taxonomy::base_profile;

use alloy_primitives::{Address, U256};
use display::{amount_phrase, human_party, technical_note, token_phrase, wei_phrase};
use sentinel_profile::TrustProfile;
use sentinel_registry::CallAttributes;
use sentinel_types::{Effect, EffectScope, EffectType, Permanence, SemanticSource, Severity};
use tracing::debug;

/// Everything the effect analyzer consumes for one call.
#[derive(Debug, Clone, Copy)]
pub struct EffectInputs<'a> {
    /// The effect-type tag chosen by the resolution cascade.
    pub effect_type: EffectType,
    /// Which source supplied the semantics.
    pub source: SemanticSource,
    /// Function name or promoted label, for the heuristic paths.
    pub label: Option<&'a str>,
    /// Attribute bag from the parameter analyzer, when one ran.
    pub attrs: Option<&'a CallAttributes>,
    /// The loaded trust profile, for labels and symbols.
    pub profile: Option<&'a TrustProfile>,
    /// The target contract.
    pub target: Option<&'a Address>,
}

/// Produce the semantic effect for a resolved call.
pub fn analyze_effect(inputs: &EffectInputs<'_>) -> Effect {
    let effect = match inputs.effect_type {
        EffectType::TrustProfileSemantic | EffectType::AbiVerified => heuristic_effect(inputs),
        EffectType::Unknown => unknown_effect(inputs),
        _ => taxonomy_effect(inputs),
    };
    debug!(
        effect_type = %effect.effect_type,
        severity = %effect.severity,
        "effect analyzed"
    );
    effect
}

/// The mandatory replacement effect for a DELEGATECALL whose (target,
/// selector) is not whitelisted. Severity is CRITICAL regardless of any
/// other signal.
pub fn delegatecall_execution_effect(
    profile: Option<&TrustProfile>,
    target: Option<&Address>,
    source: SemanticSource,
) -> Effect {
    let party = human_party(profile, target, "a target contract");
    let mut technical_notes = Vec::new();
    if let Some(target) = target {
        technical_notes.push(technical_note("Delegatecall target", target));
    }
    Effect {
        effect_type: EffectType::DelegatecallExecution,
        severity: Severity::Critical,
        permanence: Permanence::Immediate,
        scope: Some(EffectScope::Unlimited),
        beneficiary: target.copied(),
        summary: format!("Executes code from {party} with your wallet's full authority."),
        consequences: vec![
            "The target's code runs as if it were your wallet: it can move every asset and \
             rewrite wallet state"
                .to_string(),
            "Nothing limits what the executed code may do".to_string(),
        ],
        warnings: vec![
            "DELEGATECALL executes external code with YOUR wallet's full permissions".to_string(),
            "This target and function are not on your delegatecall whitelist".to_string(),
        ],
        mitigations: vec![
            "Reject unless the target is a contract you deliberately whitelisted for DELEGATECALL"
                .to_string(),
        ],
        technical_notes,
        source,
        trust_override: false,
        original_severity: None,
    }
}

/// The effect of a batch sub-call with empty calldata: a plain ETH
/// transfer.
pub fn eth_transfer_effect(
    profile: Option<&TrustProfile>,
    to: &Address,
    value: &U256,
) -> Effect {
    let recipient = human_party(profile, Some(to), "a recipient address");
    Effect {
        effect_type: EffectType::AssetTransfer,
        severity: Severity::Medium,
        permanence: Permanence::ImmediateIrreversible,
        scope: Some(EffectScope::Exact),
        beneficiary: Some(*to),
        summary: format!("Sends {} to {recipient}.", wei_phrase(value)),
        consequences: vec![format!(
            "{recipient} receives {}; the transfer cannot be undone",
            wei_phrase(value)
        )],
        warnings: Vec::new(),
        mitigations: Vec::new(),
        technical_notes: vec![technical_note("Recipient", to)],
        source: SemanticSource::VerifiedDb,
        trust_override: false,
        original_severity: None,
    }
}

fn unknown_effect(inputs: &EffectInputs<'_>) -> Effect {
    let mut effect = Effect::unknown(inputs.source);
    effect.warnings.push(
        "The function could not be verified against any trusted source".to_string(),
    );
    if let Some(target) = inputs.target {
        effect
            .technical_notes
            .push(technical_note("Target", target));
    }
    effect
}

/// Effects whose semantics come from a label (trust profile or local ABI):
/// severity is heuristic, permanence cannot be fixed ahead of time.
fn heuristic_effect(inputs: &EffectInputs<'_>) -> Effect {
    let label = inputs.label.unwrap_or("unknown");
    let severity = severity_from_label(label, inputs.profile.is_some());
    let party = human_party(inputs.profile, inputs.target, "a target contract");
    let (summary, consequence) = match inputs.effect_type {
        EffectType::TrustProfileSemantic => (
            format!("Calls \"{label}\" on {party}, as labelled in your trust profile."),
            format!(
                "Your trust profile recognizes this function as \"{label}\"; the label, not the \
                 wire data, is the basis of this interpretation"
            ),
        ),
        _ => (
            format!("Calls {label} on {party}, decoded through a local ABI."),
            format!(
                "A local ABI names this function \"{label}\"; the ABI was supplied for this \
                 contract, not fetched from a third party"
            ),
        ),
    };
    let mut technical_notes = Vec::new();
    if let Some(target) = inputs.target {
        technical_notes.push(technical_note("Target", target));
    }
    Effect {
        effect_type: inputs.effect_type,
        severity,
        permanence: Permanence::ContextDependent,
        scope: None,
        beneficiary: None,
        summary,
        consequences: vec![consequence],
        warnings: Vec::new(),
        mitigations: Vec::new(),
        technical_notes,
        source: inputs.source,
        trust_override: false,
        original_severity: None,
    }
}

fn taxonomy_effect(inputs: &EffectInputs<'_>) -> Effect {
    let attrs_default = CallAttributes::default();
    let attrs = inputs.attrs.unwrap_or(&attrs_default);

    // A zero-amount grant is a revocation, whatever the signature said.
    let effect_type = if inputs.effect_type == EffectType::PermissionGrant && attrs.is_revocation {
        EffectType::PermissionRevoke
    } else {
        inputs.effect_type
    };

    let (base_severity, permanence) = taxonomy::base_profile(effect_type);
    let severity = compose_severity(base_severity, permanence, attrs);

    let mut effect = Effect {
        effect_type,
        severity,
        permanence,
        scope: attrs.scope,
        beneficiary: attrs.beneficiary,
        summary: String::new(),
        consequences: Vec::new(),
        warnings: Vec::new(),
        mitigations: Vec::new(),
        technical_notes: Vec::new(),
        source: inputs.source,
        trust_override: false,
        original_severity: None,
    };
    describe(&mut effect, inputs, attrs);
    effect
}

/// Severity composition over the attribute bag.
///
/// Each elevation condition moves one level up, capped at CRITICAL; the
/// irreversibility elevation only applies when the taxonomy's permanence
/// does not already account for it. Delegatecall and autonomous-execution
/// grants force CRITICAL outright.
fn compose_severity(base: Severity, permanence: Permanence, attrs: &CallAttributes) -> Severity {
    if attrs.is_delegate_call || attrs.grants_autonomous_execution {
        return Severity::Critical;
    }
    let mut severity = base;
    if attrs.scope == Some(EffectScope::Unlimited) {
        severity = severity.elevated();
    }
    if attrs.irreversible && permanence != Permanence::ImmediateIrreversible {
        severity = severity.elevated();
    }
    if attrs.bypasses_signatures {
        severity = severity.elevated();
    }
    severity
}

/// Fill in summary, consequences, warnings, mitigations, and technical
/// notes per effect type, following the address-display contract.
fn describe(effect: &mut Effect, inputs: &EffectInputs<'_>, attrs: &CallAttributes) {
    let profile = inputs.profile;
    let target = inputs.target;

    match effect.effect_type {
        EffectType::PermissionGrant => {
            let spender = human_party(profile, attrs.beneficiary.as_ref(), "a spender address");
            let token = token_phrase(profile, target);
            let amount = attrs
                .amount
                .map(|a| amount_phrase(profile, target, &a))
                .unwrap_or_else(|| "an unspecified amount".to_string());
            effect.summary =
                format!("Grants {spender} a standing allowance over your {token}.");
            effect.consequences.push(format!(
                "{spender} can move up to {amount} of your {token} at any time, without further \
                 signatures"
            ));
            effect
                .consequences
                .push("The allowance stays active until you revoke it".to_string());
            if attrs.scope == Some(EffectScope::Unlimited) {
                effect
                    .warnings
                    .push("The allowance is effectively unlimited".to_string());
            }
            if attrs.bypasses_signatures {
                effect.warnings.push(
                    "The allowance is set from an off-chain signature; no prior transaction \
                     from the owner is needed"
                        .to_string(),
                );
            }
            effect.mitigations.push(
                "Revoke with a zero-amount approval when the allowance is no longer needed"
                    .to_string(),
            );
            effect
                .mitigations
                .push("Prefer bounded allowances sized to the immediate need".to_string());
        }
        EffectType::PermissionRevoke => {
            let spender = human_party(profile, attrs.beneficiary.as_ref(), "a spender address");
            effect.summary = format!("Revokes an allowance previously granted to {spender}.");
            effect
                .consequences
                .push(format!("{spender} immediately loses its allowance"));
        }
        EffectType::AssetTransfer => {
            let recipient =
                human_party(profile, attrs.beneficiary.as_ref(), "a recipient address");
            let token = token_phrase(profile, target);
            let amount = attrs
                .amount
                .map(|a| amount_phrase(profile, target, &a))
                .unwrap_or_else(|| token.clone());
            effect.summary = format!("Sends {amount} of your {token} to {recipient}.");
            effect
                .consequences
                .push(format!("{recipient} receives the assets"));
            effect
                .consequences
                .push("The transfer cannot be undone once executed".to_string());
            if let Some(id) = attrs.token_id {
                effect
                    .consequences
                    .push(format!("Token id {id} leaves the wallet"));
            }
        }
        EffectType::ControlTransfer => {
            match attrs.beneficiary {
                Some(_) => {
                    let new_owner =
                        human_party(profile, attrs.beneficiary.as_ref(), "a new owner address");
                    effect.summary = format!("Hands contract ownership to {new_owner}.");
                    effect.consequences.push(format!(
                        "{new_owner} gains every owner-only capability of this contract"
                    ));
                }
                None => {
                    effect.summary = "Renounces contract ownership forever.".to_string();
                    effect.consequences.push(
                        "No account will hold owner-only capabilities afterwards; this cannot \
                         be reversed"
                            .to_string(),
                    );
                }
            }
            effect
                .mitigations
                .push("Verify the succession plan before signing".to_string());
        }
        EffectType::UpgradeAuthority => {
            effect.summary =
                "Replaces the implementation behind this proxy contract.".to_string();
            effect.consequences.push(
                "Every function of the contract can behave differently after the upgrade"
                    .to_string(),
            );
            effect.consequences.push(
                "State and balances held by the proxy fall under the new implementation's \
                 control"
                    .to_string(),
            );
            effect
                .mitigations
                .push("Verify the new implementation's source and audit status".to_string());
        }
        EffectType::ExecutionGrant => {
            let party = human_party(profile, attrs.beneficiary.as_ref(), "an external party");
            effect.summary = format!("Grants {party} standing execution rights.");
            effect.consequences.push(format!(
                "{party} can execute on the wallet's behalf until the grant is revoked"
            ));
        }
        EffectType::BatchOperation => {
            effect.summary =
                "Executes multiple nested calls in one transaction.".to_string();
            effect.consequences.push(
                "Each nested call carries its own effect; the batch is only as safe as its \
                 most dangerous member"
                    .to_string(),
            );
            effect
                .mitigations
                .push("Review every nested call individually".to_string());
        }
        EffectType::SafeExecution => {
            effect.summary =
                "Executes an already-signed Safe transaction.".to_string();
            effect.consequences.push(
                "The inner call, not this wrapper, carries the real effect".to_string(),
            );
            if attrs.is_delegate_call {
                effect.warnings.push(
                    "The wrapped operation is a DELEGATECALL".to_string(),
                );
            }
        }
        EffectType::SafeModuleChange => {
            let module = human_party(profile, attrs.beneficiary.as_ref(), "a module");
            if attrs.is_revocation {
                effect.summary = format!("Disables {module} on this Safe.");
                effect
                    .consequences
                    .push(format!("{module} loses its execution rights immediately"));
            } else {
                effect.summary = format!("Enables {module} on this Safe.");
                effect.consequences.push(format!(
                    "{module} can execute transactions from this Safe WITHOUT owner signatures"
                ));
                effect
                    .consequences
                    .push("The module keeps that power until it is disabled".to_string());
                effect.mitigations.push(
                    "Only enable modules whose code you have verified and whose upgrade policy \
                     you control"
                        .to_string(),
                );
            }
        }
        EffectType::SafeModuleExecution => {
            let target_party = human_party(profile, attrs.beneficiary.as_ref(), "a target contract");
            effect.summary = format!(
                "Executes against {target_party} through a Safe module, outside the signature \
                 flow."
            );
            effect.consequences.push(
                "The call does not pass the owners' signature threshold".to_string(),
            );
        }
        EffectType::SafeOwnerChange => {
            let owner = human_party(profile, attrs.beneficiary.as_ref(), "an owner address");
            if attrs.is_revocation {
                effect.summary = format!("Removes {owner} from the Safe's owner set.");
            } else {
                effect.summary = format!("Changes the Safe's owner set to include {owner}.");
            }
            effect
                .consequences
                .push("Control of the Safe rests with the resulting owner set".to_string());
            if let Some(threshold) = attrs.new_threshold {
                effect.consequences.push(format!(
                    "The signature threshold becomes {threshold} after this change"
                ));
            }
        }
        EffectType::SafeThresholdChange => {
            let threshold = attrs
                .new_threshold
                .map(|t| t.to_string())
                .unwrap_or_else(|| "a new value".to_string());
            effect.summary =
                format!("Changes the Safe's signature threshold to {threshold}.");
            effect.consequences.push(format!(
                "Every future transaction needs {threshold} owner signature(s)"
            ));
            effect.warnings.push(
                "A threshold of 1 lets any single owner move everything".to_string(),
            );
        }
        EffectType::SafeFallbackChange => {
            let handler = human_party(profile, attrs.beneficiary.as_ref(), "a handler contract");
            effect.summary = format!("Sets {handler} as the Safe's fallback handler.");
            effect.consequences.push(format!(
                "{handler} answers every call the Safe does not recognize"
            ));
        }
        EffectType::SafeGuardChange => {
            let guard = human_party(profile, attrs.beneficiary.as_ref(), "a guard contract");
            effect.summary = format!("Installs {guard} as the Safe's transaction guard.");
            effect
                .consequences
                .push(format!("{guard} can veto every future Safe transaction"));
            effect.warnings.push(
                "A malicious or broken guard can permanently block the Safe".to_string(),
            );
        }
        // Handled by the dedicated constructors or earlier branches.
        _ => {
            effect.summary = "This call could not be interpreted.".to_string();
        }
    }

    // Technical section: full addresses, never truncated or labelled away.
    if let Some(target) = target {
        effect.technical_notes.push(technical_note("Target", target));
    }
    if let Some(beneficiary) = attrs.beneficiary {
        effect
            .technical_notes
            .push(technical_note("Counterparty", &beneficiary));
    }
    if let Some(amount) = attrs.amount {
        effect.technical_notes.push(format!("Raw amount: {amount}"));
    }
}
