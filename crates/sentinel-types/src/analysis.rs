// SPDX-License-Identifier: MIT OR Apache-2.0
//! The top-level analysis result returned by every decode invocation.

use crate::effect::{Effect, SemanticSource};
use crate::severity::{HeaderSeverity, Severity, SubCallCategory};
use crate::trust::TrustContext;
use crate::{Operation, Selector};
use alloy_primitives::{Address, U256};
use sentinel_abi::AbiValue;
use serde::Serialize;

/// One decoded, named parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedParam {
    /// Parameter name (from the curated entry, ABI, or `param0`, `param1`…).
    pub name: String,
    /// Solidity type string.
    #[serde(rename = "type")]
    pub kind: String,
    /// Decoded value, full fidelity.
    pub value: AbiValue,
}

/// What kind of batch the outer call was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchType {
    /// Full MultiSend: DELEGATECALL sub-operations permitted.
    #[serde(rename = "MULTISEND")]
    MultiSend,
    /// MultiSendCallOnly: CALL sub-operations only.
    #[serde(rename = "MULTISEND_CALL_ONLY")]
    MultiSendCallOnly,
    /// The payload failed structural validation.
    #[serde(rename = "UNPARSEABLE_BATCH")]
    UnparseableBatch,
}

/// Aggregated sub-call buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchCounts {
    /// LOW/MEDIUM sub-calls.
    pub ok: usize,
    /// HIGH sub-calls.
    pub warn: usize,
    /// CRITICAL sub-calls.
    pub danger: usize,
    /// Unassessable sub-calls.
    pub unknown: usize,
}

impl BatchCounts {
    /// Add one categorized sub-call.
    pub fn record(&mut self, category: SubCallCategory) {
        match category {
            SubCallCategory::Ok => self.ok += 1,
            SubCallCategory::Warn => self.warn += 1,
            SubCallCategory::Danger => self.danger += 1,
            SubCallCategory::Unknown => self.unknown += 1,
        }
    }
}

/// One analyzed sub-call of a batch, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchCall {
    /// Position within the batch.
    pub index: usize,
    /// CALL or DELEGATECALL.
    pub operation: Operation,
    /// Sub-call target.
    pub to: Address,
    /// Wei attached to the sub-call.
    pub value: U256,
    /// Length of the inner calldata in bytes.
    pub data_len: usize,
    /// Severity bucket of the sub-analysis.
    pub category: SubCallCategory,
    /// The full recursive analysis of the inner call.
    pub analysis: Analysis,
}

/// Batch-level summary attached to the outer analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchInfo {
    /// What kind of batch this was.
    pub batch_type: BatchType,
    /// Sub-call analyses, in input order. Empty when unparseable.
    pub calls: Vec<BatchCall>,
    /// Bucketed counts over `calls`.
    pub counts: BatchCounts,
    /// `max` over sub-call severities (UNKNOWN outranks CRITICAL).
    pub overall_severity: Severity,
    /// Structural error when the batch was unparseable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw calldata retained for unparseable batches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_calldata: Option<String>,
}

/// The unified result of one decode invocation.
///
/// A decode never hard-fails past calldata validation: every other error
/// is carried inside this object (UNKNOWN severities, `decode_error`,
/// batch errors) so the caller always has something to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// The original calldata, lowercase hex.
    pub calldata: String,
    /// Extracted 4-byte selector.
    pub selector: Selector,
    /// Resolved canonical signature, when any source produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Bare function name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    /// Decoded named parameters, when a signature was available and decoding
    /// succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<DecodedParam>>,
    /// Curated description of the function, when in the verified registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// True only for curated registry hits.
    pub verified: bool,
    /// True when the signature came from a local ABI file.
    pub abi_verified: bool,
    /// True when semantics were supplied by a trust-profile label.
    pub trust_profile_verified: bool,
    /// All candidate signatures from the external lookup, most popular
    /// first. Present only for external resolutions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_matches: Option<Vec<String>>,
    /// Which source won the resolution cascade.
    pub source: SemanticSource,
    /// The semantic effect. Impact severity lives here.
    pub effect: Effect,
    /// Trust classification, present whenever a target address was known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_context: Option<TrustContext>,
    /// True when a loaded profile denied semantic interpretation.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub trust_blocked: bool,
    /// Trust-confidence severity. `None` when no profile was loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_severity: Option<HeaderSeverity>,
    /// Whether the analyzed operation was DELEGATECALL.
    pub is_delegatecall: bool,
    /// Whether the outer selector was a batch.
    pub is_batch: bool,
    /// Batch summary, when `is_batch`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchInfo>,
    /// Fatal parameter-decode error from a trusted signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
}

impl Analysis {
    /// A skeleton analysis for the given calldata with an uninterpreted
    /// effect; the orchestrator fills in the rest of the pipeline output.
    pub fn unresolved(calldata_hex: String, selector: Selector) -> Self {
        Self {
            calldata: calldata_hex,
            selector,
            signature: None,
            function_name: None,
            params: None,
            description: None,
            verified: false,
            abi_verified: false,
            trust_profile_verified: false,
            all_matches: None,
            source: SemanticSource::Unverified,
            effect: Effect::unknown(SemanticSource::Unverified),
            trust_context: None,
            trust_blocked: false,
            header_severity: None,
            is_delegatecall: false,
            is_batch: false,
            batch: None,
            decode_error: None,
        }
    }
}
