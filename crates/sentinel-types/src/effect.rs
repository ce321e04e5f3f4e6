// SPDX-License-Identifier: MIT OR Apache-2.0
//! Semantic effects: what signing the call would actually do.

use crate::severity::Severity;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed taxonomy of semantic effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    /// Grants a standing permission (e.g. ERC-20 approve, operator grant).
    PermissionGrant,
    /// Revokes a previously granted permission.
    PermissionRevoke,
    /// Moves an asset out of the wallet.
    AssetTransfer,
    /// Transfers or renounces contract ownership.
    ControlTransfer,
    /// Changes the implementation behind a proxy.
    UpgradeAuthority,
    /// Grants an external party the right to execute on the wallet's behalf.
    ExecutionGrant,
    /// A multicall-style batch wrapper.
    BatchOperation,
    /// Safe `execTransaction` execution.
    SafeExecution,
    /// Enables or disables a Safe module.
    SafeModuleChange,
    /// Execution routed through an enabled Safe module.
    SafeModuleExecution,
    /// Adds, removes, or swaps a Safe owner.
    SafeOwnerChange,
    /// Changes the Safe signature threshold.
    SafeThresholdChange,
    /// Changes the Safe fallback handler.
    SafeFallbackChange,
    /// Changes the Safe transaction guard.
    SafeGuardChange,
    /// DELEGATECALL into external code.
    DelegatecallExecution,
    /// Semantics supplied by a trust-profile label.
    TrustProfileSemantic,
    /// Semantics supplied by a local ABI (named function, no curated entry).
    AbiVerified,
    /// No semantic information available.
    Unknown,
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The serde tag is the display form.
        let tag = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(tag.trim_matches('"'))
    }
}

/// How long the effect lasts once the transaction executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permanence {
    /// Takes effect once and is done.
    Immediate,
    /// Takes effect once and cannot be undone.
    ImmediateIrreversible,
    /// Standing change with no built-in undo.
    Permanent,
    /// Standing change until explicitly revoked.
    PermanentUntilRevoked,
    /// Standing change until explicitly changed again.
    PermanentUntilChanged,
    /// Depends on the batch contents.
    Varies,
    /// Depends on label semantics.
    ContextDependent,
    /// Unassessable.
    Unknown,
}

/// Whether an effect is bounded or open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectScope {
    /// Bounded to a concrete amount or item.
    Exact,
    /// Open-ended (max approval, operator over a whole collection).
    Unlimited,
    /// Unassessable.
    Unknown,
}

/// Where the semantic interpretation came from. Trust decreases downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticSource {
    /// The curated in-memory registry.
    VerifiedDb,
    /// A local ABI file for the target contract.
    LocalAbi,
    /// A trust-profile selector label.
    TrustProfile,
    /// An external signature database; never authoritative.
    ExternalUnverified,
    /// Nothing resolved.
    Unverified,
}

/// The semantic consequence of signing the decoded call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effect {
    /// Taxonomy tag.
    pub effect_type: EffectType,
    /// Impact-based severity. Always present, independent of the header.
    pub severity: Severity,
    /// How long the effect lasts.
    pub permanence: Permanence,
    /// Bounded or open-ended, when the distinction applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<EffectScope>,
    /// The address that gains power or assets, when identified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<Address>,
    /// One-line human summary. Follows the address-display contract:
    /// labels or generic nouns only, never raw addresses.
    pub summary: String,
    /// Ordered plain-English consequences (human display rules).
    pub consequences: Vec<String>,
    /// Risk warnings attached to the effect itself.
    pub warnings: Vec<String>,
    /// Actions that would reduce the risk.
    pub mitigations: Vec<String>,
    /// Technical statements with full addresses, never truncated.
    pub technical_notes: Vec<String>,
    /// Where the interpretation came from.
    pub source: SemanticSource,
    /// Set when the trust gate rewrote the severity to UNKNOWN.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub trust_override: bool,
    /// The impact severity before a trust override rewrote it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_severity: Option<Severity>,
}

impl Effect {
    /// An effect carrying no semantic information.
    pub fn unknown(source: SemanticSource) -> Self {
        Self {
            effect_type: EffectType::Unknown,
            severity: Severity::Unknown,
            permanence: Permanence::Unknown,
            scope: None,
            beneficiary: None,
            summary: "This call could not be interpreted.".to_string(),
            consequences: Vec::new(),
            warnings: Vec::new(),
            mitigations: Vec::new(),
            technical_notes: Vec::new(),
            source,
            trust_override: false,
            original_severity: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_type_tags_match_the_taxonomy() {
        assert_eq!(EffectType::PermissionGrant.to_string(), "PERMISSION_GRANT");
        assert_eq!(
            EffectType::DelegatecallExecution.to_string(),
            "DELEGATECALL_EXECUTION"
        );
        assert_eq!(
            EffectType::TrustProfileSemantic.to_string(),
            "TRUST_PROFILE_SEMANTIC"
        );
        assert_eq!(EffectType::AbiVerified.to_string(), "ABI_VERIFIED");
        assert_eq!(EffectType::SafeOwnerChange.to_string(), "SAFE_OWNER_CHANGE");
    }

    #[test]
    fn source_tags() {
        assert_eq!(
            serde_json::to_string(&SemanticSource::VerifiedDb).unwrap(),
            "\"VERIFIED_DB\""
        );
        assert_eq!(
            serde_json::to_string(&SemanticSource::ExternalUnverified).unwrap(),
            "\"EXTERNAL_UNVERIFIED\""
        );
    }

    #[test]
    fn unknown_effect_is_inert() {
        let e = Effect::unknown(SemanticSource::Unverified);
        assert_eq!(e.effect_type, EffectType::Unknown);
        assert_eq!(e.severity, Severity::Unknown);
        assert!(!e.trust_override);
        let json = serde_json::to_value(&e).unwrap();
        // Override flags stay off the wire until set.
        assert!(json.get("trust_override").is_none());
        assert!(json.get("original_severity").is_none());
    }
}
