// SPDX-License-Identifier: MIT OR Apache-2.0
//! Normalized trust profile types and the case-insensitive queries the
//! classifier runs against them.
//!
//! All map keys are lowercase hex after normalization; queries lowercase
//! their inputs so callers never have to care.

use alloy_primitives::Address;
use schemars::JsonSchema;
use sentinel_types::{address_to_lower_hex, Selector, SelectorUsage, TrustLevel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// On-disk document shape (for schema emission and profile authoring)
// ---------------------------------------------------------------------------

/// The well-formed on-disk shape of a trust profile.
///
/// Loading goes through [`crate::validate::validate_and_normalize`], which
/// works on raw JSON so it can report granular shape violations; this type
/// exists for schema emission and for writing profiles programmatically.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrustProfileDocument {
    /// Document format version. Required.
    pub version: serde_json::Value,
    /// The owning multisig address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_address: Option<String>,
    /// Contracts the signer has vetted, keyed by address.
    pub trusted_contracts: BTreeMap<String, ContractDocument>,
    /// Token metadata, keyed by address. The only source of symbols.
    #[serde(default)]
    pub trusted_assets: BTreeMap<String, AssetDocument>,
    /// DELEGATECALL whitelist, keyed by address.
    #[serde(default)]
    pub trusted_delegate_calls: BTreeMap<String, DelegateCallDocument>,
    /// Execution history: address → selector → usage.
    #[serde(default)]
    pub selector_usage_history: BTreeMap<String, BTreeMap<String, UsageDocument>>,
}

/// One trusted contract in document form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractDocument {
    /// Display label.
    pub label: String,
    /// Trust tier: INTERNAL, PROTOCOL, PARTNER, or WATCHED.
    pub trust_level: String,
    /// `"*"` or an array of `0x`-prefixed 4-byte selectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_selectors: Option<serde_json::Value>,
    /// Per-selector labels.
    #[serde(default)]
    pub selector_labels: BTreeMap<String, String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Optional ABI file path, resolved under the ABI registry root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi_path: Option<String>,
}

/// One trusted asset in document form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetDocument {
    /// Token symbol, e.g. `WETH`.
    pub symbol: String,
    /// Full token name.
    pub name: String,
    /// Token decimals.
    pub decimals: u8,
}

/// One DELEGATECALL whitelist entry in document form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DelegateCallDocument {
    /// `"*"` or an array of `0x`-prefixed 4-byte selectors.
    pub allowed_selectors: serde_json::Value,
}

/// One usage-history entry in document form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageDocument {
    /// Times executed.
    pub count: u64,
    /// ISO-8601 timestamp of the most recent use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalized profile
// ---------------------------------------------------------------------------

/// `"*"` or an explicit selector set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllowedSelectors {
    /// Every selector is allowed.
    All,
    /// Only the listed selectors are allowed.
    List(BTreeSet<String>),
}

impl AllowedSelectors {
    /// Whether the given selector passes.
    pub fn permits(&self, selector: &Selector) -> bool {
        match self {
            Self::All => true,
            Self::List(set) => set.contains(&selector.to_hex()),
        }
    }

    /// Whether this is the wildcard.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// A vetted contract after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustedContract {
    /// Display label.
    pub label: String,
    /// Trust tier.
    pub trust_level: TrustLevel,
    /// Selector allowlist.
    pub allowed_selectors: AllowedSelectors,
    /// Per-selector labels, keyed by lowercase selector hex.
    pub selector_labels: BTreeMap<String, String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Optional ABI file path relative to the registry root.
    pub abi_path: Option<String>,
}

/// A vetted asset after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedAsset {
    /// Token symbol.
    pub symbol: String,
    /// Full token name.
    pub name: String,
    /// Token decimals.
    pub decimals: u8,
}

/// A DELEGATECALL whitelist entry after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegateCallAllowance {
    /// Selector allowlist for DELEGATECALL into this target.
    pub allowed_selectors: AllowedSelectors,
}

/// A normalized, immutable trust profile.
///
/// All address and selector keys are lowercase `0x`-hex. The decode
/// pipeline treats this object as read-only by contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustProfile {
    /// Document version, as text.
    pub version: String,
    /// The owning multisig, lowercase hex.
    pub safe_address: Option<String>,
    /// Vetted contracts keyed by lowercase address.
    pub trusted_contracts: BTreeMap<String, TrustedContract>,
    /// Vetted assets keyed by lowercase address.
    pub trusted_assets: BTreeMap<String, TrustedAsset>,
    /// DELEGATECALL whitelist keyed by lowercase address.
    pub trusted_delegate_calls: BTreeMap<String, DelegateCallAllowance>,
    /// Usage history: lowercase address → lowercase selector → usage.
    pub selector_usage_history: BTreeMap<String, BTreeMap<String, SelectorUsage>>,
}

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// Why a selector was or was not allowed on a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectorAllowReason {
    /// The contract itself is not in the profile.
    ContractNotTrusted,
    /// The contract allows every selector.
    AllSelectorsAllowed,
    /// The selector is explicitly whitelisted.
    SelectorWhitelisted,
    /// The selector is outside the contract's allowlist.
    SelectorNotAllowed,
}

/// Allow/deny decision for a (contract, selector) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorDecision {
    /// Whether the selector is allowed.
    pub allowed: bool,
    /// The rule that produced the decision.
    pub reason: SelectorAllowReason,
}

/// Why a DELEGATECALL was or was not whitelisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelegatecallAllowReason {
    /// The profile whitelists no DELEGATECALL targets at all.
    DelegatecallNotWhitelisted,
    /// The target is not in the DELEGATECALL whitelist.
    DelegatecallContractNotTrusted,
    /// The target is whitelisted but not for this selector.
    DelegatecallSelectorNotAllowed,
    /// The (target, selector) pair is whitelisted.
    DelegatecallWhitelisted,
}

impl DelegatecallAllowReason {
    /// The stable string tag, identical to the serde form.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::DelegatecallNotWhitelisted => "DELEGATECALL_NOT_WHITELISTED",
            Self::DelegatecallContractNotTrusted => "DELEGATECALL_CONTRACT_NOT_TRUSTED",
            Self::DelegatecallSelectorNotAllowed => "DELEGATECALL_SELECTOR_NOT_ALLOWED",
            Self::DelegatecallWhitelisted => "DELEGATECALL_WHITELISTED",
        }
    }
}

/// Allow/deny decision for a DELEGATECALL (target, selector) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatecallDecision {
    /// Whether the DELEGATECALL is whitelisted.
    pub allowed: bool,
    /// The rule that produced the decision.
    pub reason: DelegatecallAllowReason,
}

/// Which registry a label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelKind {
    /// `trustedContracts` entry.
    Contract,
    /// `trustedAssets` entry.
    Asset,
}

/// A resolved display label for an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressLabel {
    /// The label text.
    pub label: String,
    /// Where it came from. Contracts take precedence over assets.
    pub kind: LabelKind,
}

impl TrustProfile {
    /// The trusted-contract entry for an address, if any.
    pub fn trusted_contract(&self, addr: &Address) -> Option<&TrustedContract> {
        self.trusted_contracts.get(&address_to_lower_hex(addr))
    }

    /// Whether `selector` may be called on `addr`, with the deciding rule.
    pub fn is_selector_allowed(&self, addr: &Address, selector: &Selector) -> SelectorDecision {
        let Some(contract) = self.trusted_contract(addr) else {
            return SelectorDecision {
                allowed: false,
                reason: SelectorAllowReason::ContractNotTrusted,
            };
        };
        match &contract.allowed_selectors {
            AllowedSelectors::All => SelectorDecision {
                allowed: true,
                reason: SelectorAllowReason::AllSelectorsAllowed,
            },
            AllowedSelectors::List(set) => {
                if set.contains(&selector.to_hex()) {
                    SelectorDecision {
                        allowed: true,
                        reason: SelectorAllowReason::SelectorWhitelisted,
                    }
                } else {
                    SelectorDecision {
                        allowed: false,
                        reason: SelectorAllowReason::SelectorNotAllowed,
                    }
                }
            }
        }
    }

    /// Usage history for a (contract, selector) pair.
    pub fn selector_usage(&self, addr: &Address, selector: &Selector) -> Option<&SelectorUsage> {
        self.selector_usage_history
            .get(&address_to_lower_hex(addr))?
            .get(&selector.to_hex())
    }

    /// The profile's label for a selector on a contract.
    pub fn selector_label(&self, addr: &Address, selector: &Selector) -> Option<&str> {
        self.trusted_contract(addr)?
            .selector_labels
            .get(&selector.to_hex())
            .map(String::as_str)
    }

    /// The trusted-asset entry for an address, if any.
    pub fn trusted_asset(&self, addr: &Address) -> Option<&TrustedAsset> {
        self.trusted_assets.get(&address_to_lower_hex(addr))
    }

    /// Display label for an address; contracts take precedence over assets.
    pub fn address_label(&self, addr: &Address) -> Option<AddressLabel> {
        if let Some(contract) = self.trusted_contract(addr) {
            return Some(AddressLabel {
                label: contract.label.clone(),
                kind: LabelKind::Contract,
            });
        }
        self.trusted_asset(addr).map(|asset| AddressLabel {
            label: asset.symbol.clone(),
            kind: LabelKind::Asset,
        })
    }

    /// Whether a DELEGATECALL into `(addr, selector)` is whitelisted.
    pub fn is_delegatecall_allowed(
        &self,
        addr: &Address,
        selector: &Selector,
    ) -> DelegatecallDecision {
        if self.trusted_delegate_calls.is_empty() {
            return DelegatecallDecision {
                allowed: false,
                reason: DelegatecallAllowReason::DelegatecallNotWhitelisted,
            };
        }
        let Some(entry) = self.trusted_delegate_calls.get(&address_to_lower_hex(addr)) else {
            return DelegatecallDecision {
                allowed: false,
                reason: DelegatecallAllowReason::DelegatecallContractNotTrusted,
            };
        };
        if entry.allowed_selectors.permits(selector) {
            DelegatecallDecision {
                allowed: true,
                reason: DelegatecallAllowReason::DelegatecallWhitelisted,
            }
        } else {
            DelegatecallDecision {
                allowed: false,
                reason: DelegatecallAllowReason::DelegatecallSelectorNotAllowed,
            }
        }
    }
}
