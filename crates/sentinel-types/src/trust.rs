// SPDX-License-Identifier: MIT OR Apache-2.0
//! Trust classification outputs: what the profile says about the target
//! contract, the selector, and (for DELEGATECALL) the whitelist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared trust tier of a contract in the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustLevel {
    /// Operated by the signer's own organisation.
    Internal,
    /// A protocol the organisation integrates with.
    Protocol,
    /// A counterparty contract.
    Partner,
    /// Recognized but not approved for execution semantics.
    Watched,
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Internal => "INTERNAL",
            Self::Protocol => "PROTOCOL",
            Self::Partner => "PARTNER",
            Self::Watched => "WATCHED",
        };
        f.write_str(s)
    }
}

impl TrustLevel {
    /// Parse the profile-document string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INTERNAL" => Some(Self::Internal),
            "PROTOCOL" => Some(Self::Protocol),
            "PARTNER" => Some(Self::Partner),
            "WATCHED" => Some(Self::Watched),
            _ => None,
        }
    }
}

/// Contract-axis classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractClassification {
    /// Listed with a non-WATCHED trust level.
    Trusted,
    /// Listed as WATCHED: recognized, semantics disabled.
    Watched,
    /// Not listed, or no profile loaded.
    Unknown,
}

/// Selector-axis classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectorClassification {
    /// Allowed and used more than twice before.
    Expected,
    /// Allowed but used at most twice.
    Unusual,
    /// Allowed but never seen before.
    NeverUsed,
    /// Explicitly outside the contract's allowlist.
    NotAllowed,
    /// No basis to classify (unknown or watched contract).
    NoContext,
}

/// DELEGATECALL-axis classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelegatecallClassification {
    /// The (target, selector) pair is whitelisted for DELEGATECALL.
    Trusted,
    /// Not whitelisted.
    NotTrusted,
}

/// Usage history for one (contract, selector) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorUsage {
    /// Times this selector has been executed against this contract.
    pub count: u64,
    /// Timestamp of the most recent use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

/// DELEGATECALL context attached when the operation is DELEGATECALL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatecallContext {
    /// Whitelist decision.
    pub classification: DelegatecallClassification,
    /// Stable reason tag from the profile query.
    pub reason: String,
}

/// The trust classifier's full output for one (contract, selector,
/// operation) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustContext {
    /// Whether a valid profile was available.
    pub profile_loaded: bool,
    /// Validation error summary when a profile was supplied but rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_error: Option<String>,
    /// Contract-axis result.
    pub contract: ContractClassification,
    /// Selector-axis result.
    pub selector: SelectorClassification,
    /// The contract's declared tier, when listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_level: Option<TrustLevel>,
    /// Label for the contract from the profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_label: Option<String>,
    /// Label for the selector from the profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector_label: Option<String>,
    /// Usage history, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<SelectorUsage>,
    /// Human-readable warnings accumulated during classification.
    pub warnings: Vec<String>,
    /// DELEGATECALL whitelist result, only for DELEGATECALL operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegatecall: Option<DelegatecallContext>,
}

impl TrustContext {
    /// A context for runs with no profile at all.
    pub fn no_profile() -> Self {
        Self {
            profile_loaded: false,
            profile_error: None,
            contract: ContractClassification::Unknown,
            selector: SelectorClassification::NoContext,
            trust_level: None,
            contract_label: None,
            selector_label: None,
            usage: None,
            warnings: Vec::new(),
            delegatecall: None,
        }
    }
}
