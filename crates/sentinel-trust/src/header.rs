// SPDX-License-Identifier: MIT OR Apache-2.0
//! Header-severity composition: the trust-confidence scale.
//!
//! Non-negotiable ordering: the DELEGATECALL rule fires before the
//! no-profile rule, so an unwhitelisted DELEGATECALL is CRITICAL even when
//! no profile is loaded at all.

use sentinel_types::{
    ContractClassification, DelegatecallClassification, HeaderSeverity, Operation,
    SelectorClassification, TrustContext,
};

/// Header severity for a single (non-batch) analysis.
pub fn header_severity(ctx: &TrustContext, operation: Operation) -> Option<HeaderSeverity> {
    if operation == Operation::DelegateCall {
        let whitelisted = matches!(
            ctx.delegatecall.as_ref().map(|d| d.classification),
            Some(DelegatecallClassification::Trusted)
        );
        if !whitelisted {
            return Some(HeaderSeverity::Critical);
        }
    }

    if !ctx.profile_loaded {
        return None;
    }

    if ctx.contract != ContractClassification::Trusted {
        return Some(HeaderSeverity::Unknown);
    }
    match ctx.selector {
        SelectorClassification::NotAllowed => Some(HeaderSeverity::Critical),
        SelectorClassification::NoContext => Some(HeaderSeverity::Unknown),
        SelectorClassification::Expected
        | SelectorClassification::Unusual
        | SelectorClassification::NeverUsed => Some(HeaderSeverity::Low),
    }
}

/// What the batch header rule needs to know about one sub-call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubCallTrustSummary {
    /// The sub-call was a DELEGATECALL.
    pub is_delegatecall: bool,
    /// The trust gate blocked interpretation of the sub-call.
    pub trust_blocked: bool,
    /// The sub-call target was not in the profile.
    pub contract_unknown: bool,
    /// The sub-call selector was outside the target's allowlist.
    pub selector_not_allowed: bool,
    /// The sub-call target was TRUSTED.
    pub contract_trusted: bool,
}

/// Header severity over a whole batch.
pub fn batch_header_severity(
    profile_loaded: bool,
    sub_calls: &[SubCallTrustSummary],
) -> Option<HeaderSeverity> {
    if !profile_loaded {
        return None;
    }
    if sub_calls.is_empty() {
        return Some(HeaderSeverity::Unknown);
    }
    let any_critical = sub_calls.iter().any(|s| {
        s.is_delegatecall || s.trust_blocked || s.contract_unknown || s.selector_not_allowed
    });
    if any_critical {
        return Some(HeaderSeverity::Critical);
    }
    if sub_calls.iter().all(|s| s.contract_trusted) {
        return Some(HeaderSeverity::Low);
    }
    Some(HeaderSeverity::Unknown)
}
