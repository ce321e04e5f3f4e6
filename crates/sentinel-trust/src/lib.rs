// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! sentinel-trust
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Header-severity composition, single and batch.
pub mod header;
/// Prescribed warning strings.
pub mod warnings;

pub use header::{batch_header_severity, header_severity, SubCallTrustSummary};

use alloy_primitives::Address;
use sentinel_profile::TrustProfile;
use sentinel_types::{
    ContractClassification, DelegatecallClassification, DelegatecallContext, Operation, Selector,
    SelectorClassification, TrustContext, TrustLevel,
};
use tracing::debug;

/// Classify a (contract, selector, operation) triple against a profile.
///
/// `profile_error` carries the load-failure summary when a profile was
/// supplied but rejected; the classification then proceeds profile-less
/// with the error recorded in the context.
pub fn classify(
    profile: Option<&TrustProfile>,
    profile_error: Option<&str>,
    target: &Address,
    selector: &Selector,
    operation: Operation,
) -> TrustContext {
    let mut ctx = TrustContext::no_profile();
    ctx.profile_error = profile_error.map(String::from);

    let Some(profile) = profile else {
        ctx.warnings
            .push(warnings::NO_PROFILE_LOADED.to_string());
        if operation == Operation::DelegateCall {
            attach_unwhitelisted_delegatecall(&mut ctx);
        }
        return ctx;
    };

    ctx.profile_loaded = true;

    // Contract axis.
    match profile.trusted_contract(target) {
        None => {
            ctx.contract = ContractClassification::Unknown;
            ctx.warnings
                .push(warnings::CONTRACT_NOT_IN_PROFILE.to_string());
            ctx.warnings
                .push(warnings::DO_NOT_TRUST_FUNCTION_NAME.to_string());
        }
        Some(contract) => {
            ctx.trust_level = Some(contract.trust_level);
            ctx.contract_label = Some(contract.label.clone());
            if contract.trust_level == TrustLevel::Watched {
                ctx.contract = ContractClassification::Watched;
                ctx.warnings
                    .push(warnings::WATCHED_CONTRACT.to_string());
            } else {
                ctx.contract = ContractClassification::Trusted;
            }
        }
    }

    // Selector axis.
    if ctx.contract != ContractClassification::Trusted {
        ctx.selector = SelectorClassification::NoContext;
    } else {
        ctx.selector_label = profile
            .selector_label(target, selector)
            .map(String::from);
        let allowance = profile.is_selector_allowed(target, selector);
        if !allowance.allowed {
            ctx.selector = SelectorClassification::NotAllowed;
            ctx.warnings
                .push(warnings::SELECTOR_NOT_ALLOWED.to_string());
        } else {
            let usage = profile.selector_usage(target, selector).cloned();
            ctx.selector = match usage.as_ref().map(|u| u.count).unwrap_or(0) {
                0 => {
                    ctx.warnings
                        .push(warnings::FIRST_TIME_WITH_CONTRACT.to_string());
                    SelectorClassification::NeverUsed
                }
                count if count <= 2 => {
                    ctx.warnings
                        .push(warnings::RARELY_USED_WITH_CONTRACT.to_string());
                    SelectorClassification::Unusual
                }
                _ => SelectorClassification::Expected,
            };
            ctx.usage = usage;
        }
    }

    // DELEGATECALL axis.
    if operation == Operation::DelegateCall {
        let decision = profile.is_delegatecall_allowed(target, selector);
        ctx.warnings
            .push(warnings::DELEGATECALL_FULL_PERMISSIONS.to_string());
        if decision.allowed {
            ctx.delegatecall = Some(DelegatecallContext {
                classification: DelegatecallClassification::Trusted,
                reason: reason_tag(&decision.reason),
            });
        } else {
            ctx.warnings
                .push(warnings::DELEGATECALL_NOT_WHITELISTED.to_string());
            ctx.delegatecall = Some(DelegatecallContext {
                classification: DelegatecallClassification::NotTrusted,
                reason: reason_tag(&decision.reason),
            });
        }
    }

    debug!(
        contract = ?ctx.contract,
        selector = ?ctx.selector,
        delegatecall = ?ctx.delegatecall.as_ref().map(|d| d.classification),
        "trust classification"
    );
    ctx
}

fn reason_tag(reason: &sentinel_profile::DelegatecallAllowReason) -> String {
    reason.tag().to_string()
}

fn attach_unwhitelisted_delegatecall(ctx: &mut TrustContext) {
    ctx.warnings
        .push(warnings::DELEGATECALL_FULL_PERMISSIONS.to_string());
    ctx.warnings
        .push(warnings::DELEGATECALL_NOT_WHITELISTED.to_string());
    ctx.delegatecall = Some(DelegatecallContext {
        classification: DelegatecallClassification::NotTrusted,
        reason: "DELEGATECALL_NOT_WHITELISTED".to_string(),
    });
}

/// The gate: may downstream analysis use the profile's labels as a
/// semantic source?
///
/// True iff a profile is loaded, the contract is TRUSTED, and the selector
/// classification is one of EXPECTED / UNUSUAL / NEVER_USED.
pub fn can_interpret_selector(ctx: &TrustContext) -> bool {
    ctx.profile_loaded
        && ctx.contract == ContractClassification::Trusted
        && matches!(
            ctx.selector,
            SelectorClassification::Expected
                | SelectorClassification::Unusual
                | SelectorClassification::NeverUsed
        )
}
