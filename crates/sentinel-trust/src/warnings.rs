// SPDX-License-Identifier: MIT OR Apache-2.0
//! The prescribed warning strings the classifier emits.
//!
//! These are part of the observable contract: tests and the ABI-verified
//! warning filter match on them, so changes here are breaking.

/// No profile was supplied or the supplied one failed validation.
pub const NO_PROFILE_LOADED: &str =
    "No trust profile is loaded; the contract and function cannot be verified";

/// The target contract is absent from the profile.
pub const CONTRACT_NOT_IN_PROFILE: &str =
    "Target contract is NOT in your Safe's trust profile";

/// Companion to [`CONTRACT_NOT_IN_PROFILE`]: names can be forged.
pub const DO_NOT_TRUST_FUNCTION_NAME: &str =
    "Do NOT trust the function name — anyone can register a misleading signature";

/// The target contract is listed as WATCHED.
pub const WATCHED_CONTRACT: &str =
    "Target contract is WATCHED: recognized in your trust profile but not approved for execution";

/// The selector is outside the contract's allowlist.
pub const SELECTOR_NOT_ALLOWED: &str =
    "This function is NOT on the allowlist for this contract";

/// The selector has no usage history with this contract.
pub const FIRST_TIME_WITH_CONTRACT: &str =
    "This is the first time using this function with this contract";

/// The selector has been used at most twice with this contract.
pub const RARELY_USED_WITH_CONTRACT: &str =
    "This function has rarely been used with this contract";

/// DELEGATECALL hands the target full authority over the wallet.
pub const DELEGATECALL_FULL_PERMISSIONS: &str =
    "DELEGATECALL executes external code with YOUR wallet's full permissions";

/// The DELEGATECALL (target, selector) pair is not whitelisted.
pub const DELEGATECALL_NOT_WHITELISTED: &str =
    "This DELEGATECALL target is not on your delegatecall whitelist";
