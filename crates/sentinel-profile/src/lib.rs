// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! sentinel-profile
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Normalized profile types and queries.
pub mod model;
/// File and string loading with the error-carrier outcome.
pub mod store;
/// Shape validation and normalization of raw documents.
pub mod validate;

pub use model::{
    AddressLabel, AllowedSelectors, DelegateCallAllowance, DelegatecallAllowReason,
    DelegatecallDecision, LabelKind, SelectorAllowReason, SelectorDecision, TrustProfile,
    TrustProfileDocument, TrustedAsset, TrustedContract,
};
pub use store::{load_file, load_str, ProfileLoadOutcome};
pub use validate::{validate_and_normalize, ProfileValidationError};
