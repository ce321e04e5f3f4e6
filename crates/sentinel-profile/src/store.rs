// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loading profiles from disk or memory into the error-carrier outcome.
//!
//! A failed load never propagates as `Err`: the decode pipeline consumes
//! the outcome and proceeds as if no profile were supplied, recording the
//! failure in the result's trust context.

use crate::model::TrustProfile;
use crate::validate::{validate_and_normalize, ProfileValidationError};
use std::path::Path;
use tracing::{debug, warn};

/// The result of attempting to load a trust profile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLoadOutcome {
    /// The document validated; the normalized profile is ready for queries.
    Loaded(Box<TrustProfile>),
    /// The file could not be read or was not JSON.
    Unreadable {
        /// What went wrong, in prose.
        error: String,
    },
    /// The document parsed but failed shape validation.
    Invalid {
        /// Every violation found.
        errors: Vec<ProfileValidationError>,
    },
}

impl ProfileLoadOutcome {
    /// The profile, when loading succeeded.
    pub fn profile(&self) -> Option<&TrustProfile> {
        match self {
            Self::Loaded(p) => Some(p),
            _ => None,
        }
    }

    /// A one-line error summary for the trust context, when loading failed.
    pub fn error_summary(&self) -> Option<String> {
        match self {
            Self::Loaded(_) => None,
            Self::Unreadable { error } => Some(error.clone()),
            Self::Invalid { errors } => {
                let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
                Some(lines.join("; "))
            }
        }
    }
}

/// Load and validate a profile from a JSON string.
pub fn load_str(json: &str) -> ProfileLoadOutcome {
    let raw: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "trust profile is not valid JSON");
            return ProfileLoadOutcome::Unreadable {
                error: format!("profile is not valid JSON: {e}"),
            };
        }
    };
    match validate_and_normalize(&raw) {
        Ok(profile) => {
            debug!(
                contracts = profile.trusted_contracts.len(),
                assets = profile.trusted_assets.len(),
                delegatecall_targets = profile.trusted_delegate_calls.len(),
                "trust profile loaded"
            );
            ProfileLoadOutcome::Loaded(Box::new(profile))
        }
        Err(errors) => {
            warn!(violations = errors.len(), "trust profile failed validation");
            ProfileLoadOutcome::Invalid { errors }
        }
    }
}

/// Load and validate a profile from a file.
pub fn load_file(path: &Path) -> ProfileLoadOutcome {
    match std::fs::read_to_string(path) {
        Ok(contents) => load_str(&contents),
        Err(e) => ProfileLoadOutcome::Unreadable {
            error: format!("cannot read profile {}: {e}", path.display()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn valid_file_loads() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{ "version": "1", "trustedContracts": {{}} }}"#
        )
        .unwrap();
        let outcome = load_file(f.path());
        assert!(outcome.profile().is_some());
        assert!(outcome.error_summary().is_none());
    }

    #[test]
    fn missing_file_is_unreadable_not_a_panic() {
        let outcome = load_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(outcome, ProfileLoadOutcome::Unreadable { .. }));
        assert!(outcome.error_summary().unwrap().contains("cannot read"));
    }

    #[test]
    fn invalid_json_is_unreadable() {
        let outcome = load_str("{ not json");
        assert!(matches!(outcome, ProfileLoadOutcome::Unreadable { .. }));
    }

    #[test]
    fn shape_violations_become_invalid_with_summary() {
        let outcome = load_str(r#"{ "trustedContracts": {} }"#);
        match &outcome {
            ProfileLoadOutcome::Invalid { errors } => {
                assert_eq!(errors.len(), 1);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(outcome.error_summary().unwrap().contains("version"));
    }
}
