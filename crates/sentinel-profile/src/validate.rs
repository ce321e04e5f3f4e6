// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shape validation and normalization of raw profile documents.
//!
//! Validation works on raw JSON rather than typed serde structs so every
//! violation is reported with its path, not just the first parse failure.
//! Normalization happens in the same pass: all address and selector keys
//! come out lowercase, so downstream queries never re-normalize.

use crate::model::{
    AllowedSelectors, DelegateCallAllowance, TrustProfile, TrustedAsset, TrustedContract,
};
use chrono::{DateTime, Utc};
use sentinel_types::{SelectorUsage, TrustLevel};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One shape violation in a profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum ProfileValidationError {
    /// The `version` field is absent.
    #[error("profile is missing the `version` field")]
    MissingVersion,

    /// `trustedContracts` is absent.
    #[error("profile is missing `trustedContracts`")]
    MissingTrustedContracts,

    /// A field has the wrong JSON type.
    #[error("`{field}` must be {expected}")]
    WrongType {
        /// Path of the offending field.
        field: String,
        /// What was expected, in prose.
        expected: String,
    },

    /// An address key or value does not match `^0x[0-9a-fA-F]{40}$`.
    #[error("`{field}`: `{value}` is not a valid contract address")]
    InvalidAddress {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// A trust level is outside {INTERNAL, PROTOCOL, PARTNER, WATCHED}.
    #[error("`{address}`: `{value}` is not a valid trust level")]
    InvalidTrustLevel {
        /// The contract whose entry is invalid.
        address: String,
        /// The rejected value.
        value: String,
    },

    /// `allowedSelectors` is neither `"*"` nor an array.
    #[error("`{field}.allowedSelectors` must be \"*\" or an array of selectors")]
    InvalidAllowedSelectors {
        /// Path of the offending entry.
        field: String,
    },

    /// A selector does not match `^0x[0-9a-fA-F]{8}$`.
    #[error("`{field}`: `{value}` is not a valid 4-byte selector")]
    InvalidSelector {
        /// Path of the offending field.
        field: String,
        /// The rejected value.
        value: String,
    },
}

fn is_hex_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn is_hex_selector(s: &str) -> bool {
    s.len() == 10
        && s.starts_with("0x")
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validate a raw JSON document and produce the normalized profile, or
/// every violation found.
pub fn validate_and_normalize(raw: &Value) -> Result<TrustProfile, Vec<ProfileValidationError>> {
    let mut errors = Vec::new();

    let Some(obj) = raw.as_object() else {
        return Err(vec![ProfileValidationError::WrongType {
            field: "profile".into(),
            expected: "a JSON object".into(),
        }]);
    };

    let version = match obj.get("version") {
        None | Some(Value::Null) => {
            errors.push(ProfileValidationError::MissingVersion);
            String::new()
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let safe_address = match obj.get("safeAddress") {
        Some(Value::String(s)) if is_hex_address(s) => Some(s.to_lowercase()),
        Some(Value::String(s)) => {
            errors.push(ProfileValidationError::InvalidAddress {
                field: "safeAddress".into(),
                value: s.clone(),
            });
            None
        }
        Some(Value::Null) | None => None,
        Some(_) => {
            errors.push(ProfileValidationError::WrongType {
                field: "safeAddress".into(),
                expected: "a string".into(),
            });
            None
        }
    };

    let trusted_contracts = collect_contracts(obj.get("trustedContracts"), &mut errors);
    let trusted_assets = collect_assets(obj.get("trustedAssets"), &mut errors);
    let trusted_delegate_calls =
        collect_delegate_calls(obj.get("trustedDelegateCalls"), &mut errors);
    let selector_usage_history =
        collect_usage_history(obj.get("selectorUsageHistory"), &mut errors);

    if errors.is_empty() {
        Ok(TrustProfile {
            version,
            safe_address,
            trusted_contracts,
            trusted_assets,
            trusted_delegate_calls,
            selector_usage_history,
        })
    } else {
        Err(errors)
    }
}

fn collect_contracts(
    value: Option<&Value>,
    errors: &mut Vec<ProfileValidationError>,
) -> BTreeMap<String, TrustedContract> {
    let mut out = BTreeMap::new();
    let map = match value {
        None | Some(Value::Null) => {
            errors.push(ProfileValidationError::MissingTrustedContracts);
            return out;
        }
        Some(Value::Object(map)) => map,
        Some(_) => {
            errors.push(ProfileValidationError::WrongType {
                field: "trustedContracts".into(),
                expected: "an object keyed by address".into(),
            });
            return out;
        }
    };

    for (addr, entry) in map {
        let field = format!("trustedContracts.{addr}");
        if !is_hex_address(addr) {
            errors.push(ProfileValidationError::InvalidAddress {
                field: "trustedContracts".into(),
                value: addr.clone(),
            });
            continue;
        }
        let Some(entry) = entry.as_object() else {
            errors.push(ProfileValidationError::WrongType {
                field,
                expected: "an object".into(),
            });
            continue;
        };

        let label = entry
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let trust_level = match entry.get("trustLevel").and_then(Value::as_str) {
            Some(s) => match TrustLevel::parse(s) {
                Some(level) => level,
                None => {
                    errors.push(ProfileValidationError::InvalidTrustLevel {
                        address: addr.clone(),
                        value: s.to_string(),
                    });
                    continue;
                }
            },
            None => {
                errors.push(ProfileValidationError::InvalidTrustLevel {
                    address: addr.clone(),
                    value: "<missing>".into(),
                });
                continue;
            }
        };

        let allowed_selectors =
            parse_allowed_selectors(entry.get("allowedSelectors"), &field, true, errors);

        let mut selector_labels = BTreeMap::new();
        if let Some(labels) = entry.get("selectorLabels") {
            match labels.as_object() {
                Some(labels) => {
                    for (sel, label) in labels {
                        if !is_hex_selector(sel) {
                            errors.push(ProfileValidationError::InvalidSelector {
                                field: format!("{field}.selectorLabels"),
                                value: sel.clone(),
                            });
                            continue;
                        }
                        if let Some(label) = label.as_str() {
                            selector_labels.insert(sel.to_lowercase(), label.to_string());
                        }
                    }
                }
                None => errors.push(ProfileValidationError::WrongType {
                    field: format!("{field}.selectorLabels"),
                    expected: "an object of selector → label".into(),
                }),
            }
        }

        out.insert(
            addr.to_lowercase(),
            TrustedContract {
                label,
                trust_level,
                allowed_selectors,
                selector_labels,
                notes: entry.get("notes").and_then(Value::as_str).map(String::from),
                abi_path: entry
                    .get("abiPath")
                    .and_then(Value::as_str)
                    .map(String::from),
            },
        );
    }
    out
}

/// `"*"` or an array of 4-byte selectors. A missing entry defaults to the
/// wildcard for `trustedContracts` (the tier already gates trust) but is an
/// error for the DELEGATECALL whitelist, which must be explicit.
fn parse_allowed_selectors(
    value: Option<&Value>,
    field: &str,
    missing_is_all: bool,
    errors: &mut Vec<ProfileValidationError>,
) -> AllowedSelectors {
    match value {
        None | Some(Value::Null) => {
            if !missing_is_all {
                errors.push(ProfileValidationError::InvalidAllowedSelectors {
                    field: field.to_string(),
                });
            }
            AllowedSelectors::All
        }
        Some(Value::String(s)) if s == "*" => AllowedSelectors::All,
        Some(Value::Array(items)) => {
            let mut set = BTreeSet::new();
            for item in items {
                match item.as_str() {
                    Some(s) if is_hex_selector(s) => {
                        set.insert(s.to_lowercase());
                    }
                    Some(s) => errors.push(ProfileValidationError::InvalidSelector {
                        field: field.to_string(),
                        value: s.to_string(),
                    }),
                    None => errors.push(ProfileValidationError::InvalidSelector {
                        field: field.to_string(),
                        value: item.to_string(),
                    }),
                }
            }
            AllowedSelectors::List(set)
        }
        Some(_) => {
            errors.push(ProfileValidationError::InvalidAllowedSelectors {
                field: field.to_string(),
            });
            AllowedSelectors::All
        }
    }
}

fn collect_assets(
    value: Option<&Value>,
    errors: &mut Vec<ProfileValidationError>,
) -> BTreeMap<String, TrustedAsset> {
    let mut out = BTreeMap::new();
    let map = match value {
        None | Some(Value::Null) => return out,
        Some(Value::Object(map)) => map,
        Some(_) => {
            errors.push(ProfileValidationError::WrongType {
                field: "trustedAssets".into(),
                expected: "an object keyed by address".into(),
            });
            return out;
        }
    };
    for (addr, entry) in map {
        if !is_hex_address(addr) {
            errors.push(ProfileValidationError::InvalidAddress {
                field: "trustedAssets".into(),
                value: addr.clone(),
            });
            continue;
        }
        let Some(entry) = entry.as_object() else {
            errors.push(ProfileValidationError::WrongType {
                field: format!("trustedAssets.{addr}"),
                expected: "an object".into(),
            });
            continue;
        };
        let decimals = match entry.get("decimals").and_then(Value::as_u64) {
            Some(d) if d <= u64::from(u8::MAX) => d as u8,
            _ => {
                errors.push(ProfileValidationError::WrongType {
                    field: format!("trustedAssets.{addr}.decimals"),
                    expected: "an integer between 0 and 255".into(),
                });
                continue;
            }
        };
        out.insert(
            addr.to_lowercase(),
            TrustedAsset {
                symbol: entry
                    .get("symbol")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                name: entry
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                decimals,
            },
        );
    }
    out
}

fn collect_delegate_calls(
    value: Option<&Value>,
    errors: &mut Vec<ProfileValidationError>,
) -> BTreeMap<String, DelegateCallAllowance> {
    let mut out = BTreeMap::new();
    let map = match value {
        None | Some(Value::Null) => return out,
        Some(Value::Object(map)) => map,
        Some(_) => {
            errors.push(ProfileValidationError::WrongType {
                field: "trustedDelegateCalls".into(),
                expected: "an object keyed by address".into(),
            });
            return out;
        }
    };
    for (addr, entry) in map {
        let field = format!("trustedDelegateCalls.{addr}");
        if !is_hex_address(addr) {
            errors.push(ProfileValidationError::InvalidAddress {
                field: "trustedDelegateCalls".into(),
                value: addr.clone(),
            });
            continue;
        }
        let Some(entry) = entry.as_object() else {
            errors.push(ProfileValidationError::WrongType {
                field,
                expected: "an object".into(),
            });
            continue;
        };
        let allowed_selectors =
            parse_allowed_selectors(entry.get("allowedSelectors"), &field, false, errors);
        out.insert(addr.to_lowercase(), DelegateCallAllowance { allowed_selectors });
    }
    out
}

fn collect_usage_history(
    value: Option<&Value>,
    errors: &mut Vec<ProfileValidationError>,
) -> BTreeMap<String, BTreeMap<String, SelectorUsage>> {
    let mut out = BTreeMap::new();
    let map = match value {
        None | Some(Value::Null) => return out,
        Some(Value::Object(map)) => map,
        Some(_) => {
            errors.push(ProfileValidationError::WrongType {
                field: "selectorUsageHistory".into(),
                expected: "an object keyed by address".into(),
            });
            return out;
        }
    };
    for (addr, selectors) in map {
        if !is_hex_address(addr) {
            errors.push(ProfileValidationError::InvalidAddress {
                field: "selectorUsageHistory".into(),
                value: addr.clone(),
            });
            continue;
        }
        let Some(selectors) = selectors.as_object() else {
            errors.push(ProfileValidationError::WrongType {
                field: format!("selectorUsageHistory.{addr}"),
                expected: "an object keyed by selector".into(),
            });
            continue;
        };
        let mut inner = BTreeMap::new();
        for (sel, usage) in selectors {
            if !is_hex_selector(sel) {
                errors.push(ProfileValidationError::InvalidSelector {
                    field: format!("selectorUsageHistory.{addr}"),
                    value: sel.clone(),
                });
                continue;
            }
            let count = usage.get("count").and_then(Value::as_u64).unwrap_or(0);
            let last_used = usage
                .get("lastUsed")
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc));
            inner.insert(sel.to_lowercase(), SelectorUsage { count, last_used });
        }
        out.insert(addr.to_lowercase(), inner);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "version": "1",
            "trustedContracts": {}
        })
    }

    #[test]
    fn minimal_document_validates() {
        let profile = validate_and_normalize(&minimal()).unwrap();
        assert_eq!(profile.version, "1");
        assert!(profile.trusted_contracts.is_empty());
    }

    #[test]
    fn missing_version_is_flagged() {
        let doc = json!({ "trustedContracts": {} });
        let errors = validate_and_normalize(&doc).unwrap_err();
        assert!(errors.contains(&ProfileValidationError::MissingVersion));
    }

    #[test]
    fn missing_trusted_contracts_is_flagged() {
        let doc = json!({ "version": 1 });
        let errors = validate_and_normalize(&doc).unwrap_err();
        assert!(errors.contains(&ProfileValidationError::MissingTrustedContracts));
    }

    #[test]
    fn wrong_typed_trusted_contracts_is_flagged() {
        let doc = json!({ "version": 1, "trustedContracts": ["not", "a", "map"] });
        let errors = validate_and_normalize(&doc).unwrap_err();
        assert!(matches!(
            errors[0],
            ProfileValidationError::WrongType { .. }
        ));
    }

    #[test]
    fn bad_address_keys_are_flagged() {
        let doc = json!({
            "version": 1,
            "trustedContracts": {
                "0x1234": { "label": "x", "trustLevel": "PROTOCOL" }
            }
        });
        let errors = validate_and_normalize(&doc).unwrap_err();
        assert!(matches!(
            &errors[0],
            ProfileValidationError::InvalidAddress { value, .. } if value == "0x1234"
        ));
    }

    #[test]
    fn bad_trust_level_is_flagged() {
        let doc = json!({
            "version": 1,
            "trustedContracts": {
                "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2": {
                    "label": "WETH", "trustLevel": "FRIENDLY"
                }
            }
        });
        let errors = validate_and_normalize(&doc).unwrap_err();
        assert!(matches!(
            &errors[0],
            ProfileValidationError::InvalidTrustLevel { value, .. } if value == "FRIENDLY"
        ));
    }

    #[test]
    fn bad_selector_in_allowlist_is_flagged() {
        let doc = json!({
            "version": 1,
            "trustedContracts": {
                "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2": {
                    "label": "WETH",
                    "trustLevel": "PROTOCOL",
                    "allowedSelectors": ["0x095ea7b3", "approve"]
                }
            }
        });
        let errors = validate_and_normalize(&doc).unwrap_err();
        assert!(matches!(
            &errors[0],
            ProfileValidationError::InvalidSelector { value, .. } if value == "approve"
        ));
    }

    #[test]
    fn allowed_selectors_scalar_other_than_star_is_flagged() {
        let doc = json!({
            "version": 1,
            "trustedContracts": {
                "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2": {
                    "label": "WETH",
                    "trustLevel": "PROTOCOL",
                    "allowedSelectors": 7
                }
            }
        });
        let errors = validate_and_normalize(&doc).unwrap_err();
        assert!(matches!(
            errors[0],
            ProfileValidationError::InvalidAllowedSelectors { .. }
        ));
    }

    #[test]
    fn delegatecall_whitelist_requires_explicit_selectors() {
        let doc = json!({
            "version": 1,
            "trustedContracts": {},
            "trustedDelegateCalls": {
                "0x40a2accbd92bca938b02010e17a5b8929b49130d": {}
            }
        });
        let errors = validate_and_normalize(&doc).unwrap_err();
        assert!(matches!(
            errors[0],
            ProfileValidationError::InvalidAllowedSelectors { .. }
        ));
    }

    #[test]
    fn keys_are_lowercased_on_load() {
        let doc = json!({
            "version": 1,
            "trustedContracts": {
                "0xC02AAA39B223FE8D0A0E5C4F27EAD9083C756CC2": {
                    "label": "WETH",
                    "trustLevel": "PROTOCOL",
                    "allowedSelectors": ["0x095EA7B3"],
                    "selectorLabels": { "0x095EA7B3": "approve" }
                }
            },
            "trustedAssets": {
                "0xC02AAA39B223FE8D0A0E5C4F27EAD9083C756CC2": {
                    "symbol": "WETH", "name": "Wrapped Ether", "decimals": 18
                }
            }
        });
        let profile = validate_and_normalize(&doc).unwrap();
        let contract = profile
            .trusted_contracts
            .get("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")
            .expect("lowercased key");
        assert!(contract.selector_labels.contains_key("0x095ea7b3"));
        assert!(profile
            .trusted_assets
            .contains_key("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"));
    }

    #[test]
    fn usage_history_parses_timestamps() {
        let doc = json!({
            "version": 1,
            "trustedContracts": {},
            "selectorUsageHistory": {
                "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2": {
                    "0x095ea7b3": { "count": 50, "lastUsed": "2026-05-01T12:00:00Z" },
                    "0xa9059cbb": { "count": 2 }
                }
            }
        });
        let profile = validate_and_normalize(&doc).unwrap();
        let usage = &profile.selector_usage_history
            ["0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"]["0x095ea7b3"];
        assert_eq!(usage.count, 50);
        assert!(usage.last_used.is_some());
        let bare = &profile.selector_usage_history
            ["0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"]["0xa9059cbb"];
        assert!(bare.last_used.is_none());
    }

    #[test]
    fn all_violations_are_reported_together() {
        let doc = json!({
            "trustedContracts": {
                "nope": { "label": "x", "trustLevel": "WAT" }
            }
        });
        let errors = validate_and_normalize(&doc).unwrap_err();
        // Missing version + invalid address key.
        assert!(errors.len() >= 2);
    }
}
