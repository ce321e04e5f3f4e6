// SPDX-License-Identifier: MIT OR Apache-2.0
//! Label-pattern severity heuristics for semantics that come from a trust
//! profile label or a local ABI rather than the curated table.

use sentinel_types::Severity;

const CRITICAL_PATTERNS: &[&str] = &["delegatecall", "selfdestruct", "upgrade"];
const HIGH_PATTERNS: &[&str] = &["transfer", "approve", "owner", "admin", "execute"];
const MEDIUM_PATTERNS: &[&str] = &["deposit", "withdraw", "swap", "stake"];
const LOW_PATTERNS: &[&str] = &["claim", "view", "get"];

/// Derive a severity from a function label.
///
/// The LOW bucket only applies when a trust profile vouches for the
/// context; without one the floor is MEDIUM. Unmatched labels land on
/// MEDIUM either way.
pub fn severity_from_label(label: &str, has_profile: bool) -> Severity {
    let lower = label.to_lowercase();
    let matches = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));

    if matches(CRITICAL_PATTERNS) {
        Severity::Critical
    } else if matches(HIGH_PATTERNS) {
        Severity::High
    } else if matches(MEDIUM_PATTERNS) {
        Severity::Medium
    } else if matches(LOW_PATTERNS) {
        if has_profile {
            Severity::Low
        } else {
            Severity::Medium
        }
    } else {
        Severity::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_patterns_dominate() {
        assert_eq!(severity_from_label("upgradeProxy", true), Severity::Critical);
        assert_eq!(
            severity_from_label("doDelegatecall", true),
            Severity::Critical
        );
        // "upgrade" beats "get" even though both match.
        assert_eq!(severity_from_label("getUpgrade", true), Severity::Critical);
    }

    #[test]
    fn high_patterns() {
        assert_eq!(severity_from_label("transferAll", true), Severity::High);
        assert_eq!(severity_from_label("setAdmin", true), Severity::High);
        assert_eq!(severity_from_label("executeOrder", false), Severity::High);
    }

    #[test]
    fn medium_patterns() {
        assert_eq!(severity_from_label("supplyAndStake", true), Severity::Medium);
        assert_eq!(severity_from_label("swapExact", true), Severity::Medium);
        assert_eq!(severity_from_label("withdrawAll", false), Severity::Medium);
    }

    #[test]
    fn low_needs_a_profile_behind_it() {
        assert_eq!(severity_from_label("claimRewards", true), Severity::Low);
        assert_eq!(severity_from_label("claimRewards", false), Severity::Medium);
        assert_eq!(severity_from_label("getBalance", true), Severity::Low);
    }

    #[test]
    fn unmatched_labels_default_to_medium() {
        assert_eq!(severity_from_label("supply", true), Severity::Medium);
        assert_eq!(severity_from_label("frobnicate", false), Severity::Medium);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(severity_from_label("TRANSFER", true), Severity::High);
        assert_eq!(severity_from_label("SelfDestruct", true), Severity::Critical);
    }
}
