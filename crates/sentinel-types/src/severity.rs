// SPDX-License-Identifier: MIT OR Apache-2.0
//! The two severity scales and batch sub-call categories.
//!
//! Impact severity ([`Severity`]) describes what signing would do; header
//! severity ([`HeaderSeverity`]) describes how much the system trusts its
//! own interpretation. They are independent outputs and are never
//! collapsed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Impact-based severity of an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Routine, reversible, or informational.
    Low,
    /// Moves value in a bounded, expected way.
    Medium,
    /// Moves assets or grants standing permissions.
    High,
    /// Control, upgrade, or execution authority changes hands.
    Critical,
    /// The system cannot assess the impact.
    Unknown,
    /// Impact depends on context the taxonomy cannot fix ahead of time.
    ContextDependent,
}

impl Severity {
    /// Aggregation rank: `UNKNOWN > CRITICAL > HIGH > MEDIUM > LOW`.
    ///
    /// `UNKNOWN` outranks `CRITICAL` on purpose: an effect the system
    /// cannot assess must dominate one it can. `CONTEXT_DEPENDENT` never
    /// survives composition, but ranks alongside `UNKNOWN` defensively.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Critical => 3,
            Self::Unknown | Self::ContextDependent => 4,
        }
    }

    /// The higher-ranked of two severities.
    pub fn max(self, other: Self) -> Self {
        if other.rank() > self.rank() { other } else { self }
    }

    /// One level up on the impact ladder, capped at `CRITICAL`.
    /// `UNKNOWN` and `CONTEXT_DEPENDENT` are not on the ladder.
    pub fn elevated(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Critical => Self::Critical,
            other => other,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
            Self::ContextDependent => "CONTEXT_DEPENDENT",
        };
        f.write_str(s)
    }
}

/// Trust-confidence severity shown in the result header.
///
/// `None` (no profile loaded) is represented by the surrounding `Option`,
/// not by a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeaderSeverity {
    /// The call matches the trust profile.
    Low,
    /// The profile offers no basis for confidence.
    Unknown,
    /// The profile actively contradicts the call, or a DELEGATECALL is not
    /// whitelisted.
    Critical,
}

impl fmt::Display for HeaderSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Unknown => "UNKNOWN",
            Self::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Coarse bucket for a batch sub-call, used in batch count summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubCallCategory {
    /// LOW or MEDIUM impact.
    Ok,
    /// HIGH impact.
    Warn,
    /// CRITICAL impact.
    Danger,
    /// Unassessable.
    Unknown,
}

impl SubCallCategory {
    /// Bucket an impact severity.
    pub fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::Low | Severity::Medium => Self::Ok,
            Severity::High => Self::Warn,
            Severity::Critical => Self::Danger,
            Severity::Unknown | Severity::ContextDependent => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_outranks_critical() {
        assert!(Severity::Unknown.rank() > Severity::Critical.rank());
        assert_eq!(Severity::Critical.max(Severity::Unknown), Severity::Unknown);
        assert_eq!(Severity::Unknown.max(Severity::Low), Severity::Unknown);
    }

    #[test]
    fn max_is_commutative_and_associative() {
        let all = [
            Severity::Low,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
            Severity::Unknown,
        ];
        for a in all {
            for b in all {
                assert_eq!(a.max(b).rank(), b.max(a).rank());
                for c in all {
                    assert_eq!(a.max(b).max(c).rank(), a.max(b.max(c)).rank());
                }
            }
        }
    }

    #[test]
    fn elevation_caps_at_critical() {
        assert_eq!(Severity::Low.elevated(), Severity::Medium);
        assert_eq!(Severity::Medium.elevated(), Severity::High);
        assert_eq!(Severity::High.elevated(), Severity::Critical);
        assert_eq!(Severity::Critical.elevated(), Severity::Critical);
        assert_eq!(Severity::Unknown.elevated(), Severity::Unknown);
    }

    #[test]
    fn categories_bucket_correctly() {
        assert_eq!(SubCallCategory::from_severity(Severity::Low), SubCallCategory::Ok);
        assert_eq!(SubCallCategory::from_severity(Severity::Medium), SubCallCategory::Ok);
        assert_eq!(SubCallCategory::from_severity(Severity::High), SubCallCategory::Warn);
        assert_eq!(
            SubCallCategory::from_severity(Severity::Critical),
            SubCallCategory::Danger
        );
        assert_eq!(
            SubCallCategory::from_severity(Severity::Unknown),
            SubCallCategory::Unknown
        );
    }

    #[test]
    fn serde_tags_are_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&Severity::ContextDependent).unwrap(),
            "\"CONTEXT_DEPENDENT\""
        );
        assert_eq!(
            serde_json::to_string(&HeaderSeverity::Critical).unwrap(),
            "\"CRITICAL\""
        );
    }
}
