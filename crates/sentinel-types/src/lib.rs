// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! sentinel-types
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// The top-level analysis result and batch summaries.
pub mod analysis;
/// Semantic effects and their taxonomy tags.
pub mod effect;
/// Impact severity, header severity, and sub-call categories.
pub mod severity;
/// Trust classification outputs.
pub mod trust;

pub use analysis::{Analysis, BatchCall, BatchCounts, BatchInfo, BatchType, DecodedParam};
pub use effect::{Effect, EffectScope, EffectType, Permanence, SemanticSource};
pub use severity::{HeaderSeverity, Severity, SubCallCategory};
pub use trust::{
    ContractClassification, DelegatecallClassification, DelegatecallContext,
    SelectorClassification, SelectorUsage, TrustContext, TrustLevel,
};

use sentinel_error::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// The first 4 bytes of calldata, identifying a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// The selector's raw bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Lowercase `0x`-prefixed rendering, the canonical map-key form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Selector {
    type Err = CalldataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if stripped.len() != 8 {
            return Err(CalldataError::TooShort { bytes: stripped.len() / 2 });
        }
        let raw = hex::decode(stripped).map_err(|_| CalldataError::NotHex)?;
        Ok(Selector([raw[0], raw[1], raw[2], raw[3]]))
    }
}

impl Serialize for Selector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Calldata
// ---------------------------------------------------------------------------

/// Validated calldata: at least a selector, hex-parsed once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calldata {
    bytes: Vec<u8>,
}

impl Calldata {
    /// Parse a case-insensitive hex string with optional `0x` prefix.
    ///
    /// Rejects empty input, non-hex characters, odd length, and anything
    /// shorter than the 4-byte selector.
    pub fn parse(input: &str) -> Result<Self, CalldataError> {
        let trimmed = input.trim();
        let stripped = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if stripped.is_empty() {
            return Err(CalldataError::Empty);
        }
        if stripped.len() % 2 != 0 {
            return Err(CalldataError::OddLength);
        }
        let bytes = hex::decode(stripped).map_err(|_| CalldataError::NotHex)?;
        Self::from_bytes(bytes)
    }

    /// Wrap already-decoded bytes, enforcing the minimum length.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CalldataError> {
        if bytes.len() < 4 {
            return Err(CalldataError::TooShort { bytes: bytes.len() });
        }
        Ok(Self { bytes })
    }

    /// The 4-byte function selector.
    pub fn selector(&self) -> Selector {
        Selector([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// The ABI-encoded parameter data after the selector.
    pub fn params(&self) -> &[u8] {
        &self.bytes[4..]
    }

    /// The full payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase `0x`-prefixed rendering of the full payload.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.bytes))
    }
}

/// Calldata validation failures. These surface immediately; no partial
/// analysis is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalldataError {
    /// The input was empty after stripping the prefix.
    #[error("calldata is empty")]
    Empty,
    /// The input contained non-hex characters.
    #[error("calldata is not valid hex")]
    NotHex,
    /// The input had an odd number of hex digits.
    #[error("calldata has an odd number of hex digits")]
    OddLength,
    /// The input was shorter than a 4-byte selector.
    #[error("calldata too short: {bytes} bytes, need at least 4")]
    TooShort {
        /// Bytes present.
        bytes: usize,
    },
}

impl CalldataError {
    /// Map onto the stable Sentinel error code table.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::InvalidCalldata
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// The call variant of a transaction or batch sub-transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Ordinary message call.
    #[serde(rename = "CALL")]
    Call,
    /// Executes the target's code in the caller's storage and identity
    /// context. The primary attack vector this system defends against.
    #[serde(rename = "DELEGATECALL")]
    DelegateCall,
}

impl Operation {
    /// Decode the wire byte used by Safe transactions and MultiSend records.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::Call),
            1 => Some(Self::DelegateCall),
            _ => None,
        }
    }

    /// The wire byte.
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Call => 0,
            Self::DelegateCall => 1,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => f.write_str("CALL"),
            Self::DelegateCall => f.write_str("DELEGATECALL"),
        }
    }
}

/// Lowercase `0x`-prefixed rendering of an address, the canonical map-key
/// and technical-section form.
pub fn address_to_lower_hex(addr: &alloy_primitives::Address) -> String {
    format!("0x{}", hex::encode(addr.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calldata_accepts_prefixed_and_bare_hex() {
        let a = Calldata::parse("0x095ea7b3aabbccdd").unwrap();
        let b = Calldata::parse("095EA7B3AABBCCDD").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.selector().to_hex(), "0x095ea7b3");
        assert_eq!(a.params(), &[0xaa, 0xbb, 0xcc, 0xdd]);
    }

    #[test]
    fn calldata_rejects_bad_input() {
        assert_eq!(Calldata::parse(""), Err(CalldataError::Empty));
        assert_eq!(Calldata::parse("0x"), Err(CalldataError::Empty));
        assert_eq!(Calldata::parse("0xzz11"), Err(CalldataError::NotHex));
        assert_eq!(Calldata::parse("0x123"), Err(CalldataError::OddLength));
        assert_eq!(
            Calldata::parse("0x1234"),
            Err(CalldataError::TooShort { bytes: 2 })
        );
    }

    #[test]
    fn exact_selector_is_valid_calldata() {
        let c = Calldata::parse("0xd0e30db0").unwrap();
        assert!(c.params().is_empty());
    }

    #[test]
    fn selector_parses_case_insensitively() {
        let s: Selector = "0x095EA7B3".parse().unwrap();
        assert_eq!(s.to_hex(), "0x095ea7b3");
        assert!("0x095e".parse::<Selector>().is_err());
    }

    #[test]
    fn selector_serde_round_trip() {
        let s = Selector([0x8d, 0x80, 0xff, 0x0a]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"0x8d80ff0a\"");
        let back: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn operation_wire_bytes() {
        assert_eq!(Operation::from_byte(0), Some(Operation::Call));
        assert_eq!(Operation::from_byte(1), Some(Operation::DelegateCall));
        assert_eq!(Operation::from_byte(2), None);
        assert_eq!(Operation::DelegateCall.as_byte(), 1);
    }

    #[test]
    fn operation_serialises_screaming() {
        assert_eq!(
            serde_json::to_string(&Operation::DelegateCall).unwrap(),
            "\"DELEGATECALL\""
        );
    }
}
