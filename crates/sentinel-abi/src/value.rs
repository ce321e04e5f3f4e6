// SPDX-License-Identifier: MIT OR Apache-2.0
//! Decoded parameter values and their presentation rules.
//!
//! Values keep full fidelity: integers are 256-bit, blobs are raw bytes.
//! Hex abbreviation is a formatting concern only: [`AbiValue::abbreviated`]
//! shortens long blobs for terminal output while [`AbiValue::to_display_string`]
//! never drops data.

use alloy_primitives::{Address, I256, U256};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

/// A decoded ABI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// 20-byte address.
    Address(Address),
    /// Boolean.
    Bool(bool),
    /// Unsigned integer up to 256 bits.
    Uint(U256),
    /// Signed integer up to 256 bits.
    Int(I256),
    /// `bytesN` payload.
    FixedBytes(Vec<u8>),
    /// Dynamic `bytes` payload.
    Bytes(Vec<u8>),
    /// UTF-8 string.
    String(String),
    /// `T[]` or `T[N]` elements.
    Array(Vec<AbiValue>),
    /// Tuple members.
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// The contained address, if this is an address value.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            AbiValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// The contained unsigned integer, if any.
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            AbiValue::Uint(u) => Some(*u),
            _ => None,
        }
    }

    /// The contained boolean, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The contained byte payload (`bytes` or `bytesN`), if any.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AbiValue::Bytes(b) | AbiValue::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    /// The contained string, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The contained element list, if this is an array or tuple.
    pub fn as_array(&self) -> Option<&[AbiValue]> {
        match self {
            AbiValue::Array(items) | AbiValue::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Full-fidelity rendering: lowercase hex for addresses and blobs,
    /// decimal for integers. Never truncates.
    pub fn to_display_string(&self) -> String {
        match self {
            AbiValue::Address(a) => format!("0x{}", hex::encode(a.as_slice())),
            AbiValue::Bool(b) => b.to_string(),
            AbiValue::Uint(u) => u.to_string(),
            AbiValue::Int(i) => i.to_string(),
            AbiValue::FixedBytes(b) | AbiValue::Bytes(b) => format!("0x{}", hex::encode(b)),
            AbiValue::String(s) => s.clone(),
            AbiValue::Array(items) | AbiValue::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(AbiValue::to_display_string).collect();
                format!("[{}]", inner.join(", "))
            }
        }
    }

    /// Terminal-friendly rendering: blobs longer than 32 bytes are shown as
    /// `0xhead…tail (N bytes)`. Addresses and integers are never shortened.
    pub fn abbreviated(&self) -> String {
        match self {
            AbiValue::FixedBytes(b) | AbiValue::Bytes(b) if b.len() > 32 => {
                format!(
                    "0x{}…{} ({} bytes)",
                    hex::encode(&b[..8]),
                    hex::encode(&b[b.len() - 8..]),
                    b.len()
                )
            }
            AbiValue::Array(items) | AbiValue::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(AbiValue::abbreviated).collect();
                format!("[{}]", inner.join(", "))
            }
            other => other.to_display_string(),
        }
    }
}

impl Serialize for AbiValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AbiValue::Address(a) => {
                serializer.serialize_str(&format!("0x{}", hex::encode(a.as_slice())))
            }
            AbiValue::Bool(b) => serializer.serialize_bool(*b),
            AbiValue::Uint(u) => serializer.serialize_str(&u.to_string()),
            AbiValue::Int(i) => serializer.serialize_str(&i.to_string()),
            AbiValue::FixedBytes(b) | AbiValue::Bytes(b) => {
                serializer.serialize_str(&format!("0x{}", hex::encode(b)))
            }
            AbiValue::String(s) => serializer.serialize_str(s),
            AbiValue::Array(items) | AbiValue::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// `2^256 − 1`, the conventional "infinite approval" sentinel.
pub fn is_max_uint(v: &U256) -> bool {
    *v == U256::MAX
}

/// Values at or above `2^255` are treated as effectively unlimited for
/// approval semantics.
pub fn is_effectively_unlimited(v: &U256) -> bool {
    *v >= U256::from(1u8) << 255
}

/// Present an approval/transfer amount: the sentinel prints as
/// `MAX_UINT256`, the near-sentinel range is called out, everything else is
/// plain decimal.
pub fn format_amount(v: &U256) -> String {
    if is_max_uint(v) {
        "MAX_UINT256".to_string()
    } else if is_effectively_unlimited(v) {
        format!("{v} (effectively unlimited)")
    } else {
        v.to_string()
    }
}
