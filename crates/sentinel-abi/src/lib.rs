// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! sentinel-abi
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Head/tail parameter decoding.
pub mod decode;
/// Minimal value-driven parameter encoding (test support and envelopes).
pub mod encode;
/// Signature string parsing and selector derivation.
pub mod signature;
/// Solidity type grammar.
pub mod types;
/// Decoded values and their presentation rules.
pub mod value;

pub use decode::decode_params;
pub use encode::encode_params;
pub use signature::{parse_signature, selector_of, ParsedSignature};
pub use types::AbiType;
pub use value::{format_amount, is_effectively_unlimited, is_max_uint, AbiValue};

use sentinel_error::ErrorCode;

/// Errors produced while parsing signatures or decoding parameter data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// The signature string is not `name(types…)`.
    #[error("invalid signature `{0}`")]
    InvalidSignature(String),

    /// A type token inside the signature is not part of the grammar.
    #[error("unsupported type `{0}`")]
    UnsupportedType(String),

    /// The parameter data ended before a required word.
    #[error("data out of bounds: wanted {wanted} bytes at offset {offset}, have {have}")]
    OutOfBounds {
        /// Byte offset of the read.
        offset: usize,
        /// Bytes the read needed.
        wanted: usize,
        /// Bytes actually available.
        have: usize,
    },

    /// A head word claimed an offset that does not fit the payload.
    #[error("invalid tail offset word at byte {0}")]
    InvalidOffset(usize),

    /// A length word exceeds the remaining payload.
    #[error("length word at byte {at} exceeds payload ({len})")]
    OversizedLength {
        /// Byte offset of the length word.
        at: usize,
        /// The declared length, as text.
        len: String,
    },

    /// A `string` value was not valid UTF-8.
    #[error("string value is not valid utf-8")]
    InvalidUtf8,
}

impl AbiError {
    /// Map onto the stable Sentinel error code table.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidSignature(_) | Self::UnsupportedType(_) => ErrorCode::SignatureParseFailure,
            _ => ErrorCode::AbiDecodeFailure,
        }
    }
}
