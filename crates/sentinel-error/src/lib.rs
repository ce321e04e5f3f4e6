//! Unified error taxonomy with stable error codes for Calldata Sentinel.
//!
//! Every pipeline failure carries an [`ErrorCode`] (a machine-readable,
//! stable string tag), a human-readable message, and arbitrary key-value
//! context. Use the builder returned by [`SentinelError::new`] to construct
//! errors fluently.
//!
//! The taxonomy encodes the propagation policy of the decode pipeline: no
//! code here produces a hard abort. Calldata errors surface immediately
//! before any work is done, batch and lookup errors are absorbed into the
//! analysis result, and profile errors degrade the run to profile-less
//! operation.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// ErrorCategory
// ---------------------------------------------------------------------------

/// Broad family that an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed calldata input.
    Calldata,
    /// MultiSend batch parsing errors.
    Batch,
    /// Trust profile loading / validation errors.
    Profile,
    /// External signature lookup errors.
    Lookup,
    /// ABI parsing / decoding errors.
    Abi,
    /// Explainer payload safety errors.
    Prompt,
    /// Catch-all for unexpected internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Calldata => "calldata",
            Self::Batch => "batch",
            Self::Profile => "profile",
            Self::Lookup => "lookup",
            Self::Abi => "abi",
            Self::Prompt => "prompt",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ErrorCode
// ---------------------------------------------------------------------------

/// Machine-readable, stable error code.
///
/// Each variant serialises to a `SCREAMING_SNAKE_CASE` string that is
/// guaranteed not to change across patch releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // -- Calldata --
    /// Input is not hex, or is shorter than a 4-byte selector.
    InvalidCalldata,

    // -- Batch --
    /// The packed MultiSend payload failed structural validation.
    BatchParseFailure,

    // -- Profile --
    /// The trust profile document failed shape validation.
    ProfileValidationFailure,
    /// The trust profile file could not be read or parsed as JSON.
    ProfileReadFailure,

    // -- Lookup --
    /// The external signature lookup timed out.
    ExternalLookupTimeout,
    /// The external signature lookup failed (HTTP / transport).
    ExternalLookupFailure,

    // -- Abi --
    /// A function signature string failed to parse.
    SignatureParseFailure,
    /// Parameter data did not decode against the resolved signature.
    AbiDecodeFailure,
    /// An ABI fragment file was malformed.
    AbiFragmentInvalid,

    // -- Prompt --
    /// The constructed explainer payload leaked raw hex and was refused.
    UnsafePrompt,

    // -- Internal --
    /// Unexpected internal error.
    Internal,
}

impl ErrorCode {
    /// The [`ErrorCategory`] this code belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCalldata => ErrorCategory::Calldata,
            Self::BatchParseFailure => ErrorCategory::Batch,
            Self::ProfileValidationFailure | Self::ProfileReadFailure => ErrorCategory::Profile,
            Self::ExternalLookupTimeout | Self::ExternalLookupFailure => ErrorCategory::Lookup,
            Self::SignatureParseFailure | Self::AbiDecodeFailure | Self::AbiFragmentInvalid => {
                ErrorCategory::Abi
            }
            Self::UnsafePrompt => ErrorCategory::Prompt,
            Self::Internal => ErrorCategory::Internal,
        }
    }

    /// Whether the pipeline treats this failure as fatal for the current
    /// decode invocation.
    ///
    /// Only calldata validation aborts a decode; everything else is absorbed
    /// into the analysis result or degrades the relevant source.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidCalldata)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidCalldata => "INVALID_CALLDATA",
            Self::BatchParseFailure => "BATCH_PARSE_FAILURE",
            Self::ProfileValidationFailure => "PROFILE_VALIDATION_FAILURE",
            Self::ProfileReadFailure => "PROFILE_READ_FAILURE",
            Self::ExternalLookupTimeout => "EXTERNAL_LOOKUP_TIMEOUT",
            Self::ExternalLookupFailure => "EXTERNAL_LOOKUP_FAILURE",
            Self::SignatureParseFailure => "SIGNATURE_PARSE_FAILURE",
            Self::AbiDecodeFailure => "ABI_DECODE_FAILURE",
            Self::AbiFragmentInvalid => "ABI_FRAGMENT_INVALID",
            Self::UnsafePrompt => "UNSAFE_PROMPT",
            Self::Internal => "INTERNAL",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// SentinelError
// ---------------------------------------------------------------------------

/// A structured Sentinel error: code + message + key-value context.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct SentinelError {
    /// Stable machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Arbitrary context attached at the failure site.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl SentinelError {
    /// Start building an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Attach a context key-value pair.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// The category of the underlying code.
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialise_to_stable_strings() {
        let json = serde_json::to_string(&ErrorCode::InvalidCalldata).unwrap();
        assert_eq!(json, "\"INVALID_CALLDATA\"");
        let json = serde_json::to_string(&ErrorCode::UnsafePrompt).unwrap();
        assert_eq!(json, "\"UNSAFE_PROMPT\"");
    }

    #[test]
    fn display_matches_serde_tag() {
        for code in [
            ErrorCode::InvalidCalldata,
            ErrorCode::BatchParseFailure,
            ErrorCode::ProfileValidationFailure,
            ErrorCode::ExternalLookupTimeout,
            ErrorCode::AbiDecodeFailure,
            ErrorCode::UnsafePrompt,
        ] {
            let tag = serde_json::to_string(&code).unwrap();
            assert_eq!(tag.trim_matches('"'), code.to_string());
        }
    }

    #[test]
    fn only_calldata_errors_are_fatal() {
        assert!(ErrorCode::InvalidCalldata.is_fatal());
        assert!(!ErrorCode::BatchParseFailure.is_fatal());
        assert!(!ErrorCode::ExternalLookupTimeout.is_fatal());
        assert!(!ErrorCode::AbiDecodeFailure.is_fatal());
        assert!(!ErrorCode::UnsafePrompt.is_fatal());
    }

    #[test]
    fn categories_cover_every_code() {
        assert_eq!(ErrorCode::InvalidCalldata.category(), ErrorCategory::Calldata);
        assert_eq!(ErrorCode::BatchParseFailure.category(), ErrorCategory::Batch);
        assert_eq!(
            ErrorCode::ProfileReadFailure.category(),
            ErrorCategory::Profile
        );
        assert_eq!(
            ErrorCode::ExternalLookupFailure.category(),
            ErrorCategory::Lookup
        );
        assert_eq!(
            ErrorCode::SignatureParseFailure.category(),
            ErrorCategory::Abi
        );
        assert_eq!(ErrorCode::UnsafePrompt.category(), ErrorCategory::Prompt);
    }

    #[test]
    fn builder_attaches_context() {
        let err = SentinelError::new(ErrorCode::AbiDecodeFailure, "word out of range")
            .with_context("selector", "0x095ea7b3")
            .with_context("offset", "64");
        assert_eq!(err.context.len(), 2);
        assert_eq!(err.context["selector"], "0x095ea7b3");
        assert_eq!(err.to_string(), "ABI_DECODE_FAILURE: word out of range");
    }

    #[test]
    fn error_round_trips_through_json() {
        let err = SentinelError::new(ErrorCode::BatchParseFailure, "truncated record")
            .with_context("remaining", "17");
        let json = serde_json::to_string(&err).unwrap();
        let back: SentinelError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, ErrorCode::BatchParseFailure);
        assert_eq!(back.message, "truncated record");
        assert_eq!(back.context["remaining"], "17");
    }
}
