// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! sentinel-explain
#![deny(unsafe_code)]
#![warn(missing_docs)]

use sentinel_error::ErrorCode;
use sentinel_types::{Analysis, EffectType, SemanticSource};
use serde::Serialize;
use tracing::{debug, warn};

/// The maximum hex token length allowed through: a full 42-character
/// (`0x` + 40) address. Anything longer is wire data.
pub const MAX_HEX_TOKEN: usize = 42;

/// The five disjoint prompt shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptShape {
    /// Verified against the curated database.
    Standard,
    /// Verified via a local ABI.
    AbiVerified,
    /// Verified via the trust profile, not an ABI.
    TrustProfile,
    /// Mandatory risk-forward script for unwhitelisted DELEGATECALL.
    DelegatecallUntrusted,
    /// Unverified: the model is skipped entirely.
    Unverified,
}

/// A sanitized payload for the external explainer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainerPayload {
    /// Which shape was selected.
    pub shape: PromptShape,
    /// System framing for the model.
    pub system_prompt: String,
    /// The analysis content the model explains.
    pub user_prompt: String,
    /// When true, do not call the model; use `fixed_response`.
    pub skip_model: bool,
    /// The fixed text for shapes that bypass the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_response: Option<String>,
}

/// Payload construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExplainError {
    /// The constructed payload leaked a hex token longer than an address.
    #[error("unsafe prompt: leaked hex token of {length} chars")]
    UnsafePrompt {
        /// Length of the offending token.
        length: usize,
    },
}

impl ExplainError {
    /// Map onto the stable Sentinel error code table.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::UnsafePrompt
    }
}

/// Find the first hex token longer than [`MAX_HEX_TOKEN`] chars.
pub fn find_long_hex(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'0' && (bytes[i + 1] == b'x' || bytes[i + 1] == b'X') {
            let mut end = i + 2;
            while end < bytes.len() && bytes[end].is_ascii_hexdigit() {
                end += 1;
            }
            let len = end - i;
            if len > MAX_HEX_TOKEN {
                return Some(len);
            }
            i = end;
        } else {
            i += 1;
        }
    }
    None
}

fn shape_of(analysis: &Analysis) -> PromptShape {
    if analysis.effect.effect_type == EffectType::DelegatecallExecution {
        return PromptShape::DelegatecallUntrusted;
    }
    match analysis.source {
        SemanticSource::VerifiedDb => PromptShape::Standard,
        SemanticSource::LocalAbi => PromptShape::AbiVerified,
        SemanticSource::TrustProfile => PromptShape::TrustProfile,
        SemanticSource::ExternalUnverified | SemanticSource::Unverified => PromptShape::Unverified,
    }
}

const UNVERIFIED_FIXED_TEXT: &str =
    "This function could not be verified against the curated database, a local ABI, or your \
     trust profile. Its name, if any, comes from an open public registry that anyone can write \
     to, so it must not be trusted. Treat the transaction as opaque: do not sign unless you can \
     independently establish what it does.";

/// Build the sanitized payload for an analysis.
///
/// Fails with [`ExplainError::UnsafePrompt`] if any long hex survives
/// construction; the caller must treat that as a refusal, not retry.
pub fn build_payload(analysis: &Analysis) -> Result<ExplainerPayload, ExplainError> {
    let shape = shape_of(analysis);
    debug!(?shape, "building explainer payload");

    let payload = match shape {
        PromptShape::Unverified => ExplainerPayload {
            shape,
            system_prompt: String::new(),
            user_prompt: String::new(),
            skip_model: true,
            fixed_response: Some(UNVERIFIED_FIXED_TEXT.to_string()),
        },
        PromptShape::DelegatecallUntrusted => ExplainerPayload {
            shape,
            system_prompt: "You explain multisig transactions to signers. This transaction is a \
                            DELEGATECALL to a target outside the signer's whitelist. You MUST \
                            lead with the risk: the target's code executes with the wallet's \
                            full permissions and can take everything. Severity is CRITICAL; \
                            state it as fact and do not soften it."
                .to_string(),
            user_prompt: content_sections(analysis),
            skip_model: false,
            fixed_response: None,
        },
        PromptShape::TrustProfile => ExplainerPayload {
            shape,
            system_prompt: "You explain multisig transactions to signers. The function's \
                            meaning comes from the signer's own trust profile label, verified \
                            by their profile but not by an ABI. Explain in plain terms what the \
                            labelled action does. Severity is provided as fact; never reassess \
                            it."
                .to_string(),
            user_prompt: content_sections(analysis),
            skip_model: false,
            fixed_response: None,
        },
        PromptShape::AbiVerified => ExplainerPayload {
            shape,
            system_prompt: "You explain multisig transactions to signers. The function was \
                            decoded through an ABI supplied for this contract, so names and \
                            parameters are reliable. Explain what the call does. Severity is \
                            provided as fact; never reassess it."
                .to_string(),
            user_prompt: content_sections(analysis),
            skip_model: false,
            fixed_response: None,
        },
        PromptShape::Standard => ExplainerPayload {
            shape,
            system_prompt: "You explain multisig transactions to signers. The function is in \
                            the curated verified database. Explain what the call does and what \
                            the consequences are. Severity is provided as fact; never reassess \
                            it."
                .to_string(),
            user_prompt: content_sections(analysis),
            skip_model: false,
            fixed_response: None,
        },
    };

    for text in [&payload.system_prompt, &payload.user_prompt] {
        if let Some(length) = find_long_hex(text) {
            warn!(length, "refusing payload with leaked hex");
            return Err(ExplainError::UnsafePrompt { length });
        }
    }
    Ok(payload)
}

/// The analysis content, rendered without any wire data.
fn content_sections(analysis: &Analysis) -> String {
    let mut out = String::new();

    if let Some(name) = &analysis.function_name {
        out.push_str(&format!("Function: {name}\n"));
    }
    if let Some(description) = &analysis.description {
        out.push_str(&format!("Description: {description}\n"));
    }
    out.push_str(&format!(
        "Impact severity: {} (stated fact — do not reassess)\n",
        analysis.effect.severity
    ));
    if let Some(header) = &analysis.header_severity {
        out.push_str(&format!("Trust confidence: {header}\n"));
    }
    out.push_str(&format!("Effect: {}\n", analysis.effect.summary));

    if let Some(params) = &analysis.params {
        out.push_str("Parameters:\n");
        for p in params {
            // Abbreviated rendering keeps every hex token at or under
            // address length.
            out.push_str(&format!("  {}: {}\n", p.name, p.value.abbreviated()));
        }
    }

    if !analysis.effect.consequences.is_empty() {
        out.push_str("Consequences:\n");
        for c in &analysis.effect.consequences {
            out.push_str(&format!("  - {c}\n"));
        }
    }
    let warnings: Vec<&String> = analysis
        .effect
        .warnings
        .iter()
        .chain(
            analysis
                .trust_context
                .iter()
                .flat_map(|ctx| ctx.warnings.iter()),
        )
        .collect();
    if !warnings.is_empty() {
        out.push_str("Warnings:\n");
        for w in warnings {
            out.push_str(&format!("  - {w}\n"));
        }
    }
    if let Some(batch) = &analysis.batch {
        out.push_str(&format!(
            "Batch: {} sub-call(s); {} ok, {} warn, {} danger, {} unknown\n",
            batch.calls.len(),
            batch.counts.ok,
            batch.counts.warn,
            batch.counts.danger,
            batch.counts.unknown
        ));
    }
    out
}
