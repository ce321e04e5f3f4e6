// SPDX-License-Identifier: MIT OR Apache-2.0
//! Function signature parsing and selector derivation.

use crate::{AbiError, AbiType};
use alloy_primitives::keccak256;

/// A signature split into its name and parameter types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    /// The bare function name.
    pub name: String,
    /// Parameter types, in order.
    pub inputs: Vec<AbiType>,
}

impl ParsedSignature {
    /// Re-print the canonical signature string.
    pub fn canonical(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(AbiType::canonical).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// The 4-byte selector of the canonical signature.
    pub fn selector(&self) -> [u8; 4] {
        selector_of(&self.canonical())
    }
}

/// Split a comma-separated type list, tracking parenthesis depth so nested
/// tuples are preserved. `"address,(uint256,bytes)[],bool"` yields three
/// tokens.
pub fn split_types(inner: &str) -> Vec<&str> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(inner[start..].trim());
    out
}

/// Parse `name(t1,t2,…)` into a [`ParsedSignature`].
pub fn parse_signature(sig: &str) -> Result<ParsedSignature, AbiError> {
    let sig = sig.trim();
    let open = sig
        .find('(')
        .ok_or_else(|| AbiError::InvalidSignature(sig.to_string()))?;
    if !sig.ends_with(')') || open == 0 {
        return Err(AbiError::InvalidSignature(sig.to_string()));
    }
    let name = &sig[..open];
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(AbiError::InvalidSignature(sig.to_string()));
    }
    let inner = &sig[open + 1..sig.len() - 1];
    let inputs = split_types(inner)
        .into_iter()
        .map(AbiType::parse)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ParsedSignature {
        name: name.to_string(),
        inputs,
    })
}

/// First 4 bytes of `keccak256(signature)`.
pub fn selector_of(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}
