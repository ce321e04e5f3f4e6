// SPDX-License-Identifier: MIT OR Apache-2.0
//! The Solidity ABI type grammar: elementary types, arrays, and tuples.

use crate::AbiError;
use std::fmt;

/// A parsed Solidity parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `string` (dynamic)
    String,
    /// `bytes` (dynamic)
    Bytes,
    /// `bytesN`, 1 ≤ N ≤ 32
    FixedBytes(usize),
    /// `uintN`, N a multiple of 8 up to 256; bare `uint` is 256
    Uint(usize),
    /// `intN`; bare `int` is 256
    Int(usize),
    /// `T[]` (dynamic)
    Array(Box<AbiType>),
    /// `T[N]`
    FixedArray(Box<AbiType>, usize),
    /// `(T1,T2,…)`
    Tuple(Vec<AbiType>),
}

impl AbiType {
    /// Parse one type token, e.g. `uint256`, `(address,uint256)[]`.
    pub fn parse(token: &str) -> Result<Self, AbiError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AbiError::UnsupportedType(String::new()));
        }

        // Array suffixes bind outermost-rightmost: `uint8[2][]` is a
        // dynamic array of `uint8[2]`.
        if let Some(rest) = token.strip_suffix("[]") {
            return Ok(AbiType::Array(Box::new(AbiType::parse(rest)?)));
        }
        if token.ends_with(']') {
            let open = token
                .rfind('[')
                .ok_or_else(|| AbiError::UnsupportedType(token.to_string()))?;
            let n: usize = token[open + 1..token.len() - 1]
                .parse()
                .map_err(|_| AbiError::UnsupportedType(token.to_string()))?;
            if n == 0 {
                return Err(AbiError::UnsupportedType(token.to_string()));
            }
            return Ok(AbiType::FixedArray(
                Box::new(AbiType::parse(&token[..open])?),
                n,
            ));
        }

        if let Some(inner) = token.strip_prefix('(') {
            let inner = inner
                .strip_suffix(')')
                .ok_or_else(|| AbiError::UnsupportedType(token.to_string()))?;
            let members = crate::signature::split_types(inner)
                .into_iter()
                .map(AbiType::parse)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(AbiType::Tuple(members));
        }

        match token {
            "address" => Ok(AbiType::Address),
            "bool" => Ok(AbiType::Bool),
            "string" => Ok(AbiType::String),
            "bytes" => Ok(AbiType::Bytes),
            "uint" => Ok(AbiType::Uint(256)),
            "int" => Ok(AbiType::Int(256)),
            "function" => Ok(AbiType::FixedBytes(24)),
            _ => {
                if let Some(bits) = token.strip_prefix("uint") {
                    let bits: usize = bits
                        .parse()
                        .map_err(|_| AbiError::UnsupportedType(token.to_string()))?;
                    if bits == 0 || bits > 256 || bits % 8 != 0 {
                        return Err(AbiError::UnsupportedType(token.to_string()));
                    }
                    Ok(AbiType::Uint(bits))
                } else if let Some(bits) = token.strip_prefix("int") {
                    let bits: usize = bits
                        .parse()
                        .map_err(|_| AbiError::UnsupportedType(token.to_string()))?;
                    if bits == 0 || bits > 256 || bits % 8 != 0 {
                        return Err(AbiError::UnsupportedType(token.to_string()));
                    }
                    Ok(AbiType::Int(bits))
                } else if let Some(n) = token.strip_prefix("bytes") {
                    let n: usize = n
                        .parse()
                        .map_err(|_| AbiError::UnsupportedType(token.to_string()))?;
                    if n == 0 || n > 32 {
                        return Err(AbiError::UnsupportedType(token.to_string()));
                    }
                    Ok(AbiType::FixedBytes(n))
                } else {
                    Err(AbiError::UnsupportedType(token.to_string()))
                }
            }
        }
    }

    /// Whether values of this type live in the tail section.
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::String | AbiType::Bytes | AbiType::Array(_) => true,
            AbiType::FixedArray(inner, _) => inner.is_dynamic(),
            AbiType::Tuple(members) => members.iter().any(AbiType::is_dynamic),
            _ => false,
        }
    }

    /// Number of 32-byte head words a value of this type occupies.
    ///
    /// Dynamic types occupy a single offset word; static compound types
    /// occupy the sum of their members inline.
    pub fn head_words(&self) -> usize {
        if self.is_dynamic() {
            return 1;
        }
        match self {
            AbiType::FixedArray(inner, n) => inner.head_words() * n,
            AbiType::Tuple(members) => members.iter().map(AbiType::head_words).sum(),
            _ => 1,
        }
    }

    /// The canonical form used for selector derivation.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Address => f.write_str("address"),
            AbiType::Bool => f.write_str("bool"),
            AbiType::String => f.write_str("string"),
            AbiType::Bytes => f.write_str("bytes"),
            AbiType::FixedBytes(n) => write!(f, "bytes{n}"),
            AbiType::Uint(bits) => write!(f, "uint{bits}"),
            AbiType::Int(bits) => write!(f, "int{bits}"),
            AbiType::Array(inner) => write!(f, "{inner}[]"),
            AbiType::FixedArray(inner, n) => write!(f, "{inner}[{n}]"),
            AbiType::Tuple(members) => {
                f.write_str("(")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{m}")?;
                }
                f.write_str(")")
            }
        }
    }
}
