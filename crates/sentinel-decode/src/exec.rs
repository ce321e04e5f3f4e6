// SPDX-License-Identifier: MIT OR Apache-2.0
//! Unwrapping Safe `execTransaction` calldata.
//!
//! The transaction-fetch surface uses this to surface the inner
//! `(to, value, data, operation)` of a fetched Safe transaction and
//! re-enter the decoder on the real call.

use alloy_primitives::{Address, U256};
use sentinel_abi::{decode_params, parse_signature};
use sentinel_types::{Operation, Selector};

/// Canonical `execTransaction` signature.
pub const EXEC_TRANSACTION_SIGNATURE: &str =
    "execTransaction(address,uint256,bytes,uint8,uint256,uint256,uint256,address,address,bytes)";

/// The inner call wrapped by an `execTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerCall {
    /// Inner target.
    pub to: Address,
    /// Inner wei value.
    pub value: U256,
    /// Inner calldata.
    pub data: Vec<u8>,
    /// Inner operation; 1 means DELEGATECALL.
    pub operation: Operation,
}

/// Failures while unwrapping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecUnwrapError {
    /// The selector is not `execTransaction`.
    #[error("calldata is not an execTransaction call")]
    NotExecTransaction,
    /// The arguments did not decode against the canonical signature.
    #[error("execTransaction arguments did not decode: {0}")]
    BadArguments(String),
}

/// The `execTransaction` selector, derived from the canonical signature.
pub fn exec_transaction_selector() -> Selector {
    Selector(sentinel_abi::selector_of(EXEC_TRANSACTION_SIGNATURE))
}

/// Decode `execTransaction` calldata (selector included) into the wrapped
/// inner call.
pub fn unwrap_exec_transaction(calldata: &[u8]) -> Result<InnerCall, ExecUnwrapError> {
    if calldata.len() < 4 || calldata[..4] != exec_transaction_selector().0 {
        return Err(ExecUnwrapError::NotExecTransaction);
    }
    let parsed = parse_signature(EXEC_TRANSACTION_SIGNATURE)
        .expect("canonical signature parses");
    let values = decode_params(&parsed.inputs, &calldata[4..])
        .map_err(|e| ExecUnwrapError::BadArguments(e.to_string()))?;

    let to = values[0]
        .as_address()
        .ok_or_else(|| ExecUnwrapError::BadArguments("to is not an address".into()))?;
    let value = values[1]
        .as_uint()
        .ok_or_else(|| ExecUnwrapError::BadArguments("value is not a uint".into()))?;
    let data = values[2]
        .as_bytes()
        .ok_or_else(|| ExecUnwrapError::BadArguments("data is not bytes".into()))?
        .to_vec();
    let operation = values[3]
        .as_uint()
        .filter(|op| *op <= U256::from(u8::MAX))
        .and_then(|op| Operation::from_byte(op.to::<u8>()))
        .ok_or_else(|| ExecUnwrapError::BadArguments("operation byte out of range".into()))?;

    Ok(InnerCall {
        to,
        value,
        data,
        operation,
    })
}
