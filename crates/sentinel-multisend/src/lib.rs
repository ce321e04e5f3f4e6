// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! sentinel-multisend
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Known canonical MultiSend deployments.
pub mod known;

pub use known::{known_deployments, MultiSendKind};

use alloy_primitives::{Address, U256};
use sentinel_types::{Operation, Selector};

/// The `multiSend(bytes)` selector.
pub const MULTISEND_SELECTOR: Selector = Selector([0x8d, 0x80, 0xff, 0x0a]);

/// One parsed sub-transaction of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCall {
    /// CALL or DELEGATECALL.
    pub operation: Operation,
    /// Target address.
    pub to: Address,
    /// Attached wei.
    pub value: U256,
    /// Inner calldata. Empty means a plain ETH transfer.
    pub data: Vec<u8>,
}

/// Structural batch parse failures. Any of these makes the whole batch
/// unparseable; the parser never partially succeeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MultiSendError {
    /// The outer selector is not `multiSend(bytes)`.
    #[error("outer selector is not multiSend(bytes)")]
    NotMultiSend,

    /// The payload ended before a required field.
    #[error("batch truncated: needed {wanted} bytes for {field} at offset {offset}")]
    Truncated {
        /// What was being read.
        field: &'static str,
        /// Byte offset of the read.
        offset: usize,
        /// Bytes the read needed.
        wanted: usize,
    },

    /// The ABI envelope offset word was not 32.
    #[error("bytes envelope offset must be 32, found {0}")]
    BadEnvelopeOffset(String),

    /// The declared payload length exceeds the remaining bytes.
    #[error("declared batch length {declared} exceeds remaining {remaining} bytes")]
    LengthOverflow {
        /// Declared packed-payload length.
        declared: String,
        /// Bytes actually remaining.
        remaining: usize,
    },

    /// An operation byte was neither 0 (CALL) nor 1 (DELEGATECALL).
    #[error("sub-transaction {index} has invalid operation byte {value}")]
    InvalidOperation {
        /// Index of the offending record.
        index: usize,
        /// The rejected byte.
        value: u8,
    },

    /// A record's declared data length exceeds the packed payload.
    #[error("sub-transaction {index} declares {declared} data bytes with {remaining} remaining")]
    DataOverrun {
        /// Index of the offending record.
        index: usize,
        /// Declared inner-calldata length.
        declared: String,
        /// Bytes actually remaining in the packed payload.
        remaining: usize,
    },

    /// Nonzero bytes followed the declared payload.
    #[error("unexpected trailing bytes after the packed payload")]
    TrailingBytes,

    /// A MultiSendCallOnly target carried a DELEGATECALL sub-operation.
    #[error(
        "sub-transaction {index} is a DELEGATECALL but the target is MultiSendCallOnly, \
         which forbids DELEGATECALL"
    )]
    DelegatecallInCallOnly {
        /// Index of the offending record.
        index: usize,
    },
}

/// Parse full `multiSend(bytes)` calldata (selector included) into its
/// sub-transactions, in input order.
///
/// When `outer_target` is a known MultiSendCallOnly deployment, any inner
/// DELEGATECALL makes the batch unparseable with the contradiction named.
pub fn parse_multisend(
    calldata: &[u8],
    outer_target: Option<&Address>,
) -> Result<Vec<SubCall>, MultiSendError> {
    if calldata.len() < 4 || calldata[..4] != MULTISEND_SELECTOR.0 {
        return Err(MultiSendError::NotMultiSend);
    }
    let body = &calldata[4..];

    let envelope_offset = read_word(body, 0, "bytes offset")?;
    if U256::from_be_slice(&envelope_offset) != U256::from(32u8) {
        return Err(MultiSendError::BadEnvelopeOffset(
            U256::from_be_slice(&envelope_offset).to_string(),
        ));
    }

    let length_word = read_word(body, 32, "bytes length")?;
    let declared = U256::from_be_slice(&length_word);
    let remaining = body.len() - 64;
    if declared > U256::from(remaining) {
        return Err(MultiSendError::LengthOverflow {
            declared: declared.to_string(),
            remaining,
        });
    }
    let packed_len = declared.to::<u64>() as usize;
    let packed = &body[64..64 + packed_len];

    // The ABI envelope pads the payload to a word boundary; anything
    // beyond the declared length must be zero padding.
    if body[64 + packed_len..].iter().any(|b| *b != 0) {
        return Err(MultiSendError::TrailingBytes);
    }

    let call_only = matches!(
        outer_target.and_then(|t| known_deployments().kind_of(t)),
        Some(MultiSendKind::CallOnly)
    );

    let mut calls = Vec::new();
    let mut cursor = 0usize;
    while cursor < packed.len() {
        let index = calls.len();

        let op_byte = *packed.get(cursor).ok_or(MultiSendError::Truncated {
            field: "operation",
            offset: cursor,
            wanted: 1,
        })?;
        let operation =
            Operation::from_byte(op_byte).ok_or(MultiSendError::InvalidOperation {
                index,
                value: op_byte,
            })?;
        cursor += 1;

        let to = take(packed, cursor, 20, "target address")?;
        let to = Address::from_slice(to);
        cursor += 20;

        let value_bytes = take(packed, cursor, 32, "value")?;
        let value = U256::from_be_slice(value_bytes);
        cursor += 32;

        let len_bytes = take(packed, cursor, 32, "data length")?;
        let data_len = U256::from_be_slice(len_bytes);
        cursor += 32;
        let available = packed.len() - cursor;
        if data_len > U256::from(available) {
            return Err(MultiSendError::DataOverrun {
                index,
                declared: data_len.to_string(),
                remaining: available,
            });
        }
        let data_len = data_len.to::<u64>() as usize;
        let data = packed[cursor..cursor + data_len].to_vec();
        cursor += data_len;

        if call_only && operation == Operation::DelegateCall {
            return Err(MultiSendError::DelegatecallInCallOnly { index });
        }

        calls.push(SubCall {
            operation,
            to,
            value,
            data,
        });
    }

    Ok(calls)
}

/// Encode sub-transactions into full `multiSend(bytes)` calldata, the
/// inverse of [`parse_multisend`].
pub fn encode_multisend(calls: &[SubCall]) -> Vec<u8> {
    let mut packed = Vec::new();
    for call in calls {
        packed.push(call.operation.as_byte());
        packed.extend_from_slice(call.to.as_slice());
        packed.extend_from_slice(&call.value.to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(call.data.len()).to_be_bytes::<32>());
        packed.extend_from_slice(&call.data);
    }

    let mut out = Vec::with_capacity(4 + 64 + packed.len() + 32);
    out.extend_from_slice(&MULTISEND_SELECTOR.0);
    out.extend_from_slice(&U256::from(32u8).to_be_bytes::<32>());
    out.extend_from_slice(&U256::from(packed.len()).to_be_bytes::<32>());
    out.extend_from_slice(&packed);
    let pad = packed.len().div_ceil(32) * 32 - packed.len();
    out.extend_from_slice(&vec![0u8; pad]);
    out
}

fn read_word(data: &[u8], at: usize, field: &'static str) -> Result<[u8; 32], MultiSendError> {
    if at + 32 > data.len() {
        return Err(MultiSendError::Truncated {
            field,
            offset: at,
            wanted: 32,
        });
    }
    let mut w = [0u8; 32];
    w.copy_from_slice(&data[at..at + 32]);
    Ok(w)
}

fn take<'a>(
    data: &'a [u8],
    at: usize,
    len: usize,
    field: &'static str,
) -> Result<&'a [u8], MultiSendError> {
    if at + len > data.len() {
        return Err(MultiSendError::Truncated {
            field,
            offset: at,
            wanted: len,
        });
    }
    Ok(&data[at..at + len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn sample_calls() -> Vec<SubCall> {
        vec![
            SubCall {
                operation: Operation::Call,
                to: addr(0x11),
                value: U256::ZERO,
                data: vec![0x09, 0x5e, 0xa7, 0xb3, 0xff],
            },
            SubCall {
                operation: Operation::DelegateCall,
                to: addr(0x22),
                value: U256::from(7u8),
                data: vec![],
            },
        ]
    }

    #[test]
    fn encode_parse_round_trip() {
        let calls = sample_calls();
        let encoded = encode_multisend(&calls);
        let parsed = parse_multisend(&encoded, None).unwrap();
        assert_eq!(parsed, calls);
    }

    #[test]
    fn order_is_preserved() {
        let calls: Vec<SubCall> = (0u8..9)
            .map(|i| SubCall {
                operation: Operation::Call,
                to: addr(i),
                value: U256::from(i),
                data: vec![i; usize::from(i)],
            })
            .collect();
        let parsed = parse_multisend(&encode_multisend(&calls), None).unwrap();
        for (i, call) in parsed.iter().enumerate() {
            assert_eq!(call.to, addr(i as u8));
        }
    }

    #[test]
    fn wrong_selector_is_not_multisend() {
        let err = parse_multisend(&[0xde, 0xad, 0xbe, 0xef], None).unwrap_err();
        assert_eq!(err, MultiSendError::NotMultiSend);
    }

    #[test]
    fn bad_envelope_offset_fails() {
        let mut data = MULTISEND_SELECTOR.0.to_vec();
        data.extend_from_slice(&U256::from(64u8).to_be_bytes::<32>());
        data.extend_from_slice(&U256::ZERO.to_be_bytes::<32>());
        let err = parse_multisend(&data, None).unwrap_err();
        assert!(matches!(err, MultiSendError::BadEnvelopeOffset(_)));
    }

    #[test]
    fn declared_length_beyond_payload_fails() {
        let mut data = MULTISEND_SELECTOR.0.to_vec();
        data.extend_from_slice(&U256::from(32u8).to_be_bytes::<32>());
        data.extend_from_slice(&U256::from(1_000u64).to_be_bytes::<32>());
        let err = parse_multisend(&data, None).unwrap_err();
        assert!(matches!(err, MultiSendError::LengthOverflow { .. }));
    }

    #[test]
    fn operation_byte_out_of_range_fails() {
        let calls = vec![SubCall {
            operation: Operation::Call,
            to: addr(1),
            value: U256::ZERO,
            data: vec![],
        }];
        let mut encoded = encode_multisend(&calls);
        // First packed byte is the operation.
        encoded[4 + 64] = 2;
        let err = parse_multisend(&encoded, None).unwrap_err();
        assert_eq!(
            err,
            MultiSendError::InvalidOperation { index: 0, value: 2 }
        );
    }

    #[test]
    fn record_data_overrun_fails() {
        let calls = vec![SubCall {
            operation: Operation::Call,
            to: addr(1),
            value: U256::ZERO,
            data: vec![0xaa; 4],
        }];
        let mut encoded = encode_multisend(&calls);
        // Bump the record's declared data length past the payload.
        let len_offset = 4 + 64 + 1 + 20 + 32 + 31;
        encoded[len_offset] = 0xff;
        let err = parse_multisend(&encoded, None).unwrap_err();
        // Either the envelope or the record catches it, but it must fail.
        assert!(matches!(
            err,
            MultiSendError::DataOverrun { .. } | MultiSendError::LengthOverflow { .. }
        ));
    }

    #[test]
    fn trailing_partial_record_fails() {
        let calls = sample_calls();
        let mut encoded = encode_multisend(&calls);
        // Append a stray half-record inside the declared length.
        let extra = [1u8, 0xab, 0xcd];
        let old_packed_len = {
            let w: [u8; 32] = encoded[4 + 32..4 + 64].try_into().unwrap();
            U256::from_be_slice(&w).to::<u64>() as usize
        };
        encoded.truncate(4 + 64 + old_packed_len);
        encoded.extend_from_slice(&extra);
        let new_len = U256::from(old_packed_len + extra.len());
        encoded[4 + 32..4 + 64].copy_from_slice(&new_len.to_be_bytes::<32>());
        let err = parse_multisend(&encoded, None).unwrap_err();
        assert!(matches!(err, MultiSendError::Truncated { .. }));
    }

    #[test]
    fn nonzero_trailing_bytes_fail() {
        let mut encoded = encode_multisend(&sample_calls());
        encoded.push(0x01);
        let err = parse_multisend(&encoded, None).unwrap_err();
        assert!(matches!(
            err,
            MultiSendError::TrailingBytes | MultiSendError::Truncated { .. }
        ));
    }

    #[test]
    fn delegatecall_under_call_only_target_contradicts() {
        let call_only =
            Address::from_str("0x9641d764fc13c8b624c04430c7356c1c7c8102e2").unwrap();
        let encoded = encode_multisend(&sample_calls());
        let err = parse_multisend(&encoded, Some(&call_only)).unwrap_err();
        assert_eq!(err, MultiSendError::DelegatecallInCallOnly { index: 1 });
    }

    #[test]
    fn delegatecall_under_full_multisend_target_parses() {
        let full = Address::from_str("0xa238cbeb142c10ef7ad8442c6d1f9e89e07e7761").unwrap();
        let encoded = encode_multisend(&sample_calls());
        assert!(parse_multisend(&encoded, Some(&full)).is_ok());
    }

    #[test]
    fn empty_batch_parses_to_no_calls() {
        let encoded = encode_multisend(&[]);
        assert_eq!(parse_multisend(&encoded, None).unwrap(), vec![]);
    }
}
