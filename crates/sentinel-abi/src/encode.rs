// SPDX-License-Identifier: MIT OR Apache-2.0
//! Value-driven ABI encoding.
//!
//! Covers the subset needed to build calldata from decoded values: all
//! elementary types, dynamic blobs, dynamic arrays, and tuples. Arrays
//! always encode as `T[]`; fixed-size arrays are decode-only.

use crate::AbiValue;
use alloy_primitives::U256;

/// Encode a parameter sequence (the body of a call, without selector).
pub fn encode_params(values: &[AbiValue]) -> Vec<u8> {
    encode_sequence(values)
}

fn is_dynamic(value: &AbiValue) -> bool {
    match value {
        AbiValue::Bytes(_) | AbiValue::String(_) | AbiValue::Array(_) => true,
        AbiValue::Tuple(members) => members.iter().any(is_dynamic),
        _ => false,
    }
}

fn head_size(value: &AbiValue) -> usize {
    if is_dynamic(value) {
        return 32;
    }
    match value {
        AbiValue::Tuple(members) => members.iter().map(head_size).sum(),
        _ => 32,
    }
}

fn encode_sequence(values: &[AbiValue]) -> Vec<u8> {
    let head_len: usize = values.iter().map(head_size).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for value in values {
        if is_dynamic(value) {
            let offset = U256::from(head_len + tail.len());
            head.extend_from_slice(&offset.to_be_bytes::<32>());
            tail.extend_from_slice(&encode_tail(value));
        } else {
            encode_static(value, &mut head);
        }
    }
    head.extend_from_slice(&tail);
    head
}

fn encode_static(value: &AbiValue, out: &mut Vec<u8>) {
    match value {
        AbiValue::Address(a) => {
            out.extend_from_slice(&[0u8; 12]);
            out.extend_from_slice(a.as_slice());
        }
        AbiValue::Bool(b) => {
            let mut w = [0u8; 32];
            w[31] = u8::from(*b);
            out.extend_from_slice(&w);
        }
        AbiValue::Uint(u) => out.extend_from_slice(&u.to_be_bytes::<32>()),
        AbiValue::Int(i) => out.extend_from_slice(&i.to_be_bytes::<32>()),
        AbiValue::FixedBytes(b) => {
            let mut w = [0u8; 32];
            w[..b.len().min(32)].copy_from_slice(&b[..b.len().min(32)]);
            out.extend_from_slice(&w);
        }
        AbiValue::Tuple(members) => {
            for m in members {
                encode_static(m, out);
            }
        }
        // Dynamic values never reach here.
        _ => unreachable!("dynamic value in static position"),
    }
}

fn encode_tail(value: &AbiValue) -> Vec<u8> {
    match value {
        AbiValue::Bytes(b) => encode_blob(b),
        AbiValue::String(s) => encode_blob(s.as_bytes()),
        AbiValue::Array(items) => {
            let mut out = Vec::new();
            out.extend_from_slice(&U256::from(items.len()).to_be_bytes::<32>());
            out.extend_from_slice(&encode_sequence(items));
            out
        }
        AbiValue::Tuple(members) => encode_sequence(members),
        _ => unreachable!("static value in tail position"),
    }
}

fn encode_blob(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 + data.len().div_ceil(32) * 32);
    out.extend_from_slice(&U256::from(data.len()).to_be_bytes::<32>());
    out.extend_from_slice(data);
    let pad = data.len().div_ceil(32) * 32 - data.len();
    out.extend_from_slice(&vec![0u8; pad]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    #[test]
    fn static_sequence_is_heads_only() {
        let data = encode_params(&[
            AbiValue::Address(Address::repeat_byte(1)),
            AbiValue::Uint(U256::from(2u8)),
        ]);
        assert_eq!(data.len(), 64);
        assert_eq!(data[31], 0x01);
        assert_eq!(data[63], 0x02);
    }

    #[test]
    fn blob_is_padded_to_word_boundary() {
        let data = encode_params(&[AbiValue::Bytes(vec![0xaa; 5])]);
        // offset word + length word + one padded data word
        assert_eq!(data.len(), 96);
        assert_eq!(data[31], 32);
        assert_eq!(data[63], 5);
        assert_eq!(&data[64..69], &[0xaa; 5]);
        assert!(data[69..].iter().all(|b| *b == 0));
    }

    #[test]
    fn empty_blob_is_just_length_word() {
        let data = encode_params(&[AbiValue::Bytes(vec![])]);
        assert_eq!(data.len(), 64);
        assert!(data[32..].iter().all(|b| *b == 0));
    }
}
