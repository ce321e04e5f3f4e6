// SPDX-License-Identifier: MIT OR Apache-2.0
//! Standard head/tail ABI decoding.
//!
//! Parameter data is a head section of 32-byte words followed by a tail.
//! Static values live inline in the head; dynamic values leave an offset
//! word behind and live in the tail, with offsets relative to the start of
//! the enclosing sequence.

use crate::{AbiError, AbiType, AbiValue};
use alloy_primitives::{Address, I256, U256};

/// Decode `data` against the given parameter types.
pub fn decode_params(types: &[AbiType], data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    decode_sequence(types, data, 0)
}

/// Decode a sequence of values whose heads start at `base`.
fn decode_sequence(types: &[AbiType], data: &[u8], base: usize) -> Result<Vec<AbiValue>, AbiError> {
    let mut cursor = base;
    let mut out = Vec::with_capacity(types.len());
    for ty in types {
        if ty.is_dynamic() {
            let off = read_offset(data, cursor)?;
            let loc = base
                .checked_add(off)
                .filter(|loc| *loc <= data.len())
                .ok_or(AbiError::InvalidOffset(cursor))?;
            out.push(decode_tail(ty, data, loc)?);
            cursor += 32;
        } else {
            out.push(decode_static(ty, data, cursor)?);
            cursor += ty.head_words() * 32;
        }
    }
    Ok(out)
}

/// Decode a static value stored inline at `at`.
fn decode_static(ty: &AbiType, data: &[u8], at: usize) -> Result<AbiValue, AbiError> {
    match ty {
        AbiType::Address => {
            let w = word(data, at)?;
            Ok(AbiValue::Address(Address::from_slice(&w[12..])))
        }
        AbiType::Bool => {
            let w = word(data, at)?;
            Ok(AbiValue::Bool(w[31] != 0))
        }
        AbiType::Uint(_) => {
            let w = word(data, at)?;
            Ok(AbiValue::Uint(U256::from_be_slice(&w)))
        }
        AbiType::Int(_) => {
            let w = word(data, at)?;
            // Narrow ints arrive sign-extended to the full word.
            Ok(AbiValue::Int(I256::from_raw(U256::from_be_slice(&w))))
        }
        AbiType::FixedBytes(n) => {
            let w = word(data, at)?;
            Ok(AbiValue::FixedBytes(w[..*n].to_vec()))
        }
        AbiType::FixedArray(inner, n) => {
            let mut items = Vec::with_capacity(*n);
            let stride = inner.head_words() * 32;
            for i in 0..*n {
                items.push(decode_static(inner, data, at + i * stride)?);
            }
            Ok(AbiValue::Array(items))
        }
        AbiType::Tuple(members) => Ok(AbiValue::Tuple(decode_sequence(members, data, at)?)),
        // Dynamic types never reach here.
        _ => Err(AbiError::InvalidOffset(at)),
    }
}

/// Decode a dynamic value whose tail starts at `at`.
fn decode_tail(ty: &AbiType, data: &[u8], at: usize) -> Result<AbiValue, AbiError> {
    match ty {
        AbiType::Bytes => Ok(AbiValue::Bytes(read_blob(data, at)?)),
        AbiType::String => {
            let raw = read_blob(data, at)?;
            let s = String::from_utf8(raw).map_err(|_| AbiError::InvalidUtf8)?;
            Ok(AbiValue::String(s))
        }
        AbiType::Array(inner) => {
            let len = read_length(data, at)?;
            let elem_min = if inner.is_dynamic() {
                32
            } else {
                inner.head_words() * 32
            };
            let remaining = data.len().saturating_sub(at + 32);
            if len.saturating_mul(elem_min) > remaining {
                return Err(AbiError::OversizedLength {
                    at,
                    len: len.to_string(),
                });
            }
            decode_elements(inner, data, at + 32, len)
        }
        AbiType::FixedArray(inner, n) => decode_elements(inner, data, at, *n),
        AbiType::Tuple(members) => Ok(AbiValue::Tuple(decode_sequence(members, data, at)?)),
        // Static types never reach here.
        _ => Err(AbiError::InvalidOffset(at)),
    }
}

/// Decode `count` homogeneous elements whose sequence begins at `base`.
fn decode_elements(
    inner: &AbiType,
    data: &[u8],
    base: usize,
    count: usize,
) -> Result<AbiValue, AbiError> {
    let mut items = Vec::with_capacity(count);
    let mut cursor = base;
    for _ in 0..count {
        if inner.is_dynamic() {
            let off = read_offset(data, cursor)?;
            let loc = base
                .checked_add(off)
                .filter(|loc| *loc <= data.len())
                .ok_or(AbiError::InvalidOffset(cursor))?;
            items.push(decode_tail(inner, data, loc)?);
            cursor += 32;
        } else {
            items.push(decode_static(inner, data, cursor)?);
            cursor += inner.head_words() * 32;
        }
    }
    Ok(AbiValue::Array(items))
}

/// A length-prefixed byte blob at `at`; trailing padding is ignored.
fn read_blob(data: &[u8], at: usize) -> Result<Vec<u8>, AbiError> {
    let len = read_length(data, at)?;
    let start = at + 32;
    if start + len > data.len() {
        return Err(AbiError::OutOfBounds {
            offset: start,
            wanted: len,
            have: data.len().saturating_sub(start),
        });
    }
    Ok(data[start..start + len].to_vec())
}

fn word(data: &[u8], at: usize) -> Result<[u8; 32], AbiError> {
    if at + 32 > data.len() {
        return Err(AbiError::OutOfBounds {
            offset: at,
            wanted: 32,
            have: data.len().saturating_sub(at),
        });
    }
    let mut w = [0u8; 32];
    w.copy_from_slice(&data[at..at + 32]);
    Ok(w)
}

/// An offset word must fit in usize; anything wider is structurally bogus.
fn read_offset(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let w = word(data, at)?;
    if w[..24].iter().any(|b| *b != 0) {
        return Err(AbiError::InvalidOffset(at));
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&w[24..]);
    Ok(u64::from_be_bytes(raw) as usize)
}

/// A length word must fit in usize and cannot exceed the payload.
fn read_length(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let w = word(data, at)?;
    if w[..24].iter().any(|b| *b != 0) {
        return Err(AbiError::OversizedLength {
            at,
            len: U256::from_be_slice(&w).to_string(),
        });
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&w[24..]);
    let len = u64::from_be_bytes(raw) as usize;
    if len > data.len() {
        return Err(AbiError::OversizedLength {
            at,
            len: len.to_string(),
        });
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_params;
    use crate::signature::parse_signature;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn decode_for(sig: &str, data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
        let parsed = parse_signature(sig).unwrap();
        decode_params(&parsed.inputs, data)
    }

    #[test]
    fn decode_approve_arguments() {
        let spender = addr(0xde);
        let amount = U256::from(10u8).pow(U256::from(18u8));
        let data = encode_params(&[AbiValue::Address(spender), AbiValue::Uint(amount)]);
        let values = decode_for("approve(address,uint256)", &data).unwrap();
        assert_eq!(values[0].as_address(), Some(spender));
        assert_eq!(values[1].as_uint(), Some(amount));
    }

    #[test]
    fn decode_dynamic_bytes() {
        let payload = vec![0x11u8; 37];
        let data = encode_params(&[
            AbiValue::Uint(U256::from(5u8)),
            AbiValue::Bytes(payload.clone()),
        ]);
        let values = decode_for("f(uint256,bytes)", &data).unwrap();
        assert_eq!(values[1].as_bytes(), Some(payload.as_slice()));
    }

    #[test]
    fn decode_address_array() {
        let path = vec![AbiValue::Address(addr(1)), AbiValue::Address(addr(2))];
        let data = encode_params(&[AbiValue::Array(path.clone())]);
        let values = decode_for("f(address[])", &data).unwrap();
        assert_eq!(values[0].as_array().unwrap().len(), 2);
        assert_eq!(values[0].as_array().unwrap()[1].as_address(), Some(addr(2)));
    }

    #[test]
    fn decode_tuple_with_dynamic_member() {
        let data = encode_params(&[AbiValue::Tuple(vec![
            AbiValue::Address(addr(9)),
            AbiValue::Bytes(vec![0xaa, 0xbb, 0xcc]),
        ])]);
        let values = decode_for("f((address,bytes))", &data).unwrap();
        let members = values[0].as_array().unwrap();
        assert_eq!(members[0].as_address(), Some(addr(9)));
        assert_eq!(members[1].as_bytes(), Some([0xaa, 0xbb, 0xcc].as_slice()));
    }

    #[test]
    fn decode_exec_transaction_shape() {
        let sig = "execTransaction(address,uint256,bytes,uint8,uint256,uint256,uint256,address,address,bytes)";
        let inner_call = vec![0x09, 0x5e, 0xa7, 0xb3, 0x00, 0x01];
        let data = encode_params(&[
            AbiValue::Address(addr(0x51)),
            AbiValue::Uint(U256::ZERO),
            AbiValue::Bytes(inner_call.clone()),
            AbiValue::Uint(U256::from(1u8)),
            AbiValue::Uint(U256::ZERO),
            AbiValue::Uint(U256::ZERO),
            AbiValue::Uint(U256::ZERO),
            AbiValue::Address(Address::ZERO),
            AbiValue::Address(Address::ZERO),
            AbiValue::Bytes(vec![]),
        ]);
        let values = decode_for(sig, &data).unwrap();
        assert_eq!(values[0].as_address(), Some(addr(0x51)));
        assert_eq!(values[2].as_bytes(), Some(inner_call.as_slice()));
        assert_eq!(values[3].as_uint(), Some(U256::from(1u8)));
        assert_eq!(values[9].as_bytes(), Some([].as_slice()));
    }

    #[test]
    fn truncated_head_fails() {
        let err = decode_for("f(address,uint256)", &[0u8; 40]).unwrap_err();
        assert!(matches!(err, AbiError::OutOfBounds { .. }));
    }

    #[test]
    fn oversized_length_fails() {
        // Offset word points at a length word claiming more bytes than exist.
        let mut data = Vec::new();
        data.extend_from_slice(&U256::from(32u8).to_be_bytes::<32>());
        data.extend_from_slice(&U256::from(10_000u64).to_be_bytes::<32>());
        let err = decode_for("f(bytes)", &data).unwrap_err();
        assert!(matches!(err, AbiError::OversizedLength { .. }));
    }

    #[test]
    fn offset_beyond_payload_fails() {
        let mut data = Vec::new();
        data.extend_from_slice(&U256::from(1u32 << 20).to_be_bytes::<32>());
        let err = decode_for("f(bytes)", &data).unwrap_err();
        assert!(matches!(err, AbiError::InvalidOffset(_)));
    }

    #[test]
    fn huge_array_length_is_rejected_before_allocation() {
        let mut data = Vec::new();
        data.extend_from_slice(&U256::from(32u8).to_be_bytes::<32>());
        data.extend_from_slice(&U256::from(u64::MAX).to_be_bytes::<32>());
        let err = decode_for("f(uint256[])", &data).unwrap_err();
        assert!(matches!(err, AbiError::OversizedLength { .. }));
    }

    #[test]
    fn fixed_array_decodes_inline() {
        let mut data = Vec::new();
        data.extend_from_slice(&U256::from(3u8).to_be_bytes::<32>());
        data.extend_from_slice(&U256::from(4u8).to_be_bytes::<32>());
        let values = decode_for("f(uint256[2])", &data).unwrap();
        let items = values[0].as_array().unwrap();
        assert_eq!(items[0].as_uint(), Some(U256::from(3u8)));
        assert_eq!(items[1].as_uint(), Some(U256::from(4u8)));
    }

    #[test]
    fn negative_int_decodes_sign_extended() {
        let data = [0xffu8; 32];
        let values = decode_for("f(int256)", &data).unwrap();
        match &values[0] {
            AbiValue::Int(i) => assert_eq!(i.to_string(), "-1"),
            other => panic!("expected int, got {other:?}"),
        }
    }
}
