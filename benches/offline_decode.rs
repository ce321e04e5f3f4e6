// SPDX-License-Identifier: MIT OR Apache-2.0
//! Latency of a full offline decode, single and batch.

use alloy_primitives::{Address, U256};
use calldata_sentinel::abi::{encode_params, AbiValue};
use calldata_sentinel::decode::{DecodeRequest, Decoder};
use calldata_sentinel::multisend::{encode_multisend, SubCall};
use calldata_sentinel::profile::load_str;
use calldata_sentinel::types::Operation;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";

fn approve_calldata() -> String {
    let mut bytes = vec![0x09, 0x5e, 0xa7, 0xb3];
    bytes.extend_from_slice(&encode_params(&[
        AbiValue::Address(Address::repeat_byte(0xde)),
        AbiValue::Uint(U256::from(1_000_000u64)),
    ]));
    format!("0x{}", hex::encode(bytes))
}

fn bench_decode(c: &mut Criterion) {
    let decoder = Decoder::offline();
    let profile = load_str(&format!(
        r#"{{
            "version": "1",
            "trustedContracts": {{
                "{WETH}": {{ "label": "WETH", "trustLevel": "PROTOCOL" }}
            }}
        }}"#
    ))
    .profile()
    .unwrap()
    .clone();
    let target: Address = WETH.parse().unwrap();
    let calldata = approve_calldata();

    c.bench_function("offline_decode_approve", |b| {
        b.iter(|| {
            decoder
                .decode_offline(black_box(DecodeRequest {
                    calldata: &calldata,
                    to: Some(&target),
                    operation: Operation::Call,
                    profile: Some(&profile),
                    profile_error: None,
                }))
                .unwrap()
        })
    });

    let batch_calldata = {
        let inner: Vec<u8> = {
            let mut b = vec![0x09, 0x5e, 0xa7, 0xb3];
            b.extend_from_slice(&encode_params(&[
                AbiValue::Address(Address::repeat_byte(0x11)),
                AbiValue::Uint(U256::from(5u8)),
            ]));
            b
        };
        let calls: Vec<SubCall> = (0..10)
            .map(|i| SubCall {
                operation: Operation::Call,
                to: Address::repeat_byte(i as u8),
                value: U256::ZERO,
                data: inner.clone(),
            })
            .collect();
        format!("0x{}", hex::encode(encode_multisend(&calls)))
    };

    c.bench_function("offline_decode_batch_10", |b| {
        b.iter(|| {
            decoder
                .decode_offline(black_box(DecodeRequest::new(&batch_calldata)))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
