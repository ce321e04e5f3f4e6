// SPDX-License-Identifier: MIT OR Apache-2.0
//! Throughput of the packed MultiSend parser.

use alloy_primitives::{Address, U256};
use calldata_sentinel::multisend::{encode_multisend, parse_multisend, SubCall};
use calldata_sentinel::types::Operation;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn batch_of(n: usize) -> Vec<u8> {
    let calls: Vec<SubCall> = (0..n)
        .map(|i| SubCall {
            operation: Operation::Call,
            to: Address::repeat_byte(i as u8),
            value: U256::from(i as u64),
            data: vec![0xab; 68],
        })
        .collect();
    encode_multisend(&calls)
}

fn bench_parse(c: &mut Criterion) {
    let small = batch_of(2);
    let large = batch_of(50);

    c.bench_function("multisend_parse_2", |b| {
        b.iter(|| parse_multisend(black_box(&small), None).unwrap())
    });
    c.bench_function("multisend_parse_50", |b| {
        b.iter(|| parse_multisend(black_box(&large), None).unwrap())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
