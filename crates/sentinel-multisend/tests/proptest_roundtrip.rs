// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property test: `parse(encode(xs)) == xs` for well-formed sub-calls.

use alloy_primitives::{Address, U256};
use proptest::prelude::*;
use sentinel_multisend::{encode_multisend, parse_multisend, SubCall};
use sentinel_types::Operation;

fn sub_call() -> impl Strategy<Value = SubCall> {
    (
        any::<bool>(),
        any::<[u8; 20]>(),
        any::<[u8; 32]>(),
        prop::collection::vec(any::<u8>(), 0..200),
    )
        .prop_map(|(delegate, to, value, data)| SubCall {
            operation: if delegate {
                Operation::DelegateCall
            } else {
                Operation::Call
            },
            to: Address::from_slice(&to),
            value: U256::from_be_slice(&value),
            data,
        })
}

proptest! {
    #[test]
    fn round_trip(calls in prop::collection::vec(sub_call(), 0..12)) {
        let encoded = encode_multisend(&calls);
        let parsed = parse_multisend(&encoded, None).expect("well-formed batch parses");
        prop_assert_eq!(parsed, calls);
    }

    #[test]
    fn parser_never_panics_on_noise(mut data in prop::collection::vec(any::<u8>(), 0..600)) {
        // Force the selector so the parser gets past the gate.
        if data.len() >= 4 {
            data[..4].copy_from_slice(&[0x8d, 0x80, 0xff, 0x0a]);
        }
        let _ = parse_multisend(&data, None);
    }
}
