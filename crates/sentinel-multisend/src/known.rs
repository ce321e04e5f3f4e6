// SPDX-License-Identifier: MIT OR Apache-2.0
//! Known canonical MultiSend deployments.
//!
//! The address→kind map is single-valued with full-MultiSend precedence:
//! the upstream deployment list carries one v1.1.1-era address in both
//! buckets, and the collision is flagged at construction instead of
//! guessed at classify time.

use alloy_primitives::Address;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

/// Whether a deployment permits DELEGATECALL sub-operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiSendKind {
    /// Full MultiSend: CALL and DELEGATECALL sub-operations.
    Full,
    /// MultiSendCallOnly: CALL sub-operations only.
    CallOnly,
}

/// Canonical full-MultiSend deployments (v1.1.1 through v1.4.1).
const FULL_DEPLOYMENTS: &[&str] = &[
    "0x8d29be29923b68abfdd21e541b9374737b49cdad",
    "0xa238cbeb142c10ef7ad8442c6d1f9e89e07e7761",
    "0x998739bfdaadde7c933b942a68053933098f9eda",
    "0x38869bf66a61cf6bdb996a6ae40d5853fd43b526",
    // Carried in the upstream v1.1.1 list as well as the CallOnly list;
    // resolved with full-MultiSend precedence and flagged at build time.
    "0x40a2accbd92bca938b02010e17a5b8929b49130d",
];

/// Canonical MultiSendCallOnly deployments (v1.3.0 and v1.4.1).
const CALL_ONLY_DEPLOYMENTS: &[&str] = &[
    "0x40a2accbd92bca938b02010e17a5b8929b49130d",
    "0xa1dabef33b3b82c7814b6d82a79e50f4ac44102b",
    "0x9641d764fc13c8b624c04430c7356c1c7c8102e2",
];

/// The deployment table.
#[derive(Debug, Clone)]
pub struct KnownDeployments {
    map: HashMap<Address, MultiSendKind>,
}

impl KnownDeployments {
    fn build() -> Self {
        let mut map = HashMap::new();
        for s in CALL_ONLY_DEPLOYMENTS {
            let addr = Address::from_str(s).expect("static deployment address");
            map.insert(addr, MultiSendKind::CallOnly);
        }
        for s in FULL_DEPLOYMENTS {
            let addr = Address::from_str(s).expect("static deployment address");
            if map.insert(addr, MultiSendKind::Full) == Some(MultiSendKind::CallOnly) {
                warn!(
                    address = %s,
                    "deployment listed as both MultiSend and MultiSendCallOnly; \
                     treating as full MultiSend"
                );
            }
        }
        Self { map }
    }

    /// The kind of a deployment, if the address is known at all.
    pub fn kind_of(&self, address: &Address) -> Option<MultiSendKind> {
        self.map.get(address).copied()
    }

    /// Number of known deployments.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty (it never is).
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The canonical deployment table.
pub fn known_deployments() -> KnownDeployments {
    KnownDeployments::build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_address_resolves_to_full_multisend() {
        let table = known_deployments();
        let ambiguous =
            Address::from_str("0x40a2accbd92bca938b02010e17a5b8929b49130d").unwrap();
        assert_eq!(table.kind_of(&ambiguous), Some(MultiSendKind::Full));
    }

    #[test]
    fn call_only_deployments_resolve() {
        let table = known_deployments();
        let call_only =
            Address::from_str("0x9641d764fc13c8b624c04430c7356c1c7c8102e2").unwrap();
        assert_eq!(table.kind_of(&call_only), Some(MultiSendKind::CallOnly));
    }

    #[test]
    fn unknown_address_is_unknown() {
        let table = known_deployments();
        assert_eq!(table.kind_of(&Address::repeat_byte(0x77)), None);
    }

    #[test]
    fn collision_is_the_only_overlap() {
        // One address is deliberately listed in both buckets.
        let table = known_deployments();
        assert_eq!(
            table.len(),
            FULL_DEPLOYMENTS.len() + CALL_ONLY_DEPLOYMENTS.len() - 1
        );
    }
}
