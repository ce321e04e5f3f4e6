// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parameter analyzers: a closed set of handlers that turn decoded
//! parameters into the attribute bag the effect analyzer consumes.
//!
//! One enum, one match. Analyzers are defensive: a parameter that is
//! missing or has an unexpected shape simply leaves its attribute unset
//! rather than failing the pipeline.

use alloy_primitives::{Address, U256};
use sentinel_abi::{is_effectively_unlimited, AbiValue};
use sentinel_types::{EffectScope, Operation};

/// Which analyzer a curated entry runs over its decoded parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analyzer {
    /// `approve(spender, amount)`
    Erc20Approve,
    /// `transfer(to, amount)`
    Erc20Transfer,
    /// `transferFrom(from, to, amount)`
    Erc20TransferFrom,
    /// `setApprovalForAll(operator, approved)`
    SetApprovalForAll,
    /// ERC-721 `safeTransferFrom` (both arities)
    Erc721Transfer,
    /// ERC-1155 single-id transfer
    Erc1155Transfer,
    /// ERC-1155 batch transfer
    Erc1155BatchTransfer,
    /// `transferOwnership(newOwner)`
    TransferOwnership,
    /// `renounceOwnership()`
    RenounceOwnership,
    /// `upgradeTo` / `upgradeToAndCall`
    UpgradeTo,
    /// EIP-2612 `permit`
    Permit,
    /// `enableModule(module)`
    EnableModule,
    /// `disableModule(prevModule, module)`
    DisableModule,
    /// `setFallbackHandler(handler)`
    SetFallbackHandler,
    /// `setGuard(guard)`
    SetGuard,
    /// `addOwnerWithThreshold(owner, _threshold)`
    AddOwner,
    /// `removeOwner(prevOwner, owner, _threshold)`
    RemoveOwner,
    /// `swapOwner(prevOwner, oldOwner, newOwner)`
    SwapOwner,
    /// `changeThreshold(_threshold)`
    ChangeThreshold,
    /// `execTransactionFromModule` (both variants)
    ModuleExec,
    /// Safe `execTransaction`
    ExecTransaction,
    /// WETH `deposit()`
    WethDeposit,
    /// WETH `withdraw(wad)`
    WethWithdraw,
    /// Uniswap V2 swaps; indices locate the recipient and input amount.
    UniswapSwap {
        /// Position of the `to` parameter.
        to_index: u8,
        /// Position of the bounded input amount, when the shape has one.
        amount_index: Option<u8>,
    },
    /// Uniswap V2 liquidity management; index locates the recipient.
    UniswapLiquidity {
        /// Position of the `to` parameter.
        to_index: u8,
    },
}

/// Attributes extracted from decoded parameters. Everything is optional:
/// the effect analyzer treats absence as "not established".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallAttributes {
    /// Bounded or open-ended, when determinable.
    pub scope: Option<EffectScope>,
    /// The amount being approved, moved, or withdrawn.
    pub amount: Option<U256>,
    /// The address gaining assets or power.
    pub beneficiary: Option<Address>,
    /// The token id for NFT operations.
    pub token_id: Option<U256>,
    /// The new signature threshold for Safe owner operations.
    pub new_threshold: Option<U256>,
    /// The inner operation for wrapped executions.
    pub inner_operation: Option<Operation>,
    /// The call takes back a previously granted permission.
    pub is_revocation: bool,
    /// The call executes foreign code in the wallet's context.
    pub is_delegate_call: bool,
    /// The call takes effect without the Safe's signature flow.
    pub bypasses_signatures: bool,
    /// The call gives a party standing execution rights.
    pub grants_autonomous_execution: bool,
    /// Once executed, the action cannot be undone.
    pub irreversible: bool,
}

fn address_at(params: &[AbiValue], index: usize) -> Option<Address> {
    params.get(index).and_then(AbiValue::as_address)
}

fn uint_at(params: &[AbiValue], index: usize) -> Option<U256> {
    params.get(index).and_then(AbiValue::as_uint)
}

fn bool_at(params: &[AbiValue], index: usize) -> Option<bool> {
    params.get(index).and_then(AbiValue::as_bool)
}

fn operation_at(params: &[AbiValue], index: usize) -> Option<Operation> {
    let op = uint_at(params, index)?;
    if op > U256::from(u8::MAX) {
        return None;
    }
    Operation::from_byte(op.to::<u8>())
}

fn approval_scope(amount: Option<U256>) -> Option<EffectScope> {
    amount.map(|a| {
        if is_effectively_unlimited(&a) {
            EffectScope::Unlimited
        } else {
            EffectScope::Exact
        }
    })
}

/// Run the analyzer over decoded parameters.
pub fn analyze_params(analyzer: Analyzer, params: &[AbiValue]) -> CallAttributes {
    let mut attrs = CallAttributes::default();
    match analyzer {
        Analyzer::Erc20Approve => {
            attrs.beneficiary = address_at(params, 0);
            attrs.amount = uint_at(params, 1);
            attrs.scope = approval_scope(attrs.amount);
            attrs.is_revocation = attrs.amount == Some(U256::ZERO);
        }
        Analyzer::Erc20Transfer => {
            attrs.beneficiary = address_at(params, 0);
            attrs.amount = uint_at(params, 1);
            attrs.scope = Some(EffectScope::Exact);
            attrs.irreversible = true;
        }
        Analyzer::Erc20TransferFrom => {
            attrs.beneficiary = address_at(params, 1);
            attrs.amount = uint_at(params, 2);
            attrs.scope = Some(EffectScope::Exact);
            attrs.irreversible = true;
        }
        Analyzer::SetApprovalForAll => {
            attrs.beneficiary = address_at(params, 0);
            let approved = bool_at(params, 1).unwrap_or(false);
            attrs.is_revocation = !approved;
            attrs.scope = Some(if approved {
                EffectScope::Unlimited
            } else {
                EffectScope::Exact
            });
        }
        Analyzer::Erc721Transfer => {
            attrs.beneficiary = address_at(params, 1);
            attrs.token_id = uint_at(params, 2);
            attrs.scope = Some(EffectScope::Exact);
            attrs.irreversible = true;
        }
        Analyzer::Erc1155Transfer => {
            attrs.beneficiary = address_at(params, 1);
            attrs.token_id = uint_at(params, 2);
            attrs.amount = uint_at(params, 3);
            attrs.scope = Some(EffectScope::Exact);
            attrs.irreversible = true;
        }
        Analyzer::Erc1155BatchTransfer => {
            attrs.beneficiary = address_at(params, 1);
            attrs.scope = Some(EffectScope::Exact);
            attrs.irreversible = true;
        }
        Analyzer::TransferOwnership => {
            attrs.beneficiary = address_at(params, 0);
        }
        Analyzer::RenounceOwnership => {
            attrs.irreversible = true;
        }
        Analyzer::UpgradeTo => {
            attrs.beneficiary = address_at(params, 0);
            attrs.scope = Some(EffectScope::Unlimited);
        }
        Analyzer::Permit => {
            attrs.beneficiary = address_at(params, 1);
            attrs.amount = uint_at(params, 2);
            attrs.scope = approval_scope(attrs.amount);
            attrs.is_revocation = attrs.amount == Some(U256::ZERO);
            attrs.bypasses_signatures = true;
        }
        Analyzer::EnableModule => {
            attrs.beneficiary = address_at(params, 0);
            attrs.grants_autonomous_execution = true;
        }
        Analyzer::DisableModule => {
            attrs.beneficiary = address_at(params, 1);
            attrs.is_revocation = true;
        }
        Analyzer::SetFallbackHandler => {
            attrs.beneficiary = address_at(params, 0);
        }
        Analyzer::SetGuard => {
            attrs.beneficiary = address_at(params, 0);
        }
        Analyzer::AddOwner => {
            attrs.beneficiary = address_at(params, 0);
            attrs.new_threshold = uint_at(params, 1);
        }
        Analyzer::RemoveOwner => {
            attrs.beneficiary = address_at(params, 1);
            attrs.new_threshold = uint_at(params, 2);
            attrs.is_revocation = true;
        }
        Analyzer::SwapOwner => {
            attrs.beneficiary = address_at(params, 2);
        }
        Analyzer::ChangeThreshold => {
            attrs.new_threshold = uint_at(params, 0);
        }
        Analyzer::ModuleExec => {
            attrs.beneficiary = address_at(params, 0);
            attrs.amount = uint_at(params, 1);
            attrs.bypasses_signatures = true;
            attrs.inner_operation = operation_at(params, 3);
            attrs.is_delegate_call = attrs.inner_operation == Some(Operation::DelegateCall);
        }
        Analyzer::ExecTransaction => {
            attrs.beneficiary = address_at(params, 0);
            attrs.amount = uint_at(params, 1);
            attrs.inner_operation = operation_at(params, 3);
            attrs.is_delegate_call = attrs.inner_operation == Some(Operation::DelegateCall);
        }
        Analyzer::WethDeposit => {
            attrs.scope = Some(EffectScope::Exact);
        }
        Analyzer::WethWithdraw => {
            attrs.amount = uint_at(params, 0);
            attrs.scope = Some(EffectScope::Exact);
        }
        Analyzer::UniswapSwap {
            to_index,
            amount_index,
        } => {
            attrs.beneficiary = address_at(params, to_index as usize);
            if let Some(i) = amount_index {
                attrs.amount = uint_at(params, i as usize);
            }
            attrs.scope = Some(EffectScope::Exact);
            attrs.irreversible = true;
        }
        Analyzer::UniswapLiquidity { to_index } => {
            attrs.beneficiary = address_at(params, to_index as usize);
            attrs.scope = Some(EffectScope::Exact);
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn approve_with_bounded_amount() {
        let attrs = analyze_params(
            Analyzer::Erc20Approve,
            &[
                AbiValue::Address(addr(0xde)),
                AbiValue::Uint(U256::from(1_000u64)),
            ],
        );
        assert_eq!(attrs.beneficiary, Some(addr(0xde)));
        assert_eq!(attrs.scope, Some(EffectScope::Exact));
        assert!(!attrs.is_revocation);
    }

    #[test]
    fn approve_with_max_uint_is_unlimited() {
        let attrs = analyze_params(
            Analyzer::Erc20Approve,
            &[AbiValue::Address(addr(1)), AbiValue::Uint(U256::MAX)],
        );
        assert_eq!(attrs.scope, Some(EffectScope::Unlimited));
    }

    #[test]
    fn approve_with_zero_amount_is_revocation() {
        let attrs = analyze_params(
            Analyzer::Erc20Approve,
            &[AbiValue::Address(addr(1)), AbiValue::Uint(U256::ZERO)],
        );
        assert!(attrs.is_revocation);
        assert_eq!(attrs.amount, Some(U256::ZERO));
    }

    #[test]
    fn set_approval_for_all_false_revokes() {
        let attrs = analyze_params(
            Analyzer::SetApprovalForAll,
            &[AbiValue::Address(addr(2)), AbiValue::Bool(false)],
        );
        assert!(attrs.is_revocation);
        assert_eq!(attrs.scope, Some(EffectScope::Exact));

        let attrs = analyze_params(
            Analyzer::SetApprovalForAll,
            &[AbiValue::Address(addr(2)), AbiValue::Bool(true)],
        );
        assert!(!attrs.is_revocation);
        assert_eq!(attrs.scope, Some(EffectScope::Unlimited));
    }

    #[test]
    fn enable_module_grants_autonomy() {
        let attrs = analyze_params(Analyzer::EnableModule, &[AbiValue::Address(addr(3))]);
        assert!(attrs.grants_autonomous_execution);
        assert_eq!(attrs.beneficiary, Some(addr(3)));
    }

    #[test]
    fn module_exec_detects_delegatecall_operation() {
        let params = [
            AbiValue::Address(addr(4)),
            AbiValue::Uint(U256::ZERO),
            AbiValue::Bytes(vec![]),
            AbiValue::Uint(U256::from(1u8)),
        ];
        let attrs = analyze_params(Analyzer::ModuleExec, &params);
        assert!(attrs.is_delegate_call);
        assert!(attrs.bypasses_signatures);
        assert_eq!(attrs.inner_operation, Some(Operation::DelegateCall));
    }

    #[test]
    fn exec_transaction_with_call_operation() {
        let params = [
            AbiValue::Address(addr(5)),
            AbiValue::Uint(U256::from(10u8)),
            AbiValue::Bytes(vec![1, 2, 3]),
            AbiValue::Uint(U256::ZERO),
        ];
        let attrs = analyze_params(Analyzer::ExecTransaction, &params);
        assert!(!attrs.is_delegate_call);
        assert_eq!(attrs.inner_operation, Some(Operation::Call));
        assert_eq!(attrs.amount, Some(U256::from(10u8)));
    }

    #[test]
    fn uniswap_swap_picks_recipient_by_index() {
        let params = [
            AbiValue::Uint(U256::from(100u8)),
            AbiValue::Uint(U256::from(90u8)),
            AbiValue::Array(vec![AbiValue::Address(addr(7)), AbiValue::Address(addr(8))]),
            AbiValue::Address(addr(9)),
            AbiValue::Uint(U256::from(1_700_000_000u64)),
        ];
        let attrs = analyze_params(
            Analyzer::UniswapSwap {
                to_index: 3,
                amount_index: Some(0),
            },
            &params,
        );
        assert_eq!(attrs.beneficiary, Some(addr(9)));
        assert_eq!(attrs.amount, Some(U256::from(100u8)));
        assert!(attrs.irreversible);
    }

    #[test]
    fn malformed_params_leave_attributes_unset() {
        // Analyzer expects (address, uint) but gets nothing.
        let attrs = analyze_params(Analyzer::Erc20Approve, &[]);
        assert_eq!(attrs.beneficiary, None);
        assert_eq!(attrs.amount, None);
        assert_eq!(attrs.scope, None);
        assert!(!attrs.is_revocation);
    }
}
