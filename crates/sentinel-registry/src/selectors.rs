// SPDX-License-Identifier: MIT OR Apache-2.0
//! The compile-time table of curated selector entries.
//!
//! Every entry here is manually vetted: the signature→effect mapping is
//! authoritative and `verified = true` downstream. Selectors are derived
//! from the signature strings at construction time rather than hardcoded,
//! so a typo in a signature cannot silently detach an entry from its key.

use crate::analyzer::Analyzer;
use sentinel_abi::signature::selector_of;
use sentinel_types::{EffectType, Selector};
use std::collections::HashMap;

/// One curated selector entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorInfo {
    /// Canonical signature, e.g. `approve(address,uint256)`.
    pub signature: &'static str,
    /// Bare function name.
    pub name: &'static str,
    /// Human parameter names, positionally matching the signature.
    pub params: &'static [&'static str],
    /// Effect-type tag consumed by the effect analyzer.
    pub effect_type: EffectType,
    /// One-line description of what the function does.
    pub description: &'static str,
    /// Parameter analyzer, when the entry has per-argument semantics.
    pub analyzer: Option<Analyzer>,
}

/// The curated entries, grouped by standard.
const CURATED: &[SelectorInfo] = &[
    // -- ERC-20 --
    SelectorInfo {
        signature: "approve(address,uint256)",
        name: "approve",
        params: &["spender", "amount"],
        effect_type: EffectType::PermissionGrant,
        description: "Grants a spender a standing allowance over the wallet's ERC-20 balance",
        analyzer: Some(Analyzer::Erc20Approve),
    },
    SelectorInfo {
        signature: "transfer(address,uint256)",
        name: "transfer",
        params: &["to", "amount"],
        effect_type: EffectType::AssetTransfer,
        description: "Sends ERC-20 tokens out of the wallet",
        analyzer: Some(Analyzer::Erc20Transfer),
    },
    SelectorInfo {
        signature: "transferFrom(address,address,uint256)",
        name: "transferFrom",
        params: &["from", "to", "amount"],
        effect_type: EffectType::AssetTransfer,
        description: "Moves ERC-20 tokens between third-party accounts using an existing allowance",
        analyzer: Some(Analyzer::Erc20TransferFrom),
    },
    // -- ERC-721 --
    SelectorInfo {
        signature: "setApprovalForAll(address,bool)",
        name: "setApprovalForAll",
        params: &["operator", "approved"],
        effect_type: EffectType::PermissionGrant,
        description: "Grants or revokes an operator over every token in the collection",
        analyzer: Some(Analyzer::SetApprovalForAll),
    },
    SelectorInfo {
        signature: "safeTransferFrom(address,address,uint256)",
        name: "safeTransferFrom",
        params: &["from", "to", "tokenId"],
        effect_type: EffectType::AssetTransfer,
        description: "Transfers one ERC-721 token",
        analyzer: Some(Analyzer::Erc721Transfer),
    },
    SelectorInfo {
        signature: "safeTransferFrom(address,address,uint256,bytes)",
        name: "safeTransferFrom",
        params: &["from", "to", "tokenId", "data"],
        effect_type: EffectType::AssetTransfer,
        description: "Transfers one ERC-721 token with a receiver callback payload",
        analyzer: Some(Analyzer::Erc721Transfer),
    },
    // -- ERC-1155 --
    SelectorInfo {
        signature: "safeTransferFrom(address,address,uint256,uint256,bytes)",
        name: "safeTransferFrom",
        params: &["from", "to", "id", "amount", "data"],
        effect_type: EffectType::AssetTransfer,
        description: "Transfers ERC-1155 tokens of one id",
        analyzer: Some(Analyzer::Erc1155Transfer),
    },
    SelectorInfo {
        signature: "safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)",
        name: "safeBatchTransferFrom",
        params: &["from", "to", "ids", "amounts", "data"],
        effect_type: EffectType::AssetTransfer,
        description: "Transfers ERC-1155 tokens of several ids at once",
        analyzer: Some(Analyzer::Erc1155BatchTransfer),
    },
    // -- Ownership --
    SelectorInfo {
        signature: "transferOwnership(address)",
        name: "transferOwnership",
        params: &["newOwner"],
        effect_type: EffectType::ControlTransfer,
        description: "Hands contract ownership to a new address",
        analyzer: Some(Analyzer::TransferOwnership),
    },
    SelectorInfo {
        signature: "renounceOwnership()",
        name: "renounceOwnership",
        params: &[],
        effect_type: EffectType::ControlTransfer,
        description: "Renounces contract ownership forever",
        analyzer: Some(Analyzer::RenounceOwnership),
    },
    // -- Proxy upgrades --
    SelectorInfo {
        signature: "upgradeTo(address)",
        name: "upgradeTo",
        params: &["newImplementation"],
        effect_type: EffectType::UpgradeAuthority,
        description: "Replaces the implementation behind a proxy",
        analyzer: Some(Analyzer::UpgradeTo),
    },
    SelectorInfo {
        signature: "upgradeToAndCall(address,bytes)",
        name: "upgradeToAndCall",
        params: &["newImplementation", "data"],
        effect_type: EffectType::UpgradeAuthority,
        description: "Replaces the proxy implementation and immediately calls into it",
        analyzer: Some(Analyzer::UpgradeTo),
    },
    // -- Multicalls --
    SelectorInfo {
        signature: "multicall(bytes[])",
        name: "multicall",
        params: &["data"],
        effect_type: EffectType::BatchOperation,
        description: "Executes several calls against the same contract in one transaction",
        analyzer: None,
    },
    SelectorInfo {
        signature: "multicall(uint256,bytes[])",
        name: "multicall",
        params: &["deadline", "data"],
        effect_type: EffectType::BatchOperation,
        description: "Deadline-gated multicall against the same contract",
        analyzer: None,
    },
    SelectorInfo {
        signature: "aggregate((address,bytes)[])",
        name: "aggregate",
        params: &["calls"],
        effect_type: EffectType::BatchOperation,
        description: "Aggregates calls to multiple contracts through a multicall helper",
        analyzer: None,
    },
    // -- Safe administration --
    SelectorInfo {
        signature: "enableModule(address)",
        name: "enableModule",
        params: &["module"],
        effect_type: EffectType::SafeModuleChange,
        description: "Enables a module that can execute from the Safe without signatures",
        analyzer: Some(Analyzer::EnableModule),
    },
    SelectorInfo {
        signature: "disableModule(address,address)",
        name: "disableModule",
        params: &["prevModule", "module"],
        effect_type: EffectType::SafeModuleChange,
        description: "Disables a previously enabled Safe module",
        analyzer: Some(Analyzer::DisableModule),
    },
    SelectorInfo {
        signature: "setFallbackHandler(address)",
        name: "setFallbackHandler",
        params: &["handler"],
        effect_type: EffectType::SafeFallbackChange,
        description: "Sets the contract that answers unknown calls to the Safe",
        analyzer: Some(Analyzer::SetFallbackHandler),
    },
    SelectorInfo {
        signature: "setGuard(address)",
        name: "setGuard",
        params: &["guard"],
        effect_type: EffectType::SafeGuardChange,
        description: "Installs a guard that can veto every Safe transaction",
        analyzer: Some(Analyzer::SetGuard),
    },
    SelectorInfo {
        signature: "addOwnerWithThreshold(address,uint256)",
        name: "addOwnerWithThreshold",
        params: &["owner", "_threshold"],
        effect_type: EffectType::SafeOwnerChange,
        description: "Adds a Safe owner and sets the signature threshold",
        analyzer: Some(Analyzer::AddOwner),
    },
    SelectorInfo {
        signature: "removeOwner(address,address,uint256)",
        name: "removeOwner",
        params: &["prevOwner", "owner", "_threshold"],
        effect_type: EffectType::SafeOwnerChange,
        description: "Removes a Safe owner and sets the signature threshold",
        analyzer: Some(Analyzer::RemoveOwner),
    },
    SelectorInfo {
        signature: "swapOwner(address,address,address)",
        name: "swapOwner",
        params: &["prevOwner", "oldOwner", "newOwner"],
        effect_type: EffectType::SafeOwnerChange,
        description: "Replaces one Safe owner with another",
        analyzer: Some(Analyzer::SwapOwner),
    },
    SelectorInfo {
        signature: "changeThreshold(uint256)",
        name: "changeThreshold",
        params: &["_threshold"],
        effect_type: EffectType::SafeThresholdChange,
        description: "Changes how many owner signatures a Safe transaction needs",
        analyzer: Some(Analyzer::ChangeThreshold),
    },
    SelectorInfo {
        signature: "execTransactionFromModule(address,uint256,bytes,uint8)",
        name: "execTransactionFromModule",
        params: &["to", "value", "data", "operation"],
        effect_type: EffectType::SafeModuleExecution,
        description: "Executes from the Safe through an enabled module, bypassing signatures",
        analyzer: Some(Analyzer::ModuleExec),
    },
    SelectorInfo {
        signature: "execTransactionFromModuleReturnData(address,uint256,bytes,uint8)",
        name: "execTransactionFromModuleReturnData",
        params: &["to", "value", "data", "operation"],
        effect_type: EffectType::SafeModuleExecution,
        description: "Module execution variant that returns the call's result data",
        analyzer: Some(Analyzer::ModuleExec),
    },
    SelectorInfo {
        signature: "execTransaction(address,uint256,bytes,uint8,uint256,uint256,uint256,address,address,bytes)",
        name: "execTransaction",
        params: &[
            "to",
            "value",
            "data",
            "operation",
            "safeTxGas",
            "baseGas",
            "gasPrice",
            "gasToken",
            "refundReceiver",
            "signatures",
        ],
        effect_type: EffectType::SafeExecution,
        description: "Executes a signed Safe transaction; the inner call carries the real effect",
        analyzer: Some(Analyzer::ExecTransaction),
    },
    // -- EIP-2612 --
    SelectorInfo {
        signature: "permit(address,address,uint256,uint256,uint8,bytes32,bytes32)",
        name: "permit",
        params: &["owner", "spender", "value", "deadline", "v", "r", "s"],
        effect_type: EffectType::PermissionGrant,
        description: "Sets an ERC-20 allowance from an off-chain signature, no prior transaction needed",
        analyzer: Some(Analyzer::Permit),
    },
    // -- MultiSend --
    SelectorInfo {
        signature: "multiSend(bytes)",
        name: "multiSend",
        params: &["transactions"],
        effect_type: EffectType::BatchOperation,
        description: "Executes a packed batch of sub-transactions",
        analyzer: None,
    },
    // -- WETH --
    SelectorInfo {
        signature: "deposit()",
        name: "deposit",
        params: &[],
        effect_type: EffectType::AssetTransfer,
        description: "Wraps the attached ETH into WETH",
        analyzer: Some(Analyzer::WethDeposit),
    },
    SelectorInfo {
        signature: "withdraw(uint256)",
        name: "withdraw",
        params: &["wad"],
        effect_type: EffectType::AssetTransfer,
        description: "Unwraps WETH back into ETH",
        analyzer: Some(Analyzer::WethWithdraw),
    },
    // -- Uniswap V2 router --
    SelectorInfo {
        signature: "swapExactTokensForTokens(uint256,uint256,address[],address,uint256)",
        name: "swapExactTokensForTokens",
        params: &["amountIn", "amountOutMin", "path", "to", "deadline"],
        effect_type: EffectType::AssetTransfer,
        description: "Swaps an exact token amount along a router path",
        analyzer: Some(Analyzer::UniswapSwap { to_index: 3, amount_index: Some(0) }),
    },
    SelectorInfo {
        signature: "swapTokensForExactTokens(uint256,uint256,address[],address,uint256)",
        name: "swapTokensForExactTokens",
        params: &["amountOut", "amountInMax", "path", "to", "deadline"],
        effect_type: EffectType::AssetTransfer,
        description: "Swaps up to a maximum of tokens for an exact output amount",
        analyzer: Some(Analyzer::UniswapSwap { to_index: 3, amount_index: Some(1) }),
    },
    SelectorInfo {
        signature: "swapExactETHForTokens(uint256,address[],address,uint256)",
        name: "swapExactETHForTokens",
        params: &["amountOutMin", "path", "to", "deadline"],
        effect_type: EffectType::AssetTransfer,
        description: "Swaps the attached ETH for tokens along a router path",
        analyzer: Some(Analyzer::UniswapSwap { to_index: 2, amount_index: None }),
    },
    SelectorInfo {
        signature: "swapTokensForExactETH(uint256,uint256,address[],address,uint256)",
        name: "swapTokensForExactETH",
        params: &["amountOut", "amountInMax", "path", "to", "deadline"],
        effect_type: EffectType::AssetTransfer,
        description: "Swaps up to a maximum of tokens for an exact ETH amount",
        analyzer: Some(Analyzer::UniswapSwap { to_index: 3, amount_index: Some(1) }),
    },
    SelectorInfo {
        signature: "swapExactTokensForETH(uint256,uint256,address[],address,uint256)",
        name: "swapExactTokensForETH",
        params: &["amountIn", "amountOutMin", "path", "to", "deadline"],
        effect_type: EffectType::AssetTransfer,
        description: "Swaps an exact token amount for ETH",
        analyzer: Some(Analyzer::UniswapSwap { to_index: 3, amount_index: Some(0) }),
    },
    SelectorInfo {
        signature: "swapETHForExactTokens(uint256,address[],address,uint256)",
        name: "swapETHForExactTokens",
        params: &["amountOut", "path", "to", "deadline"],
        effect_type: EffectType::AssetTransfer,
        description: "Swaps attached ETH for an exact token amount, refunding the rest",
        analyzer: Some(Analyzer::UniswapSwap { to_index: 2, amount_index: None }),
    },
    SelectorInfo {
        signature: "addLiquidity(address,address,uint256,uint256,uint256,uint256,address,uint256)",
        name: "addLiquidity",
        params: &[
            "tokenA",
            "tokenB",
            "amountADesired",
            "amountBDesired",
            "amountAMin",
            "amountBMin",
            "to",
            "deadline",
        ],
        effect_type: EffectType::AssetTransfer,
        description: "Deposits two tokens into a liquidity pair",
        analyzer: Some(Analyzer::UniswapLiquidity { to_index: 6 }),
    },
    SelectorInfo {
        signature: "addLiquidityETH(address,uint256,uint256,uint256,address,uint256)",
        name: "addLiquidityETH",
        params: &[
            "token",
            "amountTokenDesired",
            "amountTokenMin",
            "amountETHMin",
            "to",
            "deadline",
        ],
        effect_type: EffectType::AssetTransfer,
        description: "Deposits a token plus attached ETH into a liquidity pair",
        analyzer: Some(Analyzer::UniswapLiquidity { to_index: 4 }),
    },
    SelectorInfo {
        signature: "removeLiquidity(address,address,uint256,uint256,uint256,address,uint256)",
        name: "removeLiquidity",
        params: &[
            "tokenA",
            "tokenB",
            "liquidity",
            "amountAMin",
            "amountBMin",
            "to",
            "deadline",
        ],
        effect_type: EffectType::AssetTransfer,
        description: "Withdraws both sides of a liquidity pair",
        analyzer: Some(Analyzer::UniswapLiquidity { to_index: 5 }),
    },
    SelectorInfo {
        signature: "removeLiquidityETH(address,uint256,uint256,uint256,address,uint256)",
        name: "removeLiquidityETH",
        params: &[
            "token",
            "liquidity",
            "amountTokenMin",
            "amountETHMin",
            "to",
            "deadline",
        ],
        effect_type: EffectType::AssetTransfer,
        description: "Withdraws a token/ETH liquidity pair",
        analyzer: Some(Analyzer::UniswapLiquidity { to_index: 4 }),
    },
];

/// In-memory index over the curated table, keyed by derived selector.
#[derive(Debug, Clone)]
pub struct SelectorRegistry {
    entries: HashMap<Selector, &'static SelectorInfo>,
}

impl SelectorRegistry {
    /// Build the index, deriving each selector from its signature.
    pub fn new() -> Self {
        let mut entries = HashMap::with_capacity(CURATED.len());
        for info in CURATED {
            let selector = Selector(selector_of(info.signature));
            let previous = entries.insert(selector, info);
            debug_assert!(
                previous.is_none(),
                "duplicate curated selector for {}",
                info.signature
            );
        }
        Self { entries }
    }

    /// Look up a curated entry. Case-insensitivity is inherent: selectors
    /// are bytes here, normalized at the parse boundary.
    pub fn lookup(&self, selector: &Selector) -> Option<&SelectorInfo> {
        self.entries.get(selector).copied()
    }

    /// Number of curated entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty (it never is).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all entries with their derived selectors.
    pub fn iter(&self) -> impl Iterator<Item = (&Selector, &&'static SelectorInfo)> {
        self.entries.iter()
    }
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
