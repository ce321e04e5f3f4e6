// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! sentinel-registry
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Filesystem-backed per-contract ABI registry with a memoizing cache.
pub mod abi_store;
/// Parameter analyzers: decoded params → attribute bag.
pub mod analyzer;
/// The compile-time curated selector table.
pub mod selectors;

pub use abi_store::{AbiFunction, AbiParam, AbiRegistry, ContractAbi};
pub use analyzer::{analyze_params, Analyzer, CallAttributes};
pub use selectors::{SelectorInfo, SelectorRegistry};
