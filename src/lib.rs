// SPDX-License-Identifier: MIT OR Apache-2.0
//! Calldata Sentinel — offline calldata decoder and trust-policy engine
//! for Ethereum multisig wallets.
//!
//! This facade re-exports the public surface of the member crates:
//!
//! - [`sentinel_types`] — the analysis contract: severities, effects,
//!   trust contexts.
//! - [`sentinel_abi`] — signature parsing and head/tail ABI decoding.
//! - [`sentinel_profile`] — trust profile loading and queries.
//! - [`sentinel_registry`] — the curated selector table and ABI registry.
//! - [`sentinel_trust`] — the trust classifier and header severities.
//! - [`sentinel_multisend`] — the packed batch parser.
//! - [`sentinel_effects`] — the effect analyzer.
//! - [`sentinel_decode`] — the orchestrator, the usual entry point.
//! - [`sentinel_explain`] — sanitized explainer payloads.
//!
//! The typical flow:
//!
//! ```no_run
//! use calldata_sentinel::decode::{DecodeRequest, Decoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let decoder = Decoder::offline();
//! let analysis = decoder.decode_offline(DecodeRequest::new("0x095ea7b3..."))?;
//! println!("{}", analysis.effect.summary);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub use sentinel_abi as abi;
pub use sentinel_decode as decode;
pub use sentinel_effects as effects;
pub use sentinel_error as error;
pub use sentinel_explain as explain;
pub use sentinel_multisend as multisend;
pub use sentinel_profile as profile;
pub use sentinel_registry as registry;
pub use sentinel_trust as trust;
pub use sentinel_types as types;
