// SPDX-License-Identifier: MIT OR Apache-2.0
//! Filesystem-backed per-contract ABI registry.
//!
//! Resolution order for `(chain, address)`: a profile-declared `abiPath`
//! that stays inside the registry root, then the default
//! `<root>/<chain>/<address>.json`. Results (hits and misses both) are
//! memoized for the life of the registry, and dropped only by an explicit
//! [`AbiRegistry::clear_cache`] at profile/ABI mutation boundaries.

use alloy_primitives::Address;
use sentinel_abi::signature::selector_of;
use sentinel_abi::AbiType;
use sentinel_types::{address_to_lower_hex, Selector};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Errors surfaced while parsing ABI fragment files.
#[derive(Debug, thiserror::Error)]
pub enum AbiStoreError {
    /// The file was not a JSON array of fragments.
    #[error("ABI file is not a fragment array: {0}")]
    NotFragmentArray(String),
    /// A function fragment had an unusable input type.
    #[error("fragment `{name}` has an unusable input type")]
    BadInput {
        /// Function name of the fragment.
        name: String,
    },
}

/// One named input of an ABI function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiParam {
    /// Input name, possibly empty in the source file.
    pub name: String,
    /// Canonical Solidity type string.
    pub kind: String,
}

/// One function from an ABI file, with its derived selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiFunction {
    /// Function name.
    pub name: String,
    /// Named inputs.
    pub inputs: Vec<AbiParam>,
    /// Canonical signature.
    pub signature: String,
    /// Derived 4-byte selector.
    pub selector: Selector,
}

/// A parsed contract ABI: just the function fragments the core needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAbi {
    /// All function fragments.
    pub functions: Vec<AbiFunction>,
}

impl ContractAbi {
    /// Parse the standard JSON fragment array, keeping function fragments
    /// and skipping events, constructors, and errors.
    pub fn from_json(json: &str) -> Result<Self, AbiStoreError> {
        #[derive(Deserialize)]
        struct RawInput {
            #[serde(default)]
            name: String,
            #[serde(rename = "type")]
            kind: String,
            #[serde(default)]
            components: Option<Vec<RawInput>>,
        }
        #[derive(Deserialize)]
        struct RawFragment {
            #[serde(rename = "type")]
            kind: String,
            #[serde(default)]
            name: String,
            #[serde(default)]
            inputs: Vec<RawInput>,
        }

        fn canonical_type(input: &RawInput) -> Option<String> {
            if let Some(stripped) = input.kind.strip_prefix("tuple") {
                let members: Vec<String> = input
                    .components
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(canonical_type)
                    .collect::<Option<_>>()?;
                Some(format!("({}){stripped}", members.join(",")))
            } else {
                Some(input.kind.clone())
            }
        }

        let fragments: Vec<RawFragment> = serde_json::from_str(json)
            .map_err(|e| AbiStoreError::NotFragmentArray(e.to_string()))?;

        let mut functions = Vec::new();
        for fragment in fragments.iter().filter(|f| f.kind == "function") {
            let mut inputs = Vec::with_capacity(fragment.inputs.len());
            let mut canonical_types = Vec::with_capacity(fragment.inputs.len());
            let mut usable = true;
            for input in &fragment.inputs {
                let Some(canonical) = canonical_type(input) else {
                    usable = false;
                    break;
                };
                // Reject types the decoder cannot represent.
                if AbiType::parse(&canonical).is_err() {
                    usable = false;
                    break;
                }
                inputs.push(AbiParam {
                    name: input.name.clone(),
                    kind: canonical.clone(),
                });
                canonical_types.push(canonical);
            }
            if !usable {
                return Err(AbiStoreError::BadInput {
                    name: fragment.name.clone(),
                });
            }
            let signature = format!("{}({})", fragment.name, canonical_types.join(","));
            let selector = Selector(selector_of(&signature));
            functions.push(AbiFunction {
                name: fragment.name.clone(),
                inputs,
                signature,
                selector,
            });
        }
        Ok(Self { functions })
    }

    /// The function matching a selector, if any.
    pub fn function_by_selector(&self, selector: &Selector) -> Option<&AbiFunction> {
        self.functions.iter().find(|f| &f.selector == selector)
    }
}

fn is_valid_chain(chain: &str) -> bool {
    !chain.is_empty()
        && chain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A relative path with no `..` components stays inside the root.
fn is_contained(rel: &Path) -> bool {
    rel.is_relative()
        && rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Filesystem ABI registry with a process-lifetime memoization cache.
///
/// The cache stores misses as well as hits so repeated decodes never
/// re-probe the filesystem. Mutations replace entries wholesale under the
/// write lock; readers only ever see complete entries.
#[derive(Debug)]
pub struct AbiRegistry {
    root: PathBuf,
    cache: RwLock<HashMap<String, Option<Arc<ContractAbi>>>>,
}

impl AbiRegistry {
    /// A registry rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The registry root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the ABI for `(chain, address)`, consulting the cache first.
    ///
    /// `profile_path` is the optional `abiPath` declared in a trust
    /// profile; it is rejected silently when it would escape the root.
    pub fn lookup(
        &self,
        chain: &str,
        address: &Address,
        profile_path: Option<&str>,
    ) -> Option<Arc<ContractAbi>> {
        if !is_valid_chain(chain) {
            warn!(chain, "rejecting invalid chain directory name");
            return None;
        }
        let key = format!("{chain}:{}", address_to_lower_hex(address));

        if let Some(cached) = self.cache.read().expect("abi cache poisoned").get(&key) {
            debug!(key, hit = cached.is_some(), "abi cache hit");
            return cached.clone();
        }

        let resolved = self.read_abi(chain, address, profile_path);
        self.cache
            .write()
            .expect("abi cache poisoned")
            .insert(key.clone(), resolved.clone());
        debug!(key, found = resolved.is_some(), "abi resolved from disk");
        resolved
    }

    /// Drop every memoized entry. Called when profiles or ABI files are
    /// written by the management surface.
    pub fn clear_cache(&self) {
        self.cache.write().expect("abi cache poisoned").clear();
    }

    fn read_abi(
        &self,
        chain: &str,
        address: &Address,
        profile_path: Option<&str>,
    ) -> Option<Arc<ContractAbi>> {
        let mut candidates = Vec::with_capacity(2);
        if let Some(declared) = profile_path {
            let rel = Path::new(declared);
            if is_contained(rel) {
                candidates.push(self.root.join(rel));
            } else {
                warn!(path = declared, "abiPath escapes the registry root, ignoring");
            }
        }
        candidates.push(
            self.root
                .join(chain)
                .join(format!("{}.json", address_to_lower_hex(address))),
        );

        for path in candidates {
            let Ok(contents) = std::fs::read_to_string(&path) else {
                continue;
            };
            match ContractAbi::from_json(&contents) {
                Ok(abi) => return Some(Arc::new(abi)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unusable ABI file");
                }
            }
        }
        None
    }
}
