// SPDX-License-Identifier: MIT OR Apache-2.0
//! The address-display contract.
//!
//! Technical sections always print full addresses. Human sentences only
//! print labels resolved through the trust registries; an unlabelled
//! address becomes a generic noun, never raw hex. Token symbols come from
//! `trustedAssets` only.

use alloy_primitives::{Address, U256};
use sentinel_abi::format_amount;
use sentinel_profile::TrustProfile;
use sentinel_types::address_to_lower_hex;

/// Human rendering of an address: its profile label, or the given noun.
pub fn human_party(profile: Option<&TrustProfile>, addr: Option<&Address>, noun: &str) -> String {
    match (profile, addr) {
        (Some(profile), Some(addr)) => profile
            .address_label(addr)
            .map(|l| l.label)
            .unwrap_or_else(|| noun.to_string()),
        _ => noun.to_string(),
    }
}

/// Human rendering of the token a contract represents: its symbol from
/// `trustedAssets` (or contract label), else just "tokens".
pub fn token_phrase(profile: Option<&TrustProfile>, token: Option<&Address>) -> String {
    match (profile, token) {
        (Some(profile), Some(token)) => {
            if let Some(asset) = profile.trusted_asset(token) {
                asset.symbol.clone()
            } else if let Some(label) = profile.address_label(token) {
                label.label
            } else {
                "tokens".to_string()
            }
        }
        _ => "tokens".to_string(),
    }
}

/// Human rendering of a token amount. When the token's decimals are known
/// the value is scaled; the sentinel forms pass through unscaled.
pub fn amount_phrase(
    profile: Option<&TrustProfile>,
    token: Option<&Address>,
    amount: &U256,
) -> String {
    let formatted = format_amount(amount);
    if formatted != amount.to_string() {
        // A sentinel form ("MAX_UINT256", "effectively unlimited").
        return formatted;
    }
    if let (Some(profile), Some(token)) = (profile, token) {
        if let Some(asset) = profile.trusted_asset(token) {
            return format!("{} {}", format_units(amount, asset.decimals), asset.symbol);
        }
    }
    formatted
}

/// Scale a raw integer amount by `decimals`, trimming trailing zeros.
pub fn format_units(amount: &U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let divisor = U256::from(10u8).pow(U256::from(decimals));
    let integer = amount / divisor;
    let fraction = amount % divisor;
    if fraction.is_zero() {
        return integer.to_string();
    }
    let frac_str = format!("{:0>width$}", fraction, width = usize::from(decimals));
    let trimmed = frac_str.trim_end_matches('0');
    format!("{integer}.{trimmed}")
}

/// Technical rendering: a labelled full address, never truncated.
pub fn technical_note(label: &str, addr: &Address) -> String {
    format!("{label}: {}", address_to_lower_hex(addr))
}

/// Wei rendered in both wei and ether.
pub fn wei_phrase(value: &U256) -> String {
    format!("{} wei ({} ETH)", value, format_units(value, 18))
}
