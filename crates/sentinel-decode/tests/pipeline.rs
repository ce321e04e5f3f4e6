// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pipeline behavior: resolution precedence, label promotion, and the
//! local-ABI path.

use alloy_primitives::Address;
use sentinel_decode::{DecodeRequest, Decoder, DecoderConfig, FourByteClient};
use sentinel_profile::{load_str, TrustProfile};
use sentinel_types::{EffectType, SemanticSource, Severity};
use std::str::FromStr;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POOL: &str = "0x87870bca3f3fd6335c3f4ce8392d69350b4fa4e2";
const SUPPLY_SELECTOR: &str = "617ba037";

fn pool() -> Address {
    Address::from_str(POOL).unwrap()
}

fn profile_labelling_supply() -> TrustProfile {
    load_str(&format!(
        r#"{{
            "version": "1",
            "trustedContracts": {{
                "{POOL}": {{
                    "label": "Aave v3 Pool",
                    "trustLevel": "PROTOCOL",
                    "allowedSelectors": "*",
                    "selectorLabels": {{ "0x{SUPPLY_SELECTOR}": "supply" }}
                }}
            }}
        }}"#
    ))
    .profile()
    .unwrap()
    .clone()
}

/// supply(asset, amount, onBehalfOf, referralCode) calldata.
fn supply_calldata() -> String {
    let mut data = format!("0x{SUPPLY_SELECTOR}");
    data.push_str(&"00".repeat(12));
    data.push_str(&"aa".repeat(20)); // asset
    data.push_str(&format!("{:064x}", 5_000u64)); // amount
    data.push_str(&"00".repeat(12));
    data.push_str(&"bb".repeat(20)); // onBehalfOf
    data.push_str(&format!("{:064x}", 0u64)); // referralCode
    data
}

const SUPPLY_ABI: &str = r#"[
    {
        "type": "function",
        "name": "supply",
        "inputs": [
            { "name": "asset", "type": "address" },
            { "name": "amount", "type": "uint256" },
            { "name": "onBehalfOf", "type": "address" },
            { "name": "referralCode", "type": "uint16" }
        ]
    }
]"#;

#[test]
fn local_abi_resolution_names_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let chain_dir = dir.path().join("ethereum");
    std::fs::create_dir_all(&chain_dir).unwrap();
    std::fs::write(chain_dir.join(format!("{POOL}.json")), SUPPLY_ABI).unwrap();

    let decoder = Decoder::new(DecoderConfig {
        chain: None,
        abi_root: Some(dir.path().to_path_buf()),
        fourbyte: None,
    });
    let calldata = supply_calldata();
    let target = pool();
    let analysis = decoder
        .decode_offline(DecodeRequest {
            calldata: &calldata,
            to: Some(&target),
            operation: sentinel_types::Operation::Call,
            profile: None,
            profile_error: None,
        })
        .unwrap();

    assert!(analysis.abi_verified);
    assert!(!analysis.verified);
    assert_eq!(analysis.source, SemanticSource::LocalAbi);
    assert_eq!(analysis.effect.effect_type, EffectType::AbiVerified);
    let names: Vec<&str> = analysis
        .params
        .as_ref()
        .unwrap()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["asset", "amount", "onBehalfOf", "referralCode"]);
}

#[test]
fn abi_cache_clear_picks_up_new_files() {
    let dir = tempfile::tempdir().unwrap();
    let decoder = Decoder::new(DecoderConfig {
        chain: None,
        abi_root: Some(dir.path().to_path_buf()),
        fourbyte: None,
    });
    let calldata = supply_calldata();
    let target = pool();
    let mut req = DecodeRequest::new(&calldata);
    req.to = Some(&target);

    let miss = decoder.decode_offline(req).unwrap();
    assert!(!miss.abi_verified);

    let chain_dir = dir.path().join("ethereum");
    std::fs::create_dir_all(&chain_dir).unwrap();
    std::fs::write(chain_dir.join(format!("{POOL}.json")), SUPPLY_ABI).unwrap();

    // Miss is memoized until the explicit clear.
    let still_miss = decoder.decode_offline(req).unwrap();
    assert!(!still_miss.abi_verified);

    decoder.clear_abi_cache();
    let hit = decoder.decode_offline(req).unwrap();
    assert!(hit.abi_verified);
}

#[test]
fn trust_profile_label_supplies_semantics_without_abi() {
    let decoder = Decoder::offline();
    let profile = profile_labelling_supply();
    let calldata = supply_calldata();
    let target = pool();
    let analysis = decoder
        .decode_offline(DecodeRequest {
            calldata: &calldata,
            to: Some(&target),
            operation: sentinel_types::Operation::Call,
            profile: Some(&profile),
            profile_error: None,
        })
        .unwrap();

    assert!(analysis.trust_profile_verified);
    assert!(!analysis.verified);
    assert_eq!(analysis.source, SemanticSource::TrustProfile);
    assert_eq!(analysis.effect.effect_type, EffectType::TrustProfileSemantic);
    // "supply" matches no heuristic bucket: MEDIUM.
    assert_eq!(analysis.effect.severity, Severity::Medium);
    assert_eq!(analysis.function_name.as_deref(), Some("supply"));
    // No signature source at all: nothing to decode parameters with.
    assert!(analysis.signature.is_none());
    assert!(analysis.params.is_none());
}

#[tokio::test]
async fn matching_external_name_keeps_signature_for_decoding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/signatures/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "text_signature": "supply(address,uint256,address,uint16)" }]
        })))
        .mount(&server)
        .await;
    let decoder = Decoder::new(DecoderConfig {
        chain: None,
        abi_root: None,
        fourbyte: Some(FourByteClient::new(server.uri(), Duration::from_millis(500))),
    });

    let profile = profile_labelling_supply();
    let calldata = supply_calldata();
    let target = pool();
    let analysis = decoder
        .decode(DecodeRequest {
            calldata: &calldata,
            to: Some(&target),
            operation: sentinel_types::Operation::Call,
            profile: Some(&profile),
            profile_error: None,
        })
        .await
        .unwrap();

    // The label promotes the source, and the case-insensitive name match
    // lets the external signature decode the parameters.
    assert_eq!(analysis.source, SemanticSource::TrustProfile);
    assert!(analysis.trust_profile_verified);
    assert!(analysis.signature.is_some());
    assert_eq!(analysis.params.as_ref().unwrap().len(), 4);
}

#[tokio::test]
async fn mismatched_external_name_clears_the_signature() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/signatures/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "text_signature": "maliciousCollision(address,uint256,address,uint16)" }]
        })))
        .mount(&server)
        .await;
    let decoder = Decoder::new(DecoderConfig {
        chain: None,
        abi_root: None,
        fourbyte: Some(FourByteClient::new(server.uri(), Duration::from_millis(500))),
    });

    let profile = profile_labelling_supply();
    let calldata = supply_calldata();
    let target = pool();
    let analysis = decoder
        .decode(DecodeRequest {
            calldata: &calldata,
            to: Some(&target),
            operation: sentinel_types::Operation::Call,
            profile: Some(&profile),
            profile_error: None,
        })
        .await
        .unwrap();

    // The label wins; the colliding signature must not decode parameters.
    assert_eq!(analysis.source, SemanticSource::TrustProfile);
    assert_eq!(analysis.function_name.as_deref(), Some("supply"));
    assert!(analysis.signature.is_none());
    assert!(analysis.params.is_none());
}

#[test]
fn verified_registry_outranks_local_abi() {
    let dir = tempfile::tempdir().unwrap();
    let chain_dir = dir.path().join("ethereum");
    std::fs::create_dir_all(&chain_dir).unwrap();
    // A local ABI that claims approve is something else entirely.
    std::fs::write(
        chain_dir.join(format!("{POOL}.json")),
        r#"[{ "type": "function", "name": "approve",
             "inputs": [{ "name": "spender", "type": "address" },
                        { "name": "amount", "type": "uint256" }] }]"#,
    )
    .unwrap();
    let decoder = Decoder::new(DecoderConfig {
        chain: None,
        abi_root: Some(dir.path().to_path_buf()),
        fourbyte: None,
    });

    let mut calldata = "0x095ea7b3".to_string();
    calldata.push_str(&"00".repeat(12));
    calldata.push_str(&"11".repeat(20));
    calldata.push_str(&format!("{:064x}", 1u64));
    let target = pool();
    let mut req = DecodeRequest::new(&calldata);
    req.to = Some(&target);
    let analysis = decoder.decode_offline(req).unwrap();

    assert!(analysis.verified);
    assert!(!analysis.abi_verified);
    assert_eq!(analysis.source, SemanticSource::VerifiedDb);
}

#[test]
fn invalid_calldata_surfaces_immediately() {
    let decoder = Decoder::offline();
    assert!(decoder.decode_offline(DecodeRequest::new("")).is_err());
    assert!(decoder.decode_offline(DecodeRequest::new("0xzz")).is_err());
    assert!(decoder.decode_offline(DecodeRequest::new("0x1234")).is_err());
}
