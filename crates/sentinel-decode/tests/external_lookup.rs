// SPDX-License-Identifier: MIT OR Apache-2.0
//! External lookup behavior against a mock 4byte.directory.

use sentinel_decode::{DecodeRequest, Decoder, DecoderConfig, FourByteClient};
use sentinel_types::{SemanticSource, Severity};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn decoder_against(server: &MockServer) -> Decoder {
    Decoder::new(DecoderConfig {
        chain: None,
        abi_root: None,
        fourbyte: Some(FourByteClient::new(server.uri(), Duration::from_millis(500))),
    })
}

#[tokio::test]
async fn unknown_selector_resolves_via_external_lookup_unverified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/signatures/"))
        .and(query_param("hex_signature", "0xdeadbeef"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                { "text_signature": "deadFunction(uint256)" },
                { "text_signature": "collision(address)" }
            ]
        })))
        .mount(&server)
        .await;

    let decoder = decoder_against(&server);
    let calldata = format!("0xdeadbeef{}", "00".repeat(32));
    let analysis = decoder
        .decode(DecodeRequest::new(&calldata))
        .await
        .unwrap();

    assert_eq!(analysis.source, SemanticSource::ExternalUnverified);
    assert!(!analysis.verified);
    assert_eq!(analysis.function_name.as_deref(), Some("deadFunction"));
    assert_eq!(analysis.signature.as_deref(), Some("deadFunction(uint256)"));
    let matches = analysis.all_matches.as_ref().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[1], "collision(address)");
}

#[tokio::test]
async fn external_failure_is_non_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/signatures/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let decoder = decoder_against(&server);
    let analysis = decoder
        .decode(DecodeRequest::new("0xdeadbeef"))
        .await
        .unwrap();

    assert_eq!(analysis.source, SemanticSource::Unverified);
    assert!(analysis.signature.is_none());
    assert_eq!(analysis.effect.severity, Severity::Unknown);
}

#[tokio::test]
async fn external_timeout_is_non_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/signatures/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(serde_json::json!({ "results": [] })),
        )
        .mount(&server)
        .await;

    let decoder = decoder_against(&server);
    let analysis = decoder
        .decode(DecodeRequest::new("0xdeadbeef"))
        .await
        .unwrap();

    assert_eq!(analysis.source, SemanticSource::Unverified);
}

#[tokio::test]
async fn verified_selectors_never_hit_the_network() {
    // No mock mounted: any request would 404 and, worse, prove we called out.
    let server = MockServer::start().await;
    let decoder = decoder_against(&server);

    // approve(spender, 1e18)
    let calldata = format!(
        "0x095ea7b3{}{}",
        "00".repeat(12) + &"de".repeat(20),
        format!("{:064x}", 1_000_000_000_000_000_000u64)
    );
    let analysis = decoder
        .decode(DecodeRequest::new(&calldata))
        .await
        .unwrap();

    assert!(analysis.verified);
    assert_eq!(analysis.source, SemanticSource::VerifiedDb);
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn undecodable_external_signature_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/signatures/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            // Claims two address params, but the calldata has no body.
            "results": [{ "text_signature": "needsArgs(address,address)" }]
        })))
        .mount(&server)
        .await;

    let decoder = decoder_against(&server);
    let analysis = decoder
        .decode(DecodeRequest::new("0xdeadbeef"))
        .await
        .unwrap();

    // The bogus signature is cleared rather than surfaced as an error.
    assert!(analysis.signature.is_none());
    assert!(analysis.decode_error.is_none());
    assert_eq!(analysis.source, SemanticSource::Unverified);
}
