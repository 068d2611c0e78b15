//! Integration tests for domain-scan-lib against stubbed RDAP and
//! translation services.

use domain_scan_lib::{
    CandidateStatus, DomainScanError, DomainScanner, RdapClient, ScanConfig, StatusProvider,
    Translator, LOOKUP_FAILED_MESSAGE,
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn bootstrap_body(service_url: &str) -> serde_json::Value {
    json!({
        "version": "1.0",
        "publication": "2024-01-01T00:00:00Z",
        "services": [
            [["xyz", "io"], [service_url]],
            [["com"], ["http://127.0.0.1:1/never-used/"]]
        ]
    })
}

async fn bootstrap_server() -> MockServer {
    let server = MockServer::start_async().await;
    let service_url = server.url("/rdap/");
    server
        .mock_async(|when, then| {
            when.method(GET).path("/dns.json");
            then.status(200).json_body(bootstrap_body(&service_url));
        })
        .await;
    server
}

fn rdap_client(server: &MockServer) -> RdapClient {
    RdapClient::with_settings(&server.url("/dns.json"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_unregistered_domain_is_available() {
    let server = bootstrap_server().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rdap/domain/foo.xyz")
                .header("accept", "application/rdap+json");
            then.status(404);
        })
        .await;

    let report = rdap_client(&server).check_domain("foo.xyz").await;

    lookup.assert_async().await;
    assert_eq!(report.status, CandidateStatus::Available);
    assert!(report.registration_date.is_none());
}

#[tokio::test]
async fn test_registered_domain_reports_registration_date() {
    let server = bootstrap_server().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rdap/domain/taken.io");
            then.status(200).json_body(json!({
                "objectClassName": "domain",
                "ldhName": "taken.io",
                "events": [
                    {"eventAction": "last changed", "eventDate": "2023-05-05T00:00:00Z"},
                    {"eventAction": "registration", "eventDate": "2020-01-01T00:00:00Z"}
                ]
            }));
        })
        .await;

    let report = rdap_client(&server).check_status("taken.io").await;

    assert_eq!(report.status, CandidateStatus::Registered);
    assert_eq!(
        report.registration_date.as_deref(),
        Some("2020-01-01T00:00:00Z")
    );
}

#[tokio::test]
async fn test_unexpected_registry_status_is_unknown() {
    let server = bootstrap_server().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rdap/domain/busy.xyz");
            then.status(500);
        })
        .await;

    let report = rdap_client(&server).check_domain("busy.xyz").await;

    assert_eq!(report.status, CandidateStatus::Unknown);
    assert_eq!(
        report.message.as_deref(),
        Some("Unexpected response from RDAP: 500")
    );
}

#[tokio::test]
async fn test_suffix_missing_from_bootstrap_is_unknown() {
    let server = bootstrap_server().await;

    let report = rdap_client(&server).check_domain("example.dev").await;

    assert_eq!(report.status, CandidateStatus::Unknown);
    assert_eq!(
        report.message.as_deref(),
        Some("Could not find RDAP service for TLD: dev")
    );
}

#[tokio::test]
async fn test_unreachable_bootstrap_is_unknown() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/dns.json");
            then.status(503);
        })
        .await;

    let report = rdap_client(&server).check_domain("foo.xyz").await;

    assert_eq!(report.status, CandidateStatus::Unknown);
}

#[tokio::test]
async fn test_unreachable_registry_is_error() {
    let server = bootstrap_server().await;

    let report = rdap_client(&server).check_domain("example.com").await;

    assert_eq!(report.status, CandidateStatus::Error);
    assert_eq!(report.message.as_deref(), Some(LOOKUP_FAILED_MESSAGE));
}

fn translator_config(server: &MockServer) -> ScanConfig {
    ScanConfig::default()
        .with_api_base_url(server.url("/v1"))
        .with_api_key("sk-test")
        .with_model("test-model")
}

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

#[tokio::test]
async fn test_translator_parses_provider_reply() {
    let server = MockServer::start_async().await;
    let content = json!({
        "translations": [
            {"language": "English", "translation": "coffee"},
            {"language": "German", "translation": "kaffee"},
            {"language": "Japanese", "translation": "kohi"}
        ]
    })
    .to_string();
    let completion = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .json_body_partial(r#"{"model": "test-model", "response_format": {"type": "json_object"}}"#);
            then.status(200).json_body(chat_reply(&content));
        })
        .await;

    let translator = Translator::from_config(&translator_config(&server)).unwrap();
    assert!(!translator.uses_mock());

    let translations = translator.translate_keyword("coffee").await.unwrap();

    completion.assert_async().await;
    assert_eq!(translations.len(), 3);
    assert_eq!(translations[1].language, "German");
    assert_eq!(translations[1].translation, "kaffee");
}

#[tokio::test]
async fn test_translator_rejects_malformed_reply() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(chat_reply("here you go: coffee, kaffee"));
        })
        .await;

    let translator = Translator::from_config(&translator_config(&server)).unwrap();
    let result = translator.translate_keyword("coffee").await;

    assert!(matches!(result, Err(DomainScanError::TranslationError { .. })));
}

#[tokio::test]
async fn test_translator_surfaces_provider_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401).json_body(json!({"error": {"message": "bad key"}}));
        })
        .await;

    let translator = Translator::from_config(&translator_config(&server)).unwrap();
    let result = translator.translate_keyword("coffee").await;

    assert!(matches!(result, Err(DomainScanError::TranslationError { .. })));
}

#[tokio::test]
async fn test_translator_without_key_never_calls_out() {
    let server = MockServer::start_async().await;
    let completion = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500);
        })
        .await;

    let config = ScanConfig::default().with_api_base_url(server.url("/v1"));
    let translator = Translator::from_config(&config).unwrap();
    let translations = translator.translate_keyword("coffee").await.unwrap();

    assert!(translator.uses_mock());
    assert_eq!(translations.len(), 5);
    completion.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_scanner_end_to_end_with_mock_translations() {
    let server = bootstrap_server().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rdap/domain/coffee.xyz");
            then.status(200).json_body(json!({
                "events": [{"eventAction": "registration", "eventDate": "2015-06-01T00:00:00Z"}]
            }));
        })
        .await;
    for label in ["coffeees", "coffeefr", "coffeede", "coffeeit"] {
        let path = format!("/rdap/domain/{}.xyz", label);
        server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(404);
            })
            .await;
    }

    let config = ScanConfig::default()
        .with_tlds(vec!["xyz".to_string()])
        .with_delay(Duration::from_millis(1))
        .with_bootstrap_url(server.url("/dns.json"));
    let mut scanner = DomainScanner::from_config(&config).unwrap();
    assert!(scanner.uses_mock_translations());

    let initial = scanner.submit_keyword("coffee").await.unwrap();
    assert_eq!(initial.len(), 5);

    let mut indexes = Vec::new();
    while let Some(update) = scanner.next_update().await {
        indexes.push(update.index);
    }
    assert_eq!(indexes, vec![0, 1, 2, 3, 4]);

    let board = scanner.board();
    let summary = board.summary();
    assert_eq!(summary.registered, 1);
    assert_eq!(summary.available, 4);
    assert_eq!(summary.checking, 0);

    let coffee = &board.candidates()[0];
    assert_eq!(coffee.domain, "coffee.xyz");
    assert_eq!(coffee.status, CandidateStatus::Registered);
    let traffic = coffee.traffic_data.as_ref().unwrap();
    assert_eq!(traffic.metrics.len(), 3);
    assert!(board.candidates()[1..].iter().all(|c| c.traffic_data.is_none()));
}
