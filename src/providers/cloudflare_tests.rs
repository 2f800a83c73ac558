// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for Cloudflare response handling.

use super::*;

#[test]
fn test_record_list_response_parsing() {
    let body = r#"{
        "success": true,
        "result": [
            {
                "id": "372e67954025e0ba6aaa6d586b9e0b59",
                "type": "TXT",
                "name": "sfu-a.dev.example.com",
                "content": "heritage=casper-3,environment=dev",
                "ttl": 1800
            },
            {
                "id": "4a5c0e7b2d8f4f5e9c3b1a2d3e4f5a6b",
                "type": "A",
                "name": "sfu-a.dev.example.com",
                "content": "1.1.1.1",
                "proxied": false
            }
        ],
        "result_info": { "page": 1, "per_page": 100, "total_pages": 1, "count": 2, "total_count": 2 }
    }"#;

    let parsed: RecordListResponse = serde_json::from_str(body).unwrap();
    let records = parsed.result.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].record_type, "TXT");
    assert_eq!(records[0].name, "sfu-a.dev.example.com");
    assert_eq!(records[0].content, "heritage=casper-3,environment=dev");
    assert_eq!(parsed.result_info.unwrap().total_pages, 1);
}

#[test]
fn test_record_without_content_defaults_to_empty() {
    let body = r#"{ "result": [ { "id": "x", "type": "NS", "name": "example.com" } ] }"#;
    let parsed: RecordListResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.result.unwrap()[0].content, "");
}

#[test]
fn test_zone_list_response_parsing() {
    let body = r#"{ "result": [ { "id": "023e105f4ecef8ad9ca31a8372d0c353", "name": "example.com" } ] }"#;
    let parsed: ZoneListResponse = serde_json::from_str(body).unwrap();
    assert_eq!(
        parsed.result.unwrap()[0].id,
        "023e105f4ecef8ad9ca31a8372d0c353"
    );
}

#[test]
fn test_empty_zone_result_parses_as_none_or_empty() {
    let body = r#"{ "result": [] }"#;
    let parsed: ZoneListResponse = serde_json::from_str(body).unwrap();
    assert!(parsed.result.unwrap().is_empty());

    let body = r#"{ "result": null }"#;
    let parsed: ZoneListResponse = serde_json::from_str(body).unwrap();
    assert!(parsed.result.is_none());
}

#[test]
fn test_debug_does_not_expose_api_token() {
    let provider = CloudflareDns::new("secret_token_12345", "example.com");
    let rendered = format!("{provider:?}");
    assert!(!rendered.contains("secret_token_12345"));
    assert!(rendered.contains("REDACTED"));
    assert!(rendered.contains("example.com"));
}

#[test]
fn test_provider_name() {
    let provider = CloudflareDns::new("token", "example.com");
    assert_eq!(provider.name(), "cloudflare");
}
