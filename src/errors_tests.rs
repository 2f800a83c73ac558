// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for error display formatting.

use super::*;

#[test]
fn test_api_error_display() {
    let err = ProviderError::Api {
        provider: "cloudflare",
        status: 429,
        message: "rate limited".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "cloudflare API error (HTTP 429): rate limited"
    );
}

#[test]
fn test_zone_not_found_display() {
    let err = ProviderError::ZoneNotFound {
        zone: "example.com".to_string(),
    };
    assert_eq!(err.to_string(), "zone 'example.com' not found");
}

#[test]
fn test_record_mismatch_display_names_both_records() {
    let err = ProviderError::RecordMismatch {
        name: "other.example.com".to_string(),
        record_type: "CNAME".to_string(),
        requested: "sfu-a.example.com".to_string(),
    };
    let rendered = err.to_string();
    assert!(rendered.contains("other.example.com"));
    assert!(rendered.contains("CNAME"));
    assert!(rendered.contains("sfu-a.example.com"));
}

#[test]
fn test_unexpected_payload_display() {
    let err = ProviderError::UnexpectedPayload {
        provider: "digitalocean",
        reason: "missing domain_records".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "unexpected digitalocean response: missing domain_records"
    );
}

#[test]
fn test_invalid_interval_display() {
    let err = ConfigError::InvalidInterval {
        value: "abc".to_string(),
        reason: "invalid digit found in string".to_string(),
    };
    assert!(err.to_string().contains("INTERVAL"));
    assert!(err.to_string().contains("abc"));
}
