// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the Prometheus metrics surface.

use super::*;

#[test]
fn test_execution_error_counter_increments() {
    let before = EXECUTION_ERROR.with_label_values(&["boom"]).get();
    exec_err_inc("boom");
    exec_err_inc("boom");
    let after = EXECUTION_ERROR.with_label_values(&["boom"]).get();
    assert!((after - before - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_dns_records_total_gauge_sets_latest_value() {
    dns_records_total("digitalocean", 1500.0);
    dns_records_total("digitalocean", 1502.0);
    let value = DNS_RECORDS_TOTAL
        .with_label_values(&["digitalocean"])
        .get();
    assert!((value - 1502.0).abs() < f64::EPSILON);
}

#[test]
fn test_gather_metrics_exposes_namespaced_series() {
    exec_err_inc("gather-test");
    dns_records_total("cloudflare", 7.0);

    let text = gather_metrics().unwrap();
    assert!(text.contains("casper3_app_execution_error"));
    assert!(text.contains("casper3_dns_records_total"));
    assert!(text.contains("errorMessage=\"gather-test\""));
    assert!(text.contains("provider=\"cloudflare\""));
}
