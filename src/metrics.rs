// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the casper3 controller.
//!
//! Two series are exported under the `casper3` namespace:
//!
//! - `casper3_app_execution_error{errorMessage}` — counter, incremented on
//!   every provider or cluster error
//! - `casper3_dns_records_total{provider}` — gauge, zone-wide record count
//!
//! The registry is process-wide; counters and gauges are lock-free at the
//! engine's granularity. `gather_metrics` produces the text exposition
//! served at `/metrics`.

use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;

/// Namespace prefix for all casper3 metrics
const METRICS_NAMESPACE: &str = "casper3";

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via the
/// `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Execution errors encountered, labeled by error message
pub static EXECUTION_ERROR: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new("execution_error", "Execution errors encountered")
        .namespace(METRICS_NAMESPACE)
        .subsystem("app");
    let counter = CounterVec::new(opts, &["errorMessage"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total amount of DNS records in the zone, labeled by provider
pub static DNS_RECORDS_TOTAL: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        "records_total",
        "Total amount of DNS records for the provider",
    )
    .namespace(METRICS_NAMESPACE)
    .subsystem("dns");
    let gauge = GaugeVec::new(opts, &["provider"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

/// Increment the execution-error counter for the given error message.
pub fn exec_err_inc(message: &str) {
    EXECUTION_ERROR.with_label_values(&[message]).inc();
}

/// Set the zone-wide record count gauge for a provider.
pub fn dns_records_total(provider: &str, count: f64) {
    DNS_RECORDS_TOTAL.with_label_values(&[provider]).set(count);
}

/// Gather all registered metrics in the Prometheus text format.
///
/// # Errors
///
/// Returns an error if metric encoding fails or the encoded bytes are not
/// valid UTF-8.
pub fn gather_metrics() -> Result<String, anyhow::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod metrics_tests;
