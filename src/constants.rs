// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the casper3 controller.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Owner Tag Constants
// ============================================================================

/// Substring that marks a DNS record as managed by this controller.
///
/// Existing zones contain this exact spelling; it must never change.
pub const HERITAGE_MARKER: &str = "heritage=casper-3";

/// Substring that marks a `TXT` record as created by a pod-sync operation
/// (as opposed to a node-sync operation).
pub const POD_SYNC_MARKER: &str = "pod-sync=true";

// ============================================================================
// DNS Record Constants
// ============================================================================

/// TTL applied to every managed `A` and `TXT` record, in seconds.
pub const DNS_RECORD_TTL_SECS: u32 = 1800;

// ============================================================================
// Kubernetes API Constants
// ============================================================================

/// Page size for Kubernetes list operations (nodes, pods).
pub const KUBE_LIST_PAGE_SIZE: u32 = 300;

/// Maximum number of pages to fetch before aborting pagination.
///
/// Safety limit for the case where the API server keeps returning continue
/// tokens. With 300 items per page this allows 300,000 resources.
pub const KUBE_MAX_LIST_PAGES: usize = 1_000;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Bind address for the Prometheus metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0";

/// Port for the Prometheus metrics HTTP server
pub const METRICS_SERVER_PORT: u16 = 8080;

/// Path for the Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of Tokio worker threads for the controller runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
