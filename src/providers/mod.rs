// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS provider adapters.
//!
//! The reconcilers are generic over the [`DnsProvider`] capability; one
//! adapter exists per back-end (Cloudflare, DigitalOcean). The adapters hide
//! two very different REST APIs behind the same five operations: list owned
//! records, count the zone, create a record pair, delete a record pair.
//!
//! Adapters are stateless HTTP clients. They perform no retries and no
//! caching; every remote failure surfaces as a [`ProviderError`] that the
//! reconcilers treat as a per-entry failure. All operations are plain
//! futures, so a caller that drops a tick cancels any in-flight I/O.

use crate::config::{Config, ProviderKind};
use crate::errors::ProviderError;
use async_trait::async_trait;
use std::sync::Arc;

pub mod cloudflare;
pub mod digitalocean;

pub use cloudflare::CloudflareDns;
pub use digitalocean::DigitalOceanDns;

/// A DNS record as returned by a provider listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    /// Back-end record id, used for deletion
    pub id: String,
    /// Record name as the provider reports it (short or fully qualified,
    /// depending on the back-end)
    pub name: String,
    /// Record type (`A`, `TXT`, ...)
    pub record_type: String,
    /// Record content (`A`: the address, `TXT`: the owner tag)
    pub content: String,
}

/// Capability the reconcilers depend on, implemented once per back-end.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider label for logs and the records-total gauge.
    fn name(&self) -> &'static str;

    /// Every record of the given type whose content contains `marker`.
    ///
    /// Back-ends that cannot filter on content server-side filter
    /// client-side (both of ours do).
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the remote listing fails.
    async fn records_by_type_and_content(
        &self,
        record_type: &str,
        marker: &str,
    ) -> Result<Vec<ZoneRecord>, ProviderError>;

    /// Total record count across all types in the zone.
    ///
    /// Expensive on large zones; callers run it in the background and feed
    /// the records-total gauge.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the remote listing fails.
    async fn count_all_records(&self) -> Result<f64, ProviderError>;

    /// Create the `A` + `TXT` pair for `name`, TTL 1800.
    ///
    /// The effective record name is `name` when `subdomain` is empty,
    /// otherwise `name.subdomain` — never a trailing dot. `proxied` is
    /// honored only by back-ends that support it.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when either creation fails. The pair is
    /// not rolled back; the next tick sees the `TXT` (or its absence) as the
    /// source of truth.
    async fn create_record_pair(
        &self,
        name: &str,
        subdomain: &str,
        address_ipv4: &str,
        txt_content: &str,
        proxied: bool,
    ) -> Result<(), ProviderError>;

    /// Delete every `A` and `TXT` record named exactly `fqdn`.
    ///
    /// Deletion is two-phase: list matching records of each type, then
    /// delete each by id. A listed record whose name or type does not match
    /// the request aborts the whole deletion with
    /// [`ProviderError::RecordMismatch`].
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when listing or any deletion fails.
    async fn delete_record_pair(&self, fqdn: &str) -> Result<(), ProviderError>;
}

/// Construct the adapter selected by the configuration.
#[must_use]
pub fn provider_from_config(cfg: &Config) -> Arc<dyn DnsProvider> {
    match cfg.provider {
        ProviderKind::Cloudflare => Arc::new(CloudflareDns::new(&cfg.token, &cfg.zone)),
        ProviderKind::DigitalOcean => Arc::new(DigitalOceanDns::new(&cfg.token, &cfg.zone)),
    }
}

/// Effective record name for creation: `name` or `name.subdomain`.
///
/// Back-ends whose API would treat a trailing-empty label literally must
/// never receive `name.`, so the dot is emitted only with a non-empty
/// subdomain.
#[must_use]
pub fn effective_record_name(name: &str, subdomain: &str) -> String {
    if subdomain.is_empty() {
        name.to_string()
    } else {
        format!("{name}.{subdomain}")
    }
}

/// Guard a two-phase deletion: only records with the expected name and type
/// `A` or `TXT` may be deleted.
///
/// `expected` is in whatever form the back-end reports names (fully
/// qualified for Cloudflare, zone-relative for DigitalOcean).
///
/// # Errors
///
/// Returns [`ProviderError::RecordMismatch`] when the record came back from
/// a wider query than requested.
pub fn validate_deletion_match(record: &ZoneRecord, expected: &str) -> Result<(), ProviderError> {
    let type_ok = record.record_type == "A" || record.record_type == "TXT";
    if record.name == expected && type_ok {
        Ok(())
    } else {
        Err(ProviderError::RecordMismatch {
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            requested: expected.to_string(),
        })
    }
}
