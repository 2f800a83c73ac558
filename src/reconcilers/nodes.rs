// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Node record reconciliation.
//!
//! Synchronizes the owned node record pairs with the current pool nodes.
//! The companion `TXT` records are the source of truth: they are created
//! and deleted alongside the `A` records, and their content carries the
//! owner tag that scopes everything this reconciler may touch.

use crate::cluster::Node;
use crate::config::Config;
use crate::heritage;
use crate::metrics;
use crate::providers::DnsProvider;
use crate::reconcilers::diff::{difference, record_prefix_matches_node_prefixes, short_key};
use crate::reconcilers::record_fqdn;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Reconcile node record pairs against the desired node set.
///
/// Listing failure aborts this reconciler for the tick; every other failure
/// is per-entry — logged, counted, and skipped.
///
/// # Errors
///
/// Returns an error only when the owned-record listing fails.
pub async fn sync_nodes(
    provider: &Arc<dyn DnsProvider>,
    nodes: &[Node],
    cfg: &Config,
) -> Result<()> {
    // Zone-wide count feeds the records-total gauge. The call can take tens
    // of seconds on large zones, so it must not block the reconciliation;
    // on error the gauge is left stale.
    let counter = Arc::clone(provider);
    tokio::spawn(async move {
        match counter.count_all_records().await {
            Ok(n) => metrics::dns_records_total(counter.name(), n),
            Err(e) => {
                metrics::exec_err_inc(&e.to_string());
                warn!(provider = counter.name(), error = %e, "Failed to count zone records");
            }
        }
    });

    let marker = heritage::node_tag(&cfg.env);
    let owned = provider
        .records_by_type_and_content("TXT", &marker)
        .await
        .map_err(|e| {
            metrics::exec_err_inc(&e.to_string());
            e
        })
        .context("failed to list owned node records")?;

    let owned_keys: Vec<String> = owned
        .iter()
        .map(|r| short_key(&r.name).to_string())
        .collect();
    let desired: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
    debug!(records = ?owned_keys, "Owned node records found");
    debug!(nodes = ?desired, "Pool nodes found");

    let to_add = difference(&desired, &owned_keys);
    if !to_add.is_empty() {
        info!(entries = ?to_add, "Entries to be added");
    }
    for name in &to_add {
        let address_ipv4 = nodes
            .iter()
            .find(|n| n.name == *name)
            .map(|n| n.address_ipv4.clone())
            .unwrap_or_default();
        if address_ipv4.is_empty() {
            info!(name = %name, zone = %cfg.zone, "IP address not found for entry");
            continue;
        }

        let proxied = cfg
            .cloudflare_proxied_node_pools
            .iter()
            .any(|pool| name.starts_with(pool.as_str()));
        if let Err(e) = provider
            .create_record_pair(name, &cfg.subdomain, &address_ipv4, &marker, proxied)
            .await
        {
            metrics::exec_err_inc(&e.to_string());
            error!(zone = %cfg.zone, name = %name, error = %e, "Error occurred while adding record");
        }
    }

    let to_delete = difference(&owned_keys, &desired);
    if !to_delete.is_empty() {
        info!(entries = ?to_delete, "Entries to be deleted");
    }
    for name in &to_delete {
        let fqdn = record_fqdn(name, &cfg.subdomain, &cfg.zone);
        if !record_prefix_matches_node_prefixes(&fqdn, &desired) {
            info!(record = %fqdn, "Record matches no desired node prefix, skipping deletion");
            continue;
        }
        debug!(record = %fqdn, "Launching deletion");
        if let Err(e) = provider.delete_record_pair(&fqdn).await {
            metrics::exec_err_inc(&e.to_string());
            error!(zone = %cfg.zone, record = %fqdn, error = %e, "Error occurred while deleting record");
        }
    }

    Ok(())
}
