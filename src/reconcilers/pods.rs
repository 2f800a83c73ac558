// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pod record reconciliation.
//!
//! Synchronizes the owned pod record pairs with the opted-in pods and
//! re-points records when a pod is rescheduled to a different node.
//!
//! The flow per tick:
//! 1. fetch owned `TXT` records, keep those carrying `pod-sync=true`
//! 2. diff pod names against record short keys → creates
//! 3. diff record short keys against pod names → deletions
//! 4. rebind sweep: a record whose tag no longer contains the pod's current
//!    node has drifted — delete the pair, then create a fresh one
//!
//! Unlike node records, pod deletions carry no name-prefix guard: pod names
//! are the authoritative keys, so an empty pod snapshot deletes every owned
//! pod record.

use crate::cluster::Pod;
use crate::config::Config;
use crate::constants::HERITAGE_MARKER;
use crate::heritage;
use crate::metrics;
use crate::providers::DnsProvider;
use crate::reconcilers::diff::{difference, short_key};
use crate::reconcilers::record_fqdn;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Reconcile pod record pairs against the desired pod set.
///
/// Listing failure aborts this reconciler for the tick; every other failure
/// is per-entry — logged, counted, and skipped.
///
/// # Errors
///
/// Returns an error only when the owned-record listing fails.
pub async fn sync_pods(provider: &Arc<dyn DnsProvider>, pods: &[Pod], cfg: &Config) -> Result<()> {
    let owned = provider
        .records_by_type_and_content("TXT", HERITAGE_MARKER)
        .await
        .map_err(|e| {
            metrics::exec_err_inc(&e.to_string());
            e
        })
        .context("failed to list owned pod records")?;

    // Only records created by a pod-sync operation belong to this
    // reconciler; node records share the heritage marker.
    let pod_records: Vec<_> = owned
        .into_iter()
        .filter(|r| heritage::is_pod_record(&r.content))
        .collect();

    let owned_keys: Vec<String> = pod_records
        .iter()
        .map(|r| short_key(&r.name).to_string())
        .collect();
    let desired: Vec<String> = pods.iter().map(|p| p.name.clone()).collect();
    debug!(pods = ?desired, "Pods found");

    let to_add = difference(&desired, &owned_keys);
    if !to_add.is_empty() {
        info!(entries = ?to_add, "Entries to be added");
    }
    for name in &to_add {
        let Some(pod) = pods.iter().find(|p| p.name == *name) else {
            continue;
        };
        if pod.assigned_node.address_ipv4.is_empty() {
            info!(name = %name, zone = %cfg.zone, "IP address not found for entry");
            continue;
        }

        let tag = heritage::pod_tag(
            &cfg.env,
            &pod.name,
            &pod.assigned_node.name,
            &pod.assigned_node.address_ipv4,
        );
        if let Err(e) = provider
            .create_record_pair(
                &pod.name,
                &cfg.subdomain,
                &pod.assigned_node.address_ipv4,
                &tag,
                false,
            )
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
        debug!(record = %fqdn, "Launching deletion");
        if let Err(e) = provider.delete_record_pair(&fqdn).await {
            metrics::exec_err_inc(&e.to_string());
            error!(zone = %cfg.zone, record = %fqdn, error = %e, "Error occurred while deleting record");
        }
    }

    // Rebind sweep: detect pods rescheduled onto a different node. The tag
    // is a flat key=value list, so containment of the current node name is
    // the drift test. Delete-then-create is intentional: there is no atomic
    // replace, and a stale A record pointing at a gone node is worse than a
    // brief gap.
    for pod in pods {
        for record in &pod_records {
            if short_key(&record.name) != pod.name
                || record.content.contains(&pod.assigned_node.name)
            {
                continue;
            }

            debug!(
                pod = %pod.name,
                stale_node = ?heritage::assigned_node(&record.content),
                node = %pod.assigned_node.name,
                "Pod appears rescheduled on a different node"
            );
            let fqdn = record_fqdn(&pod.name, &cfg.subdomain, &cfg.zone);
            if let Err(e) = provider.delete_record_pair(&fqdn).await {
                metrics::exec_err_inc(&e.to_string());
                error!(zone = %cfg.zone, record = %fqdn, error = %e, "Error occurred while deleting record");
            }

            let tag = heritage::pod_tag(
                &cfg.env,
                &pod.name,
                &pod.assigned_node.name,
                &pod.assigned_node.address_ipv4,
            );
            if let Err(e) = provider
                .create_record_pair(
                    &pod.name,
                    &cfg.subdomain,
                    &pod.assigned_node.address_ipv4,
                    &tag,
                    false,
                )
                .await
            {
                metrics::exec_err_inc(&e.to_string());
                error!(zone = %cfg.zone, name = %pod.name, error = %e, "Error occurred while adding record");
            }
        }
    }

    Ok(())
}
