// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes desired-state source.
//!
//! Lists the pool nodes and opted-in pods that DNS records are kept in sync
//! with. Both queries are read-only and restartable; a fresh client handle
//! is constructed every tick so credential rotation is picked up without a
//! restart.
//!
//! Node lists paginate with continue tokens rather than trusting a single
//! page; a cluster larger than one page would otherwise silently drop nodes
//! from the diff and trigger deletions on subsequent ticks.

use crate::config::Config;
use crate::constants::{KUBE_LIST_PAGE_SIZE, KUBE_MAX_LIST_PAGES};
use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{Node as CoreNode, Pod as CorePod};
use kube::{api::ListParams, Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::{debug, error, info};

/// A pool node with a routable address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Short node identifier (raw name truncated at the first `.`)
    pub name: String,
    /// First `ExternalIP`-typed address on the node
    pub address_ipv4: String,
}

/// An opted-in pod pinned to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pod {
    /// Pod name
    pub name: String,
    /// The node the scheduler currently places the pod on
    pub assigned_node: Node,
    /// Pod labels, preserved from the cluster object
    pub labels: BTreeMap<String, String>,
}

/// Handle on the cluster API.
pub struct Cluster {
    client: Client,
}

impl Cluster {
    /// Create a client from the ambient environment (in-cluster service
    /// account, or local kubeconfig when running outside).
    ///
    /// # Errors
    ///
    /// Returns an error when no usable Kubernetes configuration is found.
    pub async fn new() -> Result<Self> {
        let client = Client::try_default()
            .await
            .context("failed to create Kubernetes client")?;
        Ok(Self { client })
    }

    /// List pool nodes and their external IPv4 addresses.
    ///
    /// Nodes are selected with `<LABEL_KEY> in (<LABEL_VALUES>)`. A node
    /// without an `ExternalIP` address is logged and skipped, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the node listing fails.
    pub async fn nodes(&self, cfg: &Config) -> Result<Vec<Node>> {
        let api: Api<CoreNode> = Api::all(self.client.clone());
        let selector = cfg.node_label_selector();
        let items = list_all_paginated(&api, &selector)
            .await
            .context("failed to list nodes")?;

        let mut nodes = Vec::new();
        for node in &items {
            match node_desc(node) {
                Some(desc) => {
                    debug!(node = %desc.name, ipv4 = %desc.address_ipv4, "IPv4 address found");
                    nodes.push(desc);
                }
                None => {
                    info!(node = %node.name_any(), "No IPv4 address found");
                }
            }
        }
        Ok(nodes)
    }

    /// List opted-in pods with their assigned node's external IPv4.
    ///
    /// Pods are selected with `<SYNC_POD_LABEL_KEY>=<SYNC_POD_LABEL_VALUE>`
    /// across all namespaces. Any node lookup failure fails the whole call.
    ///
    /// # Errors
    ///
    /// Returns an error when the pod listing fails, a pod is not yet
    /// scheduled, or its node has no external address.
    pub async fn pods(&self, cfg: &Config) -> Result<Vec<Pod>> {
        let api: Api<CorePod> = Api::all(self.client.clone());
        let selector = cfg.pod_label_selector();
        let items = list_all_paginated(&api, &selector)
            .await
            .context("failed to list pods")?;

        let nodes: Api<CoreNode> = Api::all(self.client.clone());
        let mut pods = Vec::new();
        for pod in &items {
            let name = pod.name_any();
            let node_name = pod
                .spec
                .as_ref()
                .and_then(|s| s.node_name.clone())
                .with_context(|| format!("pod '{name}' is not assigned to a node"))?;

            let node = nodes
                .get(&node_name)
                .await
                .with_context(|| format!("failed to get node '{node_name}' for pod '{name}'"))?;
            let address_ipv4 = external_ipv4(&node)
                .with_context(|| format!("node '{node_name}' has no ExternalIP address"))?;

            pods.push(Pod {
                name,
                assigned_node: Node {
                    name: node_name,
                    address_ipv4,
                },
                labels: pod.labels().clone(),
            });
        }
        Ok(pods)
    }
}

/// List all resources matching a label selector, fetching page by page.
///
/// The continue-token handling follows the API's quirks: an empty-string
/// token means "last page", and a token repeating verbatim would loop
/// forever, so both end the listing.
async fn list_all_paginated<K>(api: &Api<K>, label_selector: &str) -> Result<Vec<K>>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    let mut list_params = ListParams::default().labels(label_selector);
    list_params.limit = Some(KUBE_LIST_PAGE_SIZE);

    let mut all_items = Vec::new();
    let mut page_count = 0;
    let mut last_continue_token: Option<String> = None;

    loop {
        page_count += 1;
        let result = api.list(&list_params).await?;

        let new_continue_token = result
            .metadata
            .continue_
            .clone()
            .filter(|token| !token.is_empty());

        if new_continue_token.is_some() && new_continue_token == last_continue_token {
            error!(
                page = page_count,
                "Continue token repeated; aborting pagination"
            );
            break;
        }

        all_items.extend(result.items);

        match new_continue_token {
            Some(token) => {
                last_continue_token = Some(token.clone());
                list_params.continue_token = Some(token);
            }
            None => break,
        }

        if page_count >= KUBE_MAX_LIST_PAGES {
            error!(
                page = page_count,
                "Pagination safety limit exceeded; aborting"
            );
            break;
        }
    }

    debug!(
        pages = page_count,
        items = all_items.len(),
        selector = label_selector,
        "Completed paginated list"
    );
    Ok(all_items)
}

/// The node name truncated at the first `.`.
///
/// Cloud node names like `ip-1-2-3-4.ec2.internal` would fail `A` record
/// setup; only the leading segment is used as the record key.
#[must_use]
pub fn short_node_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// The first `ExternalIP`-typed address on a node, if any.
#[must_use]
pub fn external_ipv4(node: &CoreNode) -> Option<String> {
    node.status
        .as_ref()?
        .addresses
        .as_ref()?
        .iter()
        .find(|addr| addr.type_ == "ExternalIP")
        .map(|addr| addr.address.clone())
}

/// Build the node descriptor, or `None` when the node has no external
/// address.
#[must_use]
pub fn node_desc(node: &CoreNode) -> Option<Node> {
    let address_ipv4 = external_ipv4(node)?;
    Some(Node {
        name: short_node_name(&node.name_any()).to_string(),
        address_ipv4,
    })
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod cluster_tests;
