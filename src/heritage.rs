// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Owner-tag codec for managed `TXT` records.
//!
//! Every record pair this controller creates carries a companion `TXT`
//! record whose content is a flat, comma-separated `key=value` list. The
//! tag identifies the record as managed (`heritage=casper-3`), names the
//! environment it belongs to, and — for pod records — carries the binding
//! metadata used to detect rescheduling.
//!
//! The encoded strings are format-stable: zones in production already
//! contain them, and ownership checks are substring tests against the raw
//! content. Field order must not change.
//!
//! # Example
//!
//! ```rust
//! use casper3::heritage;
//!
//! let tag = heritage::pod_tag("dev", "router-0", "node-x", "3.3.3.3");
//! assert!(heritage::is_owned(&tag));
//! assert!(heritage::is_pod_record(&tag));
//! assert_eq!(heritage::assigned_node(&tag), Some("node-x"));
//! ```

use crate::constants::{HERITAGE_MARKER, POD_SYNC_MARKER};

/// Build the owner tag for a node record.
///
/// Produces `heritage=casper-3,environment=<env>`.
#[must_use]
pub fn node_tag(env: &str) -> String {
    format!("{HERITAGE_MARKER},environment={env}")
}

/// Build the owner tag for a pod record.
///
/// Produces
/// `heritage=casper-3,pod-sync=true,environment=<env>,podName=<pod>,assignedNode=<node>,addressIPv4=<ipv4>`.
#[must_use]
pub fn pod_tag(env: &str, pod_name: &str, assigned_node: &str, address_ipv4: &str) -> String {
    format!(
        "{HERITAGE_MARKER},{POD_SYNC_MARKER},environment={env},podName={pod_name},assignedNode={assigned_node},addressIPv4={address_ipv4}"
    )
}

/// Whether a `TXT` content string marks a record managed by this controller.
#[must_use]
pub fn is_owned(content: &str) -> bool {
    content.contains(HERITAGE_MARKER)
}

/// Whether a `TXT` content string marks a record created by a pod-sync
/// operation. Pod records also satisfy [`is_owned`].
#[must_use]
pub fn is_pod_record(content: &str) -> bool {
    content.contains(POD_SYNC_MARKER)
}

/// Parse the `assignedNode=<x>` value out of an owner tag.
///
/// Returns `None` when the tag carries no node binding (node records).
/// Rescheduling detection itself does not use this parse: it is a substring
/// containment test of the current node name against the whole tag, which
/// stays correct as long as the `assignedNode=` spelling is preserved.
#[must_use]
pub fn assigned_node(content: &str) -> Option<&str> {
    content
        .split(',')
        .find_map(|field| field.strip_prefix("assignedNode="))
}

#[cfg(test)]
#[path = "heritage_tests.rs"]
mod heritage_tests;
