// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Set-difference and deletion-guard helpers shared by the reconcilers.
//!
//! Records and workloads are matched by *short key*: the first
//! dot-delimited segment of a name. This collapses any zone or subdomain
//! variation and is correct because pool-local names are unique within the
//! zone by construction.

use std::collections::HashSet;

/// Elements of `a` not present in `b`, preserving the order of `a`.
#[must_use]
pub fn difference(a: &[String], b: &[String]) -> Vec<String> {
    let known: HashSet<&str> = b.iter().map(String::as_str).collect();
    a.iter()
        .filter(|x| !known.contains(x.as_str()))
        .cloned()
        .collect()
}

/// The first dot-delimited segment of a record name.
///
/// `sfu-abc.dev.example.com` → `sfu-abc`.
#[must_use]
pub fn short_key(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Deletion safety guard for node records.
///
/// A record may be deleted only when its name starts with `<segment>-`,
/// where `<segment>` is the first `-`-delimited part of some currently
/// desired node name. Zones are shared with foreign records; when a cluster
/// snapshot comes back empty or pool labels are temporarily missing, this
/// keeps the controller from emptying the zone. The rule is approximate on
/// purpose: it permits deletion only in the neighborhood of known-good
/// naming conventions.
#[must_use]
pub fn record_prefix_matches_node_prefixes(record_name: &str, node_names: &[String]) -> bool {
    node_names.iter().any(|node| {
        let segment = node.split('-').next().unwrap_or(node);
        record_name.starts_with(&format!("{segment}-"))
    })
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod diff_tests;
