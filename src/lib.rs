// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # casper3 - DNS record synchronization for Kubernetes workloads
//!
//! casper3 is a Kubernetes controller written in Rust that keeps the `A`
//! and `TXT` records of a managed DNS zone in sync with the
//! externally-addressable workloads of a cluster: labeled pool nodes, and
//! an opted-in subset of pods pinned to those nodes.
//!
//! ## Overview
//!
//! Every tracked workload gets one `A` record (name → IPv4) and one
//! companion `TXT` record whose content is the owner tag marking the pair
//! as managed by this controller. The zone is shared with foreign records;
//! the owner tag (plus a name-prefix guard for node deletions) is what
//! lets the controller safely own a subset of a zone it does not
//! exclusively control.
//!
//! ## Modules
//!
//! - [`cluster`] - Kubernetes desired-state source (nodes, pods)
//! - [`heritage`] - owner-tag codec for managed `TXT` records
//! - [`providers`] - DNS back-end adapters (Cloudflare, DigitalOcean)
//! - [`reconcilers`] - node and pod record reconciliation
//! - [`config`] - environment configuration
//! - [`metrics`] - Prometheus counters and gauges
//!
//! ## Example
//!
//! ```rust
//! use casper3::heritage;
//!
//! // The owner tag a node record pair carries in its TXT content
//! let tag = heritage::node_tag("production");
//! assert_eq!(tag, "heritage=casper-3,environment=production");
//! ```
//!
//! ## Operational notes
//!
//! - Reconciliation is driven by a fixed interval, not by watches; each
//!   tick rebuilds the cluster snapshot and diffs it against the zone.
//! - DNS is eventually consistent with the most recent snapshot; there is
//!   no read-your-write guarantee and no coordination between replicas.
//! - The only persisted state is the owner-tag convention itself, stored
//!   in the zone.

pub mod cluster;
pub mod config;
pub mod constants;
pub mod errors;
pub mod heritage;
pub mod metrics;
pub mod providers;
pub mod reconcilers;
