// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the owner-tag codec.
//!
//! The encoded strings are format-stable: existing zones contain them, so
//! these tests pin the exact spellings.

use super::*;

#[test]
fn test_node_tag_exact_format() {
    assert_eq!(
        node_tag("dev"),
        "heritage=casper-3,environment=dev"
    );
    assert_eq!(
        node_tag("production"),
        "heritage=casper-3,environment=production"
    );
}

#[test]
fn test_pod_tag_exact_format() {
    let tag = pod_tag("dev", "router-0", "node-x", "3.3.3.3");
    assert_eq!(
        tag,
        "heritage=casper-3,pod-sync=true,environment=dev,podName=router-0,assignedNode=node-x,addressIPv4=3.3.3.3"
    );
}

#[test]
fn test_node_tag_is_owned_but_not_pod_record() {
    let tag = node_tag("dev");
    assert!(is_owned(&tag));
    assert!(!is_pod_record(&tag));
}

#[test]
fn test_pod_tag_is_owned_and_pod_record() {
    let tag = pod_tag("dev", "router-0", "node-x", "3.3.3.3");
    assert!(is_owned(&tag));
    assert!(is_pod_record(&tag));
}

#[test]
fn test_foreign_content_is_not_owned() {
    assert!(!is_owned("v=spf1 include:_spf.example.com ~all"));
    assert!(!is_owned(""));
    assert!(!is_pod_record("heritage=casper-3,environment=dev"));
}

#[test]
fn test_assigned_node_parses_binding() {
    let tag = pod_tag("dev", "router-0", "node-x", "3.3.3.3");
    assert_eq!(assigned_node(&tag), Some("node-x"));
}

#[test]
fn test_assigned_node_absent_on_node_tags() {
    assert_eq!(assigned_node(&node_tag("dev")), None);
    assert_eq!(assigned_node(""), None);
}

#[test]
fn test_encode_then_parse_is_lossless() {
    // Every field the codec defines survives an encode/parse cycle.
    let tag = pod_tag("staging", "sfu-pod-1", "pool-7f2k", "10.1.2.3");
    assert_eq!(assigned_node(&tag), Some("pool-7f2k"));
    assert!(tag.contains("podName=sfu-pod-1"));
    assert!(tag.contains("environment=staging"));
    assert!(tag.contains("addressIPv4=10.1.2.3"));
}

#[test]
fn test_rescheduling_detection_by_substring_containment() {
    // Drift detection checks containment of the node name in the whole tag,
    // which the assignedNode= spelling must keep correct.
    let tag = pod_tag("dev", "router-0", "node-y", "3.3.3.3");
    assert!(tag.contains("node-y"));
    assert!(!tag.contains("node-x"));
}
