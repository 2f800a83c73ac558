// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for set-difference and the deletion safety guard.

use super::*;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn test_difference_finds_elements_only_in_a() {
    let a = strings(&["sfu-a", "sfu-b", "sfu-c"]);
    let b = strings(&["sfu-b"]);
    assert_eq!(difference(&a, &b), strings(&["sfu-a", "sfu-c"]));
}

#[test]
fn test_difference_of_equal_sets_is_empty() {
    let a = strings(&["sfu-a", "sfu-b"]);
    assert!(difference(&a, &a).is_empty());
}

#[test]
fn test_difference_with_empty_b_returns_a() {
    let a = strings(&["sfu-a"]);
    assert_eq!(difference(&a, &[]), a);
}

#[test]
fn test_difference_with_empty_a_is_empty() {
    let b = strings(&["sfu-a"]);
    assert!(difference(&[], &b).is_empty());
}

#[test]
fn test_short_key_takes_first_segment() {
    assert_eq!(short_key("sfu-abc.dev.example.com"), "sfu-abc");
    assert_eq!(short_key("sfu-abc"), "sfu-abc");
    assert_eq!(short_key(""), "");
}

#[test]
fn test_guard_passes_when_a_node_shares_the_prefix() {
    // "sfu-123-313" yields prefix "sfu-", which "sfu-123.gather.town" carries.
    assert!(record_prefix_matches_node_prefixes(
        "sfu-123.gather.town",
        &strings(&["sfu-123-313"])
    ));
    assert!(record_prefix_matches_node_prefixes(
        "sfu-123.gather.town",
        &strings(&["sfu-abc", "ip-1-2-3"])
    ));
}

#[test]
fn test_guard_blocks_foreign_prefixes() {
    assert!(!record_prefix_matches_node_prefixes(
        "sfu-123.gather.town",
        &strings(&["xyz-"])
    ));
}

#[test]
fn test_guard_blocks_everything_with_no_desired_nodes() {
    // An empty snapshot must never empty the zone.
    assert!(!record_prefix_matches_node_prefixes(
        "sfu-123.gather.town",
        &[]
    ));
}
