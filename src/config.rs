// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Service configuration from the environment.
//!
//! All recognized keys have defaults, so the controller starts in a
//! development shape with no environment at all. The configuration is
//! constructed once in `main` and threaded down explicitly; no module reads
//! the environment at use time.

use crate::errors::ConfigError;
use std::env;
use std::time::Duration;

const DEFAULT_ENV: &str = "development";
const DEFAULT_LABEL_KEY: &str = "doks.digitalocean.com/node-pool";
const DEFAULT_LABEL_VALUES: &str = "sfu";
const DEFAULT_PROVIDER: &str = "digitalocean";
const DEFAULT_SCAN_INTERVAL_SECONDS: &str = "60";
const DEFAULT_TOKEN: &str = "abcd123";
const DEFAULT_ZONE: &str = "k8s.gather.town";
// effective only when the provider supports a subdomain infix
const DEFAULT_SUBDOMAIN: &str = "";
// "debug" for debug level, everything else is INFO
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ALLOW_SYNC_PODS: &str = "false";
const DEFAULT_SYNC_POD_LABEL_KEY: &str = "casper-3.gather.town/sync";
const DEFAULT_SYNC_POD_LABEL_VALUE: &str = "true";
const DEFAULT_CLOUDFLARE_PROXIED_NODE_POOLS: &str = "";

/// Selected DNS back-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// DigitalOcean domain records API
    DigitalOcean,
    /// Cloudflare DNS records API
    Cloudflare,
}

impl ProviderKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "digitalocean" => Ok(Self::DigitalOcean),
            "cloudflare" => Ok(Self::Cloudflare),
            other => Err(ConfigError::UnknownProvider {
                value: other.to_string(),
            }),
        }
    }

    /// Provider label used in logs and the records-total gauge.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DigitalOcean => "digitalocean",
            Self::Cloudflare => "cloudflare",
        }
    }
}

/// Service configuration, read-only for the lifetime of the controller.
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment name substituted into the owner tag
    pub env: String,
    /// Node label key for pool membership
    pub label_key: String,
    /// Accepted node pool label values
    pub label_values: Vec<String>,
    /// Selected DNS back-end
    pub provider: ProviderKind,
    /// Seconds between reconciliation ticks
    pub scan_interval: Duration,
    /// Bearer credential for the provider API
    pub token: String,
    /// Apex domain under reconciliation
    pub zone: String,
    /// Optional infix between the short record name and the zone
    pub subdomain: String,
    /// `debug` enables verbose logs; any other value means info
    pub log_level: String,
    /// Gates the pod reconciler
    pub allow_sync_pods: bool,
    /// Pod opt-in label key
    pub sync_pod_label_key: String,
    /// Pod opt-in label value
    pub sync_pod_label_value: String,
    /// Node-name prefixes whose `A` records are created proxied (Cloudflare)
    pub cloudflare_proxied_node_pools: Vec<String>,
}

impl Config {
    /// Build the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when `INTERVAL` cannot be parsed as seconds or
    /// `PROVIDER` names an unknown back-end. Both are fatal at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map so they
    /// never mutate process environment.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, fallback: &str| -> String {
            match lookup(key) {
                Some(v) if !v.is_empty() => v,
                _ => fallback.to_string(),
            }
        };

        let interval_raw = get("INTERVAL", DEFAULT_SCAN_INTERVAL_SECONDS);
        let interval_secs: u64 =
            interval_raw
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidInterval {
                    value: interval_raw.clone(),
                    reason: e.to_string(),
                })?;

        let provider = ProviderKind::parse(&get("PROVIDER", DEFAULT_PROVIDER))?;

        Ok(Self {
            env: get("ENV", DEFAULT_ENV),
            label_key: get("LABEL_KEY", DEFAULT_LABEL_KEY),
            label_values: split_comma_list(&get("LABEL_VALUES", DEFAULT_LABEL_VALUES)),
            provider,
            scan_interval: Duration::from_secs(interval_secs),
            token: get("TOKEN", DEFAULT_TOKEN),
            zone: get("ZONE", DEFAULT_ZONE),
            subdomain: get("SUBDOMAIN", DEFAULT_SUBDOMAIN),
            log_level: get("LOGLEVEL", DEFAULT_LOG_LEVEL),
            allow_sync_pods: get("ALLOW_SYNC_PODS", DEFAULT_ALLOW_SYNC_PODS)
                .parse()
                .unwrap_or(false),
            sync_pod_label_key: get("SYNC_POD_LABEL_KEY", DEFAULT_SYNC_POD_LABEL_KEY),
            sync_pod_label_value: get("SYNC_POD_LABEL_VALUE", DEFAULT_SYNC_POD_LABEL_VALUE),
            cloudflare_proxied_node_pools: split_comma_list(&get(
                "CLOUDFLARE_PROXIED_NODE_POOLS",
                DEFAULT_CLOUDFLARE_PROXIED_NODE_POOLS,
            )),
        })
    }

    /// Kubernetes label selector for pool nodes: `<key> in (<v1>,<v2>,...)`.
    #[must_use]
    pub fn node_label_selector(&self) -> String {
        format!("{} in ({})", self.label_key, self.label_values.join(","))
    }

    /// Kubernetes label selector for opted-in pods: `<key>=<value>`.
    #[must_use]
    pub fn pod_label_selector(&self) -> String {
        format!("{}={}", self.sync_pod_label_key, self.sync_pod_label_value)
    }
}

/// Split a comma-separated list, trimming whitespace and dropping empties.
fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
