// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for casper3.
//!
//! This module provides specialized error types for:
//! - DNS provider API operations (Cloudflare, DigitalOcean)
//! - Configuration parsing at startup
//!
//! Provider errors are per-entry: the reconcilers log them, increment the
//! execution-error counter, and continue with the next entry. Only listing
//! failures abort a reconciler for the current tick. Configuration errors
//! are fatal before the controller loop starts.

use thiserror::Error;

/// Errors that can occur when talking to a DNS provider API.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider returned a non-success HTTP status.
    #[error("{provider} API error (HTTP {status}): {message}")]
    Api {
        /// Provider name (`cloudflare`, `digitalocean`)
        provider: &'static str,
        /// HTTP status code returned by the API
        status: u16,
        /// Response body or error description
        message: String,
    },

    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("request to {provider} failed: {source}")]
    Transport {
        /// Provider name
        provider: &'static str,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// The provider responded with a body this client cannot interpret.
    #[error("unexpected {provider} response: {reason}")]
    UnexpectedPayload {
        /// Provider name
        provider: &'static str,
        /// What was malformed or missing
        reason: String,
    },

    /// The zone under reconciliation does not exist at the provider.
    #[error("zone '{zone}' not found")]
    ZoneNotFound {
        /// The apex domain that was looked up
        zone: String,
    },

    /// A deletion listing returned a record that does not match the request.
    ///
    /// Deleting is two-phase (list by name, delete by id); if the provider
    /// hands back a record whose name or type differs from what was asked
    /// for, the whole pair deletion is aborted rather than risk deleting a
    /// foreign record.
    #[error(
        "refusing to delete record '{name}' (type {record_type}): does not match requested '{requested}'"
    )]
    RecordMismatch {
        /// Name of the record the provider returned
        name: String,
        /// Type of the record the provider returned
        record_type: String,
        /// The fully-qualified name deletion was requested for
        requested: String,
    },
}

/// Errors raised while building the service configuration from the
/// environment. All of these are fatal: the controller loop never starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `INTERVAL` is not a parseable number of seconds.
    #[error("invalid INTERVAL '{value}': {reason}")]
    InvalidInterval {
        /// The raw environment value
        value: String,
        /// Parse failure description
        reason: String,
    },

    /// `PROVIDER` names a back-end this build does not know about.
    #[error("unknown PROVIDER '{value}' (expected 'digitalocean' or 'cloudflare')")]
    UnknownProvider {
        /// The raw environment value
        value: String,
    },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
