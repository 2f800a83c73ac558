// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cloudflare DNS adapter (REST v4).
//!
//! Record names are reported fully qualified. The zone id is resolved by
//! name before each operation; listing paginates via `result_info`.
//!
//! The API's `content` filter cannot express contains semantics, so owner
//! filtering is done client-side on the fetched `TXT` set.

use crate::constants::DNS_RECORD_TTL_SECS;
use crate::errors::ProviderError;
use crate::providers::{effective_record_name, validate_deletion_match, DnsProvider, ZoneRecord};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Cloudflare API base URL
const API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// HTTP timeout for API requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records fetched per page when listing
const PER_PAGE: u32 = 100;

const PROVIDER_NAME: &str = "cloudflare";

#[derive(Debug, Deserialize)]
struct ZoneListResponse {
    result: Option<Vec<ZoneInfo>>,
}

#[derive(Debug, Deserialize)]
struct ZoneInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RecordListResponse {
    result: Option<Vec<RecordInfo>>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct RecordInfo {
    id: String,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    total_pages: u32,
}

/// Cloudflare DNS provider.
///
/// The `Debug` implementation intentionally does not expose the API token.
pub struct CloudflareDns {
    api_token: String,
    zone: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for CloudflareDns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareDns")
            .field("api_token", &"<REDACTED>")
            .field("zone", &self.zone)
            .finish()
    }
}

impl CloudflareDns {
    /// Create a Cloudflare adapter for the given zone.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    #[must_use]
    pub fn new(api_token: &str, zone: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_token: api_token.to_string(),
            zone: zone.to_string(),
            client,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER_NAME,
                source,
            })?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ProviderError::UnexpectedPayload {
                provider: PROVIDER_NAME,
                reason: e.to_string(),
            })
    }

    /// Resolve the zone id for the configured apex domain.
    async fn zone_id(&self) -> Result<String, ProviderError> {
        let url = format!("{API_BASE}/zones?name={}", self.zone);
        let zones: ZoneListResponse = self.get_json(&url).await?;

        zones
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|z| z.id)
            .ok_or_else(|| ProviderError::ZoneNotFound {
                zone: self.zone.clone(),
            })
    }

    /// List records matching the given query parameters, across all pages.
    async fn list_records(&self, query: &str) -> Result<Vec<ZoneRecord>, ProviderError> {
        let zone_id = self.zone_id().await?;
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{API_BASE}/zones/{zone_id}/dns_records?page={page}&per_page={PER_PAGE}{query}"
            );
            let body: RecordListResponse = self.get_json(&url).await?;

            records.extend(body.result.unwrap_or_default().into_iter().map(|r| {
                ZoneRecord {
                    id: r.id,
                    name: r.name,
                    record_type: r.record_type,
                    content: r.content,
                }
            }));

            let total_pages = body.result_info.map_or(1, |i| i.total_pages);
            if page >= total_pages {
                break;
            }
            page += 1;
        }

        debug!(zone = %self.zone, query, count = records.len(), "Fetched DNS records");
        Ok(records)
    }

    async fn create_record(
        &self,
        zone_id: &str,
        body: &serde_json::Value,
    ) -> Result<(), ProviderError> {
        let url = format!("{API_BASE}/zones/{zone_id}/dns_records");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER_NAME,
                source,
            })?;

        check_status(response).await.map(|_| ())
    }

    async fn delete_record(&self, zone_id: &str, record: &ZoneRecord) -> Result<(), ProviderError> {
        let url = format!("{API_BASE}/zones/{zone_id}/dns_records/{}", record.id);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER_NAME,
                source,
            })?;

        check_status(response).await?;
        info!(zone = %self.zone, record = %record.name, r#type = %record.record_type, "Deleted DNS record");
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for CloudflareDns {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn records_by_type_and_content(
        &self,
        record_type: &str,
        marker: &str,
    ) -> Result<Vec<ZoneRecord>, ProviderError> {
        let records = self.list_records(&format!("&type={record_type}")).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.content.contains(marker))
            .collect())
    }

    #[allow(clippy::cast_precision_loss)]
    async fn count_all_records(&self) -> Result<f64, ProviderError> {
        let records = self.list_records("").await?;
        Ok(records.len() as f64)
    }

    async fn create_record_pair(
        &self,
        name: &str,
        subdomain: &str,
        address_ipv4: &str,
        txt_content: &str,
        proxied: bool,
    ) -> Result<(), ProviderError> {
        let record_name = effective_record_name(name, subdomain);
        let zone_id = self.zone_id().await?;

        // TXT first: it is the ownership marker the next tick keys on.
        info!(zone = %self.zone, name = %record_name, r#type = "TXT", "Adding DNS record");
        self.create_record(
            &zone_id,
            &serde_json::json!({
                "type": "TXT",
                "name": record_name,
                "content": txt_content,
                "ttl": DNS_RECORD_TTL_SECS,
            }),
        )
        .await?;

        info!(zone = %self.zone, name = %record_name, r#type = "A", content = address_ipv4, proxied, "Adding DNS record");
        self.create_record(
            &zone_id,
            &serde_json::json!({
                "type": "A",
                "name": record_name,
                "content": address_ipv4,
                "ttl": DNS_RECORD_TTL_SECS,
                "proxied": proxied,
            }),
        )
        .await?;

        Ok(())
    }

    async fn delete_record_pair(&self, fqdn: &str) -> Result<(), ProviderError> {
        let zone_id = self.zone_id().await?;

        let mut records = self
            .list_records(&format!("&type=TXT&name={fqdn}"))
            .await?;
        records.extend(self.list_records(&format!("&type=A&name={fqdn}")).await?);

        // Cloudflare reports fully qualified names, so the match is exact.
        for record in &records {
            validate_deletion_match(record, fqdn)?;
        }

        for record in &records {
            self.delete_record(&zone_id, record).await?;
        }
        Ok(())
    }
}

/// Map a non-success HTTP status to a provider error, keeping the body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error response".to_string());
    Err(ProviderError::Api {
        provider: PROVIDER_NAME,
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "cloudflare_tests.rs"]
mod cloudflare_tests;
