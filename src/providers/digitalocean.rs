// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DigitalOcean DNS adapter (REST v2).
//!
//! Record names are reported zone-relative (`sfu-a.dev`, apex `@`), so the
//! deletion guard compares against the fully-qualified request name with
//! the zone suffix stripped. The records API has no content filter at all;
//! owner filtering is client-side.

use crate::constants::DNS_RECORD_TTL_SECS;
use crate::errors::ProviderError;
use crate::providers::{effective_record_name, validate_deletion_match, DnsProvider, ZoneRecord};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// DigitalOcean API base URL
const API_BASE: &str = "https://api.digitalocean.com/v2";

/// HTTP timeout for API requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records fetched per page when listing (the API caps per_page at 200)
const PER_PAGE: u32 = 200;

const PROVIDER_NAME: &str = "digitalocean";

#[derive(Debug, Deserialize)]
struct RecordListResponse {
    domain_records: Option<Vec<RecordInfo>>,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct RecordInfo {
    id: u64,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct Links {
    pages: Option<Pages>,
}

#[derive(Debug, Deserialize)]
struct Pages {
    next: Option<String>,
}

/// DigitalOcean DNS provider.
///
/// The `Debug` implementation intentionally does not expose the API token.
pub struct DigitalOceanDns {
    api_token: String,
    zone: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for DigitalOceanDns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanDns")
            .field("api_token", &"<REDACTED>")
            .field("zone", &self.zone)
            .finish()
    }
}

impl DigitalOceanDns {
    /// Create a DigitalOcean adapter for the given zone.
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

    /// The zone-relative form of a fully-qualified record name.
    ///
    /// `sfu-a.dev.example.com` under zone `example.com` is `sfu-a.dev`;
    /// the apex itself is `@`.
    fn relative_name(&self, fqdn: &str) -> String {
        if fqdn == self.zone {
            return "@".to_string();
        }
        fqdn.strip_suffix(&format!(".{}", self.zone))
            .unwrap_or(fqdn)
            .to_string()
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

    /// List records matching the given query parameters, across all pages.
    async fn list_records(&self, query: &str) -> Result<Vec<ZoneRecord>, ProviderError> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{API_BASE}/domains/{}/records?page={page}&per_page={PER_PAGE}{query}",
                self.zone
            );
            let body: RecordListResponse = self.get_json(&url).await?;

            records.extend(body.domain_records.unwrap_or_default().into_iter().map(
                |r| ZoneRecord {
                    id: r.id.to_string(),
                    name: r.name,
                    record_type: r.record_type,
                    content: r.data,
                },
            ));

            let has_next = body
                .links
                .and_then(|l| l.pages)
                .is_some_and(|p| p.next.is_some());
            if !has_next {
                break;
            }
            page += 1;
        }

        debug!(zone = %self.zone, query, count = records.len(), "Fetched DNS records");
        Ok(records)
    }

    async fn create_record(
        &self,
        body: &serde_json::Value,
    ) -> Result<(), ProviderError> {
        let url = format!("{API_BASE}/domains/{}/records", self.zone);
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

    async fn delete_record(&self, record: &ZoneRecord) -> Result<(), ProviderError> {
        let url = format!("{API_BASE}/domains/{}/records/{}", self.zone, record.id);
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
impl DnsProvider for DigitalOceanDns {
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
        _proxied: bool,
    ) -> Result<(), ProviderError> {
        let record_name = effective_record_name(name, subdomain);

        info!(zone = %self.zone, name = %record_name, r#type = "A", content = address_ipv4, "Adding DNS record");
        self.create_record(&serde_json::json!({
            "type": "A",
            "name": record_name,
            "data": address_ipv4,
            "ttl": DNS_RECORD_TTL_SECS,
        }))
        .await?;

        info!(zone = %self.zone, name = %record_name, r#type = "TXT", "Adding DNS record");
        self.create_record(&serde_json::json!({
            "type": "TXT",
            "name": record_name,
            "data": txt_content,
            "ttl": DNS_RECORD_TTL_SECS,
        }))
        .await?;

        Ok(())
    }

    async fn delete_record_pair(&self, fqdn: &str) -> Result<(), ProviderError> {
        let mut records = self
            .list_records(&format!("&type=TXT&name={fqdn}"))
            .await?;
        records.extend(self.list_records(&format!("&type=A&name={fqdn}")).await?);

        // The API reports zone-relative names; match against the stripped form.
        let expected = self.relative_name(fqdn);
        for record in &records {
            validate_deletion_match(record, &expected)?;
        }

        for record in &records {
            self.delete_record(record).await?;
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
#[path = "digitalocean_tests.rs"]
mod digitalocean_tests;
