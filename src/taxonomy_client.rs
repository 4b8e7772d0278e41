//! iNaturalist taxa API client
//!
//! Wraps the two endpoints the bot needs (`GET /taxa` and `GET /taxa/{id}`)
//! and decodes their payloads into [`TaxonRecord`]s. Payloads that do not
//! match the expected shape are rejected here instead of leaking partially
//! filled records into formatting.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::TaxonomyConfig;
use crate::taxonomy_errors::TaxonomyError;

/// Raw taxon record as returned by the upstream API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonRecord {
    pub id: u64,
    pub name: Option<String>,
    pub rank: Option<String>,
    pub preferred_common_name: Option<String>,
    /// Medium-size URL of the taxon's default photo
    pub photo_url: Option<String>,
    pub wikipedia_summary: Option<String>,
    pub wikipedia_url: Option<String>,
}

/// Operations the inline search needs from a taxonomy backend
#[async_trait]
pub trait TaxonomyApi: Send + Sync {
    /// Search taxa by name. `page` is zero-based.
    async fn search_by_name(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<TaxonRecord>, TaxonomyError>;

    /// Fetch one taxon. `Ok(None)` means the identifier is unknown upstream.
    async fn lookup_by_id(&self, id: u64) -> Result<Option<TaxonRecord>, TaxonomyError>;
}

#[derive(Debug, Deserialize)]
struct TaxaResponse {
    results: Vec<WireTaxon>,
}

#[derive(Debug, Deserialize)]
struct WireTaxon {
    id: u64,
    name: Option<String>,
    rank: Option<String>,
    preferred_common_name: Option<String>,
    default_photo: Option<WirePhoto>,
    wikipedia_summary: Option<String>,
    wikipedia_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WirePhoto {
    medium_url: Option<String>,
    square_url: Option<String>,
    url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<WireTaxon> for TaxonRecord {
    fn from(wire: WireTaxon) -> Self {
        let photo_url = wire.default_photo.and_then(|photo| {
            non_blank(photo.medium_url)
                .or_else(|| non_blank(photo.square_url))
                .or_else(|| non_blank(photo.url))
        });

        Self {
            id: wire.id,
            name: non_blank(wire.name),
            rank: non_blank(wire.rank),
            preferred_common_name: non_blank(wire.preferred_common_name),
            photo_url,
            wikipedia_summary: non_blank(wire.wikipedia_summary),
            wikipedia_url: non_blank(wire.wikipedia_url),
        }
    }
}

/// Decode a `{"results": [...]}` taxa payload
pub fn parse_taxa_response(body: &str) -> Result<Vec<TaxonRecord>, TaxonomyError> {
    let response: TaxaResponse = serde_json::from_str(body)?;
    Ok(response.results.into_iter().map(TaxonRecord::from).collect())
}

/// HTTP client for the iNaturalist taxa API
pub struct INaturalistClient {
    client: Client,
    base_url: String,
}

impl INaturalistClient {
    pub fn new(config: &TaxonomyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_body(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<(StatusCode, String), TaxonomyError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .inspect_err(|e| error!(url = %url, error = %e, "Taxonomy request failed"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .inspect_err(|e| error!(url = %url, error = %e, "Failed to read taxonomy response"))?;
        Ok((status, body))
    }
}

#[async_trait]
impl TaxonomyApi for INaturalistClient {
    async fn search_by_name(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<TaxonRecord>, TaxonomyError> {
        let url = format!("{}/taxa", self.base_url);
        // Upstream pages are 1-based
        let params = [
            ("q", query.to_string()),
            ("page", page.saturating_add(1).to_string()),
            ("per_page", page_size.to_string()),
        ];

        let (status, body) = self.get_body(&url, &params).await?;
        if !status.is_success() {
            error!(status = %status, query = %query, page, "Taxonomy search failed");
            return Err(TaxonomyError::UpstreamUnavailable(format!(
                "search returned HTTP {status}"
            )));
        }

        let records = parse_taxa_response(&body)?;
        debug!(query = %query, page, count = records.len(), "Taxonomy search completed");
        Ok(records)
    }

    async fn lookup_by_id(&self, id: u64) -> Result<Option<TaxonRecord>, TaxonomyError> {
        let url = format!("{}/taxa/{}", self.base_url, id);

        let (status, body) = self.get_body(&url, &[]).await?;
        if status == StatusCode::NOT_FOUND {
            debug!(taxon_id = id, "Taxon not found upstream");
            return Ok(None);
        }
        if !status.is_success() {
            error!(status = %status, taxon_id = id, "Taxonomy lookup failed");
            return Err(TaxonomyError::UpstreamUnavailable(format!(
                "lookup returned HTTP {status}"
            )));
        }

        Ok(parse_taxa_response(&body)?
            .into_iter()
            .find(|record| record.id == id))
    }
}
