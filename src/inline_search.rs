//! # Inline Search Module
//!
//! Page-indexed taxon search for inline queries and the detail lookup used
//! when a result is selected. Nothing is kept between calls: the caller
//! supplies the page index every time, so the same `(query, page)` pair can
//! be fetched again at any point.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::clamp_page_size;
use crate::formatter::{to_detail, to_summary, TaxonDetail, TaxonSummary};
use crate::taxonomy_client::TaxonomyApi;
use crate::taxonomy_errors::TaxonomyError;

/// One page of inline results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Non-empty list of summaries, in upstream order
    Results(Vec<TaxonSummary>),
    /// Nothing more to show; the host should stop asking for pages
    EndOfResults,
}

impl Page {
    pub fn is_end(&self) -> bool {
        matches!(self, Page::EndOfResults)
    }

    pub fn into_results(self) -> Vec<TaxonSummary> {
        match self {
            Page::Results(results) => results,
            Page::EndOfResults => Vec::new(),
        }
    }
}

/// Outcome of a detail lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    Found(TaxonDetail),
    NotFound,
}

/// Paginated search and detail lookup over a taxonomy backend
pub struct InlineSearch {
    api: Arc<dyn TaxonomyApi>,
    page_size: u32,
}

impl InlineSearch {
    pub fn new(api: Arc<dyn TaxonomyApi>, page_size: u32) -> Self {
        Self {
            api,
            page_size: clamp_page_size(page_size),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch page `page_index` (zero-based) of the results for `query`.
    ///
    /// Blank queries end the result list without touching the upstream API.
    /// Upstream failures are returned as errors and never as an empty page.
    pub async fn fetch_page(&self, query: &str, page_index: u32) -> Result<Page, TaxonomyError> {
        let query = query.trim();
        if query.is_empty() {
            debug!(page_index, "Blank inline query, skipping upstream search");
            return Ok(Page::EndOfResults);
        }

        let records = self
            .api
            .search_by_name(query, page_index, self.page_size)
            .await?;
        let raw_count = records.len();

        let summaries: Vec<TaxonSummary> = records.iter().filter_map(to_summary).collect();
        if summaries.len() < raw_count {
            warn!(
                query = %query,
                page_index,
                dropped = raw_count - summaries.len(),
                "Dropped taxon records without a name"
            );
        }

        if summaries.is_empty() {
            debug!(query = %query, page_index, "Inline search exhausted");
            Ok(Page::EndOfResults)
        } else {
            Ok(Page::Results(summaries))
        }
    }

    /// Look up the detail view of one taxon
    pub async fn fetch_detail(&self, id: u64) -> Result<Detail, TaxonomyError> {
        match self.api.lookup_by_id(id).await? {
            Some(record) => match to_detail(&record) {
                Some(detail) => Ok(Detail::Found(detail)),
                None => {
                    warn!(taxon_id = id, "Taxon record has no name");
                    Ok(Detail::NotFound)
                }
            },
            None => Ok(Detail::NotFound),
        }
    }
}
