//! # Taxonomy Error Types Module
//!
//! Errors raised while talking to the upstream taxonomy API. A lookup that
//! finds nothing is not an error and never shows up here.

/// Hard failures of a taxonomy API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    /// Transport failure, timeout or unexpected HTTP status
    UpstreamUnavailable(String),
    /// Response body could not be decoded into the expected shape
    UpstreamInvalidResponse(String),
}

impl std::fmt::Display for TaxonomyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxonomyError::UpstreamUnavailable(msg) => write!(f, "Upstream unavailable: {msg}"),
            TaxonomyError::UpstreamInvalidResponse(msg) => {
                write!(f, "Upstream invalid response: {msg}")
            }
        }
    }
}

impl std::error::Error for TaxonomyError {}

impl From<reqwest::Error> for TaxonomyError {
    fn from(err: reqwest::Error) -> Self {
        TaxonomyError::UpstreamUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for TaxonomyError {
    fn from(err: serde_json::Error) -> Self {
        TaxonomyError::UpstreamInvalidResponse(err.to_string())
    }
}
