//! Result formatting
//!
//! Pure mapping from raw [`TaxonRecord`]s to the display-ready summary used in
//! inline result lists and the detail view shown after a selection.

use serde::{Deserialize, Serialize};

use crate::taxonomy_client::TaxonRecord;

/// One entry of an inline result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonSummary {
    pub id: u64,
    pub display_name: String,
    pub rank: Option<String>,
    pub common_name: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Everything shown once a user picks a taxon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonDetail {
    pub id: u64,
    pub display_name: String,
    pub rank: Option<String>,
    pub common_name: Option<String>,
    pub summary_text: Option<String>,
    pub photo_url: Option<String>,
    pub reference_url: Option<String>,
}

/// Upper-case the first letter of every word, lower-case the rest.
///
/// Runs of whitespace collapse to a single space.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_name(record: &TaxonRecord) -> Option<String> {
    record
        .name
        .as_deref()
        .map(title_case)
        .filter(|name| !name.is_empty())
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Summary for an inline result. `None` when the record has no usable name.
pub fn to_summary(record: &TaxonRecord) -> Option<TaxonSummary> {
    Some(TaxonSummary {
        id: record.id,
        display_name: display_name(record)?,
        rank: record.rank.as_deref().map(title_case).filter(|r| !r.is_empty()),
        common_name: present(&record.preferred_common_name),
        thumbnail_url: present(&record.photo_url),
    })
}

/// Detail view for a selected taxon. `None` when the record has no usable name.
pub fn to_detail(record: &TaxonRecord) -> Option<TaxonDetail> {
    Some(TaxonDetail {
        id: record.id,
        display_name: display_name(record)?,
        rank: record.rank.as_deref().map(title_case).filter(|r| !r.is_empty()),
        common_name: present(&record.preferred_common_name),
        summary_text: present(&record.wikipedia_summary),
        photo_url: present(&record.photo_url),
        reference_url: present(&record.wikipedia_url),
    })
}
