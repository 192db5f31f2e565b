use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Stored field name of the derived (AI) summary.
pub const DERIVED_SUMMARY_FIELD: &str = "aiSummary";

/// One teaser row scraped from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub title: String,
    pub summary: String,
    pub source: String,
    /// Link as found in the listing, relative or absolute.
    pub link: String,
}

impl ListingItem {
    /// Names of the required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push("title");
        }
        if self.summary.is_empty() {
            missing.push("summary");
        }
        if self.source.is_empty() {
            missing.push("source");
        }
        if self.link.is_empty() {
            missing.push("link");
        }
        missing
    }
}

/// A persisted article, keyed by its canonical URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    /// Teaser text from the listing page.
    pub summary: String,
    /// Full body, or the teaser when the body could not be extracted.
    pub content: String,
    /// Filled in by the summarization service; the crawler only ever writes "".
    #[serde(rename = "aiSummary", default, deserialize_with = "null_as_empty")]
    pub derived_summary: String,
    pub source: String,
    pub url: String,
    pub collected_at: DateTime<Utc>,
}

/// Writers that never set the field may have stored `null`.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ArticleRecord {
    pub fn new(item: &ListingItem, url: String, content: String) -> Self {
        Self {
            title: item.title.clone(),
            summary: item.summary.clone(),
            content,
            derived_summary: String::new(),
            source: item.source.clone(),
            url,
            collected_at: Utc::now(),
        }
    }

    pub fn has_derived_summary(&self) -> bool {
        !self.derived_summary.is_empty()
    }
}
