//! Duplicate detection against the article store.

use nf_core::storage::document_to_record;
use nf_core::{ArticleStore, Result, StoreKey, DERIVED_SUMMARY_FIELD};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateStatus {
    /// Nothing stored under this URL yet.
    New,
    /// Stored and already summarized.
    Complete,
    /// Stored, but the derived summary is empty or was never written.
    MissingDerivedSummary,
    /// A document exists but could not be read as a record.
    Unreadable,
}

/// Look up the canonical URL. Store failures are returned as errors.
pub async fn check_duplicate(store: &dyn ArticleStore, url: &str) -> Result<DuplicateStatus> {
    let key = StoreKey::from_url(url);
    let Some(document) = store.get(&key).await? else {
        return Ok(DuplicateStatus::New);
    };

    match document_to_record(document) {
        Ok(existing) if existing.has_derived_summary() => Ok(DuplicateStatus::Complete),
        Ok(_) => Ok(DuplicateStatus::MissingDerivedSummary),
        Err(e) => {
            // Treated as existing: a skipped normalization beats a duplicate.
            warn!(%url, error = %e, "Failed to convert existing document to an article");
            Ok(DuplicateStatus::Unreadable)
        }
    }
}

/// Make sure the derived summary field exists, set to "".
pub async fn normalize_derived_summary(store: &dyn ArticleStore, url: &str) -> Result<()> {
    let key = StoreKey::from_url(url);
    store
        .update_field(&key, DERIVED_SUMMARY_FIELD, Value::String(String::new()))
        .await?;
    info!(%url, "Reset derived summary of existing article to empty");
    Ok(())
}
