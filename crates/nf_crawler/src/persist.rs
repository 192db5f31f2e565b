use nf_core::{ArticleRecord, ArticleStore, Result, StoreKey};
use tracing::{error, info};

use crate::sanitize::{preview, PREVIEW_CHARS};

/// Write a finished record under its store key, replacing anything there.
///
/// Concurrent crawls may both reach this point for the same URL; the last
/// write wins.
pub async fn persist(store: &dyn ArticleStore, record: &ArticleRecord) -> Result<()> {
    let key = StoreKey::from_url(&record.url);

    if let Err(e) = store.set(&key, record).await {
        error!(
            title = %record.title,
            summary = %record.summary,
            source = %record.source,
            content_preview = %preview(&record.content, PREVIEW_CHARS),
            error = %e,
            "Failed to save article"
        );
        return Err(e);
    }

    info!(title = %record.title, "💾 Article saved");
    Ok(())
}
