use nf_core::storage::document_to_record;
use nf_core::{ArticleRecord, ArticleStore, Result};
use tracing::{debug, warn};

/// Case-insensitive substring search over title, summary and content.
///
/// An empty keyword matches every readable article. Documents that do not
/// convert to a record are skipped.
pub async fn search_articles(store: &dyn ArticleStore, keyword: &str) -> Result<Vec<ArticleRecord>> {
    let needle = keyword.to_lowercase();
    let mut matches = Vec::new();

    for document in store.list().await? {
        let record = match document_to_record(document) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable document during search");
                continue;
            }
        };

        let hit = [&record.title, &record.summary, &record.content]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if hit {
            matches.push(record);
        }
    }

    debug!(keyword, hits = matches.len(), "Article search finished");
    Ok(matches)
}
