use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use nf_core::storage::record_to_document;
use nf_core::{ArticleRecord, ArticleStore, Document, Error, Result, StoreKey};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS news_articles (
        id TEXT PRIMARY KEY,
        document TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

/// Documents stored as JSON text, one row per store key.
pub struct SqliteStore {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

impl SqliteStore {
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn parse_document(raw: &str) -> Result<Document> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Storage(format!("Stored document is not an object: {}", other))),
    }
}

#[async_trait]
impl ArticleStore for SqliteStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<Document>> {
        let row = sqlx::query("SELECT document FROM news_articles WHERE id = ?")
            .bind(key.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", key, e)))?;

        match row {
            Some(row) => {
                let raw: String = row.get("document");
                Ok(Some(parse_document(&raw)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &StoreKey, record: &ArticleRecord) -> Result<()> {
        let document = serde_json::to_string(&Value::Object(record_to_document(record)?))?;

        sqlx::query("INSERT OR REPLACE INTO news_articles (id, document) VALUES (?, ?)")
            .bind(key.as_str())
            .bind(document)
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to store {}: {}", key, e)))?;

        Ok(())
    }

    async fn update_field(&self, key: &StoreKey, field: &str, value: Value) -> Result<()> {
        let path = format!("$.\"{}\"", field.replace('"', ""));
        let result = sqlx::query(
            "UPDATE news_articles SET document = json_set(document, ?, json(?)) WHERE id = ?",
        )
        .bind(path)
        .bind(serde_json::to_string(&value)?)
        .bind(key.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to update {} on {}: {}", field, key, e)))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(key.to_string()));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Document>> {
        let rows = sqlx::query("SELECT document FROM news_articles ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to list documents: {}", e)))?;

        rows.iter()
            .map(|row| parse_document(&row.get::<String, _>("document")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nf_core::storage::document_to_record;
    use tempfile::tempdir;

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            title: "삼성전자 주가".to_string(),
            summary: "Teaser".to_string(),
            content: "Test content".to_string(),
            derived_summary: String::new(),
            source: "test".to_string(),
            url: url.to_string(),
            collected_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_sqlite_round_trip_and_update() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");
        let store = SqliteStore::open(&db_path).await.unwrap();
        assert_eq!(store.db_path(), db_path.as_path());

        let article = record("https://n.news.naver.com/mnews/article/008/42");
        let key = StoreKey::from_url(&article.url);
        assert!(store.get(&key).await.unwrap().is_none());

        store.set(&key, &article).await.unwrap();
        let stored = document_to_record(store.get(&key).await.unwrap().unwrap()).unwrap();
        assert_eq!(stored, article);

        store
            .update_field(&key, "aiSummary", Value::from("summary"))
            .await
            .unwrap();
        let stored = store.get(&key).await.unwrap().unwrap();
        assert_eq!(stored["aiSummary"], "summary");
        assert_eq!(stored["title"], "삼성전자 주가");

        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_update_missing_row() {
        let temp_dir = tempdir().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("test.db")).await.unwrap();
        let key = StoreKey::from_url("https://example.com/none");
        let result = store.update_field(&key, "aiSummary", Value::from("")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
