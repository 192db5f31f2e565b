use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::key::StoreKey;
use crate::types::ArticleRecord;
use crate::Result;

/// A raw stored document, before conversion into an [`ArticleRecord`].
pub type Document = Map<String, Value>;

/// Document store holding the article collection.
///
/// Each call is one logical operation; nothing spans multiple calls.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Fetch a document, `None` when the key does not exist
    async fn get(&self, key: &StoreKey) -> Result<Option<Document>>;

    /// Write a record, replacing whatever was stored under the key
    async fn set(&self, key: &StoreKey, record: &ArticleRecord) -> Result<()>;

    /// Overwrite a single field of an existing document.
    ///
    /// Fails with [`crate::Error::NotFound`] when the document does not exist.
    async fn update_field(&self, key: &StoreKey, field: &str, value: Value) -> Result<()>;

    /// All documents in the collection
    async fn list(&self) -> Result<Vec<Document>>;
}

/// Convert a stored document into a record.
pub fn document_to_record(document: Document) -> Result<ArticleRecord> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Convert a record into its stored document form.
pub fn record_to_document(record: &ArticleRecord) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(crate::Error::Storage(format!(
            "record serialized to a non-object value: {other}"
        ))),
    }
}
