use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use nf_core::storage::record_to_document;
use nf_core::{ArticleRecord, ArticleStore, Document, Error, Result, StoreKey};
use serde_json::Value;
use tokio::sync::RwLock;

/// Process-local store. Also serves as the fake store in tests.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    documents: Arc<RwLock<HashMap<String, Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a raw document under a key, bypassing record serialization.
    pub async fn insert_document(&self, key: &StoreKey, document: Document) {
        self.documents
            .write()
            .await
            .insert(key.as_str().to_string(), document);
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl ArticleStore for InMemoryStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<Document>> {
        Ok(self.documents.read().await.get(key.as_str()).cloned())
    }

    async fn set(&self, key: &StoreKey, record: &ArticleRecord) -> Result<()> {
        let document = record_to_document(record)?;
        self.documents
            .write()
            .await
            .insert(key.as_str().to_string(), document);
        Ok(())
    }

    async fn update_field(&self, key: &StoreKey, field: &str, value: Value) -> Result<()> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(key.as_str())
            .ok_or_else(|| Error::NotFound(key.to_string()))?;
        document.insert(field.to_string(), value);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Document>> {
        let documents = self.documents.read().await;
        let mut keys: Vec<&String> = documents.keys().collect();
        keys.sort();
        Ok(keys.into_iter().map(|k| documents[k].clone()).collect())
    }
}
