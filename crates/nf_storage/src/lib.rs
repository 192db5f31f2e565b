use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use nf_core::{ArticleStore, Error, Result};
use tracing::info;

pub mod backends;

pub use backends::*;

/// Which backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(Error::Config(format!(
                "Unknown storage backend: {other} (expected memory or sqlite)"
            ))),
        }
    }
}

/// Open the requested backend. `path` is only used by file-backed stores.
pub async fn create_storage(kind: StorageKind, path: &Path) -> Result<Arc<dyn ArticleStore>> {
    match kind {
        StorageKind::Memory => {
            info!("🏦 Using in-memory article store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => {
            let store = SqliteStore::open(path).await?;
            info!(path = %path.display(), "🏦 Using SQLite article store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageKind::Sqlite => Err(Error::Config(format!(
            "SQLite storage requested for {} but the sqlite feature is disabled",
            path.display()
        ))),
    }
}
