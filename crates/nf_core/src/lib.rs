pub mod error;
pub mod key;
pub mod storage;
pub mod types;

pub use error::Error;
pub use key::StoreKey;
pub use storage::{ArticleStore, Document};
pub use types::{ArticleRecord, ListingItem, DERIVED_SUMMARY_FIELD};

pub type Result<T> = std::result::Result<T, Error>;
