//! Crawl-extract-dedupe-persist pipeline for the finance news listing.
//!
//! Data flows page by page: the listing is fetched and decoded, parsed into
//! [`ListingItem`]s, and each item is resolved to a canonical URL, checked
//! against the store, fetched in full and persisted.

pub mod article;
pub mod canonical;
pub mod charset;
pub mod config;
pub mod dedupe;
pub mod fetcher;
pub mod listing;
pub mod persist;
pub mod pipeline;
pub mod sanitize;
pub mod search;

pub use config::{CrawlerConfig, DelayRange};
pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher};
pub use pipeline::{CrawlReport, CrawlStop, NewsCrawler};
pub use search::search_articles;

pub mod prelude {
    pub use super::{CrawlReport, CrawlStop, CrawlerConfig, HttpFetcher, NewsCrawler, PageFetcher};
    pub use nf_core::{ArticleRecord, ArticleStore, Error, ListingItem, Result};
}

#[cfg(test)]
pub(crate) mod test_support;
