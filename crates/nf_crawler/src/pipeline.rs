//! Page-by-page, item-by-item crawl orchestration.
//!
//! Requests to the site are strictly serial within one crawl, with a random
//! pause after each fetched item and between pages.

use std::sync::Arc;

use nf_core::{ArticleRecord, ArticleStore, Error, ListingItem, Result};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::article::{fetch_article_body, BodyOrigin};
use crate::canonical::canonical_url;
use crate::config::CrawlerConfig;
use crate::dedupe::{check_duplicate, normalize_derived_summary, DuplicateStatus};
use crate::fetcher::PageFetcher;
use crate::listing::parse_listing;
use crate::persist::persist;

/// Why a crawl ended before its last page.
#[derive(Debug)]
pub enum CrawlStop {
    /// The listing page had no items; the layout probably changed.
    EmptyListing { page: u32 },
    /// The listing page could not be fetched.
    PageFailed { page: u32, error: Error },
    Cancelled { page: u32 },
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Records written during this crawl, in crawl order.
    pub articles: Vec<ArticleRecord>,
    pub pages_crawled: u32,
    pub duplicates: usize,
    pub failed_items: usize,
    pub stop: Option<CrawlStop>,
}

impl CrawlReport {
    /// The error that ended the crawl, if a listing page failed.
    pub fn error(&self) -> Option<&Error> {
        match &self.stop {
            Some(CrawlStop::PageFailed { error, .. }) => Some(error),
            _ => None,
        }
    }
}

/// What happened to a single listing item.
#[derive(Debug)]
pub enum ItemOutcome {
    Saved(ArticleRecord),
    Skipped(DuplicateStatus),
}

/// Shared read-only state for processing one item.
pub struct ItemContext<'a> {
    pub config: &'a CrawlerConfig,
    pub fetcher: &'a dyn PageFetcher,
    pub store: &'a dyn ArticleStore,
}

/// Resolve, deduplicate, fetch and persist a single listing item.
pub async fn process_item(ctx: &ItemContext<'_>, item: &ListingItem) -> Result<ItemOutcome> {
    let url = canonical_url(&item.link, ctx.config);

    let status = check_duplicate(ctx.store, &url).await?;
    match status {
        DuplicateStatus::New => {}
        DuplicateStatus::MissingDerivedSummary => {
            if let Err(e) = normalize_derived_summary(ctx.store, &url).await {
                warn!(%url, error = %e, "Failed to reset derived summary of existing article");
            }
            info!(%url, "Article already exists, skipping");
            return Ok(ItemOutcome::Skipped(status));
        }
        DuplicateStatus::Complete | DuplicateStatus::Unreadable => {
            info!(%url, ?status, "Article already exists, skipping");
            return Ok(ItemOutcome::Skipped(status));
        }
    }

    let body = fetch_article_body(ctx.fetcher, &url, &item.summary, ctx.config).await;
    if body.origin == BodyOrigin::Teaser {
        info!(%url, attempts = body.attempts, "Storing teaser as content");
    }

    let record = ArticleRecord::new(item, url, body.content);
    persist(ctx.store, &record).await?;
    Ok(ItemOutcome::Saved(record))
}

/// Crawls the listing and stores new articles.
pub struct NewsCrawler {
    config: CrawlerConfig,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn ArticleStore>,
}

impl NewsCrawler {
    pub fn new(config: CrawlerConfig, fetcher: Arc<dyn PageFetcher>, store: Arc<dyn ArticleStore>) -> Self {
        Self {
            config,
            fetcher,
            store,
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawl listing pages `1..=pages`.
    ///
    /// Callers keep `pages` within 1–10; it is not checked here.
    pub async fn crawl(&self, pages: u32) -> CrawlReport {
        self.run(pages, None).await
    }

    /// Like [`crawl`](Self::crawl), stopping between items once `cancel` reads `true`.
    pub async fn crawl_with_cancel(&self, pages: u32, cancel: watch::Receiver<bool>) -> CrawlReport {
        self.run(pages, Some(cancel)).await
    }

    #[instrument(skip(self, cancel))]
    async fn run(&self, pages: u32, cancel: Option<watch::Receiver<bool>>) -> CrawlReport {
        let cancelled = || cancel.as_ref().map_or(false, |rx| *rx.borrow());
        let ctx = ItemContext {
            config: &self.config,
            fetcher: self.fetcher.as_ref(),
            store: self.store.as_ref(),
        };
        let mut report = CrawlReport::default();

        info!("🦗 Starting news collection for {} pages", pages);

        'pages: for page in 1..=pages {
            if cancelled() {
                report.stop = Some(CrawlStop::Cancelled { page });
                break;
            }

            let items = match self.fetch_listing(page).await {
                Ok(items) => items,
                Err(Error::Structure(reason)) => {
                    warn!(page, %reason, "No news items found, stopping crawl");
                    report.stop = Some(CrawlStop::EmptyListing { page });
                    break;
                }
                Err(e) => {
                    error!(page, error = %e, "Failed to fetch listing page, stopping crawl");
                    report.stop = Some(CrawlStop::PageFailed { page, error: e });
                    break;
                }
            };
            report.pages_crawled = page;

            for item in &items {
                if cancelled() {
                    report.stop = Some(CrawlStop::Cancelled { page });
                    break 'pages;
                }

                match process_item(&ctx, item).await {
                    Ok(ItemOutcome::Saved(record)) => {
                        report.articles.push(record);
                        tokio::time::sleep(self.config.item_delay.sample()).await;
                    }
                    Ok(ItemOutcome::Skipped(_)) => report.duplicates += 1,
                    Err(e) => {
                        error!(title = %item.title, error = %e, "Failed to process news item");
                        report.failed_items += 1;
                        tokio::time::sleep(self.config.item_delay.sample()).await;
                    }
                }
            }

            info!(
                page,
                collected = report.articles.len(),
                "✨ Page {} collection complete",
                page
            );

            if page < pages {
                tokio::time::sleep(self.config.page_delay.sample()).await;
            }
        }

        info!(
            collected = report.articles.len(),
            duplicates = report.duplicates,
            failed = report.failed_items,
            "✅ News collection complete"
        );
        report
    }

    async fn fetch_listing(&self, page: u32) -> Result<Vec<ListingItem>> {
        let url = self.config.listing_page_url(page);
        let fetched = self.fetcher.get(&url, self.config.page_timeout).await?;
        parse_listing(&fetched.text())
    }
}
