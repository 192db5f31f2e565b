use std::time::Duration;

use rand::Rng;

pub const DEFAULT_LISTING_URL: &str = "https://finance.naver.com/news/mainnews.naver";
pub const DEFAULT_ARTICLE_BASE_URL: &str = "https://n.news.naver.com/mnews/article";
pub const DEFAULT_SITE_ORIGIN: &str = "https://finance.naver.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Inclusive lower, exclusive upper bound for a randomized pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub const fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..self.max)
    }
}

#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Listing page; `?page=N` is appended per page.
    pub listing_url: String,
    /// Prefix of canonical article URLs.
    pub article_base_url: String,
    /// Origin prepended to relative listing links that carry no article ids.
    pub site_origin: String,
    pub user_agent: String,
    pub page_timeout: Duration,
    pub article_timeout: Duration,
    pub max_article_attempts: u32,
    /// Backoff unit; attempt `n` waits `n` units before retrying.
    pub retry_backoff: Duration,
    pub item_delay: DelayRange,
    pub page_delay: DelayRange,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            article_base_url: DEFAULT_ARTICLE_BASE_URL.to_string(),
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_timeout: Duration::from_secs(10),
            article_timeout: Duration::from_secs(20),
            max_article_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            item_delay: DelayRange::new(Duration::from_millis(200), Duration::from_millis(700)),
            page_delay: DelayRange::new(Duration::from_secs(2), Duration::from_secs(5)),
        }
    }
}

impl CrawlerConfig {
    pub fn listing_page_url(&self, page: u32) -> String {
        format!("{}?page={}", self.listing_url, page)
    }

    /// Same crawl behavior without any waiting. Intended for tests.
    pub fn without_delays(mut self) -> Self {
        self.retry_backoff = Duration::ZERO;
        self.item_delay = DelayRange::none();
        self.page_delay = DelayRange::none();
        self
    }
}
