//! Full article body retrieval.

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::CrawlerConfig;
use crate::fetcher::PageFetcher;
use crate::listing::text_without;

lazy_static! {
    static ref BODY: Selector = Selector::parse("article#dic_area").expect("valid selector");
    static ref BODY_NOISE: Selector = Selector::parse(
        "script, iframe, a, strong, em, br, .end_photo_org, .link_text, .byline, .reporter_area, .nbd_im_w, .img_desc",
    )
    .expect("valid selector");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyOrigin {
    Extracted,
    /// The listing teaser, used when no body could be extracted.
    Teaser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBody {
    pub content: String,
    pub origin: BodyOrigin,
    /// Requests issued, including the successful one.
    pub attempts: u32,
}

impl ArticleBody {
    fn teaser(teaser: &str, attempts: u32) -> Self {
        Self {
            content: teaser.to_string(),
            origin: BodyOrigin::Teaser,
            attempts,
        }
    }
}

/// Text of the article body container, stripped of embeds, links and bylines.
///
/// `None` when the container is missing or holds no text.
pub fn extract_body(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let container = document.select(&BODY).next()?;
    let text = text_without(container, &BODY_NOISE).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Fetch the article at `url`, falling back to `teaser` on any failure.
///
/// Only transient network errors are retried, waiting `retry_backoff × attempt`
/// between tries. Error statuses and pages without a body end the attempts at once.
pub async fn fetch_article_body(
    fetcher: &dyn PageFetcher,
    url: &str,
    teaser: &str,
    config: &CrawlerConfig,
) -> ArticleBody {
    let max_attempts = config.max_article_attempts.max(1);

    for attempt in 1..=max_attempts {
        match fetcher.get(url, config.article_timeout).await {
            Ok(page) => {
                return match extract_body(&page.text()) {
                    Some(content) => {
                        debug!(%url, attempt, chars = content.chars().count(), "Extracted article body");
                        ArticleBody {
                            content,
                            origin: BodyOrigin::Extracted,
                            attempts: attempt,
                        }
                    }
                    None => {
                        warn!(%url, "Could not find article body (article#dic_area), using teaser");
                        ArticleBody::teaser(teaser, attempt)
                    }
                };
            }
            Err(e) if e.is_transient() => {
                warn!(%url, attempt, max_attempts, error = %e, "Error loading article content");
                if attempt < max_attempts {
                    tokio::time::sleep(config.retry_backoff * attempt).await;
                }
            }
            Err(e) => {
                warn!(%url, error = %e, "Article request failed, not retrying");
                return ArticleBody::teaser(teaser, attempt);
            }
        }
    }

    warn!(%url, max_attempts, "Giving up on article content, using teaser");
    ArticleBody::teaser(teaser, max_attempts)
}
