//! Canonical article URL reconstruction.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::config::CrawlerConfig;

lazy_static! {
    static ref ARTICLE_ID: Regex = Regex::new(r"article_id=(\d+)").expect("valid regex");
    static ref OFFICE_ID: Regex = Regex::new(r"office_id=(\d+)").expect("valid regex");
}

/// Publisher and article ids carried by a listing link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleIds {
    pub office_id: String,
    pub article_id: String,
}

pub fn extract_ids(link: &str) -> Option<ArticleIds> {
    let article_id = ARTICLE_ID.captures(link)?.get(1)?.as_str();
    let office_id = OFFICE_ID.captures(link)?.get(1)?.as_str();
    Some(ArticleIds {
        office_id: office_id.to_string(),
        article_id: article_id.to_string(),
    })
}

/// Canonical URL for a listing link; the deduplication key of the article.
///
/// Links carrying both ids map to `{article_base}/{office_id}/{article_id}`.
/// Anything else falls back to the site origin joined with the link as-is.
pub fn canonical_url(link: &str, config: &CrawlerConfig) -> String {
    if let Some(ids) = extract_ids(link) {
        return format!(
            "{}/{}/{}",
            config.article_base_url.trim_end_matches('/'),
            ids.office_id,
            ids.article_id
        );
    }

    warn!(%link, "Could not extract article_id or office_id, using link as-is");
    format!("{}{}", config.site_origin, link)
}
