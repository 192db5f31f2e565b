use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{AppState, MAX_PAGES, MIN_PAGES};

#[derive(Debug, Deserialize)]
pub struct CrawlParams {
    pub pages: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

/// Page count from the query string. Missing or unparsable values mean one page.
fn requested_pages(raw: Option<&str>) -> i64 {
    match raw {
        None => 1,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(pages = raw, "Invalid 'pages' parameter, using default of 1");
            1
        }),
    }
}

pub async fn trigger_crawl(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CrawlParams>,
) -> Response {
    info!("HTTP request received to start news crawling");

    let pages = requested_pages(params.pages.as_deref());
    if pages < MIN_PAGES as i64 || pages > MAX_PAGES as i64 {
        warn!(pages, "Requested page count out of range");
        return (
            StatusCode::BAD_REQUEST,
            "Invalid number of pages requested. Please specify within 1-10 pages.",
        )
            .into_response();
    }
    let pages = pages as u32;

    let report = state.crawler.crawl(pages).await;
    if let Some(e) = report.error() {
        error!(error = %e, "Error during news crawling operation");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error during news crawling operation: {}", e),
        )
            .into_response();
    }

    info!(pages, collected = report.articles.len(), "News crawling completed via HTTP request");
    (
        StatusCode::OK,
        format!("News crawling operation successfully triggered. (Pages crawled: {})", pages),
    )
        .into_response()
}

pub async fn search_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let keyword = match params.keyword.as_deref().map(str::trim) {
        Some(k) if !k.is_empty() => k.to_string(),
        _ => return (StatusCode::BAD_REQUEST, "Missing 'keyword' query parameter.").into_response(),
    };

    match nf_crawler::search_articles(state.store.as_ref(), &keyword).await {
        Ok(articles) => Json(articles).into_response(),
        Err(e) => {
            error!(%keyword, error = %e, "Article search failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error during article search: {}", e)).into_response()
        }
    }
}
