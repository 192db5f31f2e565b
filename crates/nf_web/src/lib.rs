use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod handlers;
pub mod state;

pub use state::AppState;

/// Smallest and largest page count a crawl request may ask for.
pub const MIN_PAGES: u32 = 1;
pub const MAX_PAGES: u32 = 10;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/schedule/crawl", post(handlers::trigger_crawl))
        .route("/api/news/search", get(handlers::search_news))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{create_app, AppState};
    pub use nf_core::{ArticleRecord, Error, Result};
}
