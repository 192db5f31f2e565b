use std::sync::Arc;

use nf_core::ArticleStore;
use nf_crawler::NewsCrawler;

pub struct AppState {
    pub crawler: Arc<NewsCrawler>,
    pub store: Arc<dyn ArticleStore>,
}
