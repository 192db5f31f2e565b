//! Fakes shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use nf_core::{ArticleRecord, ArticleStore, Document, Error, Result, StoreKey};
use nf_storage::InMemoryStore;
use serde_json::Value;

use crate::fetcher::{FetchedPage, PageFetcher};

#[derive(Debug, Clone)]
pub enum Step {
    Page { body: Vec<u8>, content_type: Option<String> },
    Transient,
    BodyRead,
    Status(u16),
}

impl Step {
    pub fn html(body: &str) -> Self {
        Step::Page {
            body: body.as_bytes().to_vec(),
            content_type: Some("text/html; charset=utf-8".to_string()),
        }
    }
}

/// Replays a fixed sequence of outcomes per URL and records every request.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<HashMap<String, VecDeque<Step>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, steps: Vec<Step>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), steps.into_iter().collect());
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.requests.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<FetchedPage> {
        self.requests.lock().unwrap().push(url.to_string());
        let step = self
            .routes
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(|steps| steps.pop_front());

        match step {
            Some(Step::Page { body, content_type }) => Ok(FetchedPage {
                url: url.to_string(),
                content_type,
                body,
            }),
            Some(Step::Status(status)) => Err(Error::HttpStatus {
                url: url.to_string(),
                status,
            }),
            Some(Step::Transient) => Err(Error::Network(format!("{url}: connection reset"))),
            Some(Step::BodyRead) => Err(Error::BodyRead(format!("{url}: unexpected end of body"))),
            None => Err(Error::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl ArticleStore for FailingStore {
    async fn get(&self, _key: &StoreKey) -> Result<Option<Document>> {
        Err(Error::Storage("unavailable".to_string()))
    }

    async fn set(&self, _key: &StoreKey, _record: &ArticleRecord) -> Result<()> {
        Err(Error::Storage("write rejected".to_string()))
    }

    async fn update_field(&self, _key: &StoreKey, _field: &str, _value: Value) -> Result<()> {
        Err(Error::Storage("write rejected".to_string()))
    }

    async fn list(&self) -> Result<Vec<Document>> {
        Err(Error::Storage("unavailable".to_string()))
    }
}

/// In-memory store counting writes.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: InMemoryStore,
    pub sets: AtomicUsize,
    pub updates: AtomicUsize,
}

impl RecordingStore {
    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleStore for RecordingStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<Document>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &StoreKey, record: &ArticleRecord) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, record).await
    }

    async fn update_field(&self, key: &StoreKey, field: &str, value: Value) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_field(key, field, value).await
    }

    async fn list(&self) -> Result<Vec<Document>> {
        self.inner.list().await
    }
}

pub fn article_page(body: &str) -> String {
    format!(
        r#"<html><body><div id="ct"><article id="dic_area" class="go_trans _article_content">{}</article></div></body></html>"#,
        body
    )
}

pub fn listing_item(title: &str, href: &str, summary: &str, press: &str) -> String {
    format!(
        r#"<li><dl>
            <dd class="articleSubject"><a href="{href}">{title}</a></dd>
            <dd class="articleSummary">{summary}
                <span class="press">{press}</span><span class="bar">|</span><span class="wdate">2024-05-02 09:15:00</span>
            </dd>
        </dl></li>"#
    )
}

pub fn listing_page(items: &[String]) -> String {
    format!(
        r#"<html><body><div class="mainNewsList"><ul class="newsList">{}</ul></div></body></html>"#,
        items.concat()
    )
}
