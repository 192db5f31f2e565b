use std::time::Duration;

use async_trait::async_trait;
use nf_core::{Error, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::charset;

/// A fully read 2xx response.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Body decoded according to the declared charset.
    pub fn text(&self) -> String {
        charset::decode(&self.body, self.content_type.as_deref())
    }
}

/// GET access to the target site.
///
/// Implementations read the whole body and report non-2xx responses as
/// [`Error::HttpStatus`], request transport failures as [`Error::Network`],
/// failures while reading an accepted body as [`Error::BodyRead`] and
/// unbuildable requests as [`Error::InvalidUrl`]. They never retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage>;
}

/// [`PageFetcher`] over reqwest, sending a fixed User-Agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self::with_client(Client::new(), user_agent)
    }

    pub fn with_client(client: Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }
}

fn request_error(url: &str, err: reqwest::Error) -> Error {
    if err.is_builder() {
        Error::InvalidUrl(format!("{}: {}", url, err))
    } else {
        Error::Network(format!("{}: {}", url, err))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage> {
        debug!(%url, ?timeout, "GET");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::BodyRead(format!("{}: {}", url, e)))?
            .to_vec();

        Ok(FetchedPage {
            url: url.to_string(),
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UA: &str = "nf-test-agent/1.0";

    #[tokio::test]
    async fn test_sends_user_agent_and_decodes_charset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news"))
            .and(header("user-agent", UA))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=EUC-KR")
                    .set_body_bytes(b"\xc7\xd1\xb1\xb9".to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(UA);
        let page = fetcher
            .get(&format!("{}/news", server.uri()), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(page.content_type.as_deref(), Some("text/html; charset=EUC-KR"));
        assert_eq!(page.text(), "한국");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = HttpFetcher::new(UA)
            .get(&format!("{}/gone", server.uri()), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_timeout_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let err = HttpFetcher::new(UA)
            .get(&server.uri(), Duration::from_millis(50))
            .await
            .unwrap_err();

        assert!(err.is_transient(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let err = HttpFetcher::new(UA)
            .get("not a url", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
