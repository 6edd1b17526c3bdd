//! Mock fetcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::searcher::{FetchError, Fetched, Fetcher};

/// A canned response for URLs starting with a given prefix.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Body(String),
    MagnetRedirect(String),
    /// Fail with `FetchError::ConnectionFailed(message)`.
    ConnectionFailed(String),
    /// Fail with `FetchError::Status(code)`.
    Status(u16),
}

/// Mock implementation of the Fetcher trait.
///
/// Responses are matched by URL prefix, first match wins. URLs without a
/// match fail with a connection error. Every requested URL is recorded.
///
/// # Example
///
/// ```rust,ignore
/// use prowlarr_engine_core::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new();
/// fetcher.respond_with_body("http://prowlarr/api/v1/search", "[]").await;
///
/// let fetched = fetcher.fetch("http://prowlarr/api/v1/search?query=x").await?;
/// assert_eq!(fetcher.request_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: Arc<RwLock<Vec<(String, MockResponse)>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a mock fetcher with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the response for URLs starting with `prefix`.
    pub async fn respond(&self, prefix: &str, response: MockResponse) {
        self.responses
            .write()
            .await
            .push((prefix.to_string(), response));
    }

    pub async fn respond_with_body(&self, prefix: &str, body: &str) {
        self.respond(prefix, MockResponse::Body(body.to_string()))
            .await;
    }

    pub async fn respond_with_magnet(&self, prefix: &str, magnet: &str) {
        self.respond(prefix, MockResponse::MagnetRedirect(magnet.to_string()))
            .await;
    }

    pub async fn fail_with_connection_error(&self, prefix: &str) {
        self.respond(
            prefix,
            MockResponse::ConnectionFailed("connection refused".to_string()),
        )
        .await;
    }

    /// Get recorded request URLs.
    pub async fn recorded_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    /// Get the number of requests made.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
        self.requests.write().await.push(url.to_string());

        let responses = self.responses.read().await;
        let response = responses
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone());

        match response {
            Some(MockResponse::Body(body)) => Ok(Fetched::Body(body)),
            Some(MockResponse::MagnetRedirect(magnet)) => Ok(Fetched::MagnetRedirect(magnet)),
            Some(MockResponse::ConnectionFailed(msg)) => Err(FetchError::ConnectionFailed(msg)),
            Some(MockResponse::Status(code)) => Err(FetchError::Status(code)),
            None => Err(FetchError::ConnectionFailed(format!(
                "no mock response for {}",
                url
            ))),
        }
    }
}
