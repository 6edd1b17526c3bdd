//! HTTP fetching with cookie replay and redirect-to-magnet capture.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, LOCATION},
    redirect, Client,
};
use thiserror::Error;
use tracing::debug;

const MAGNET_SCHEME: &str = "magnet";

/// Upper bound on followed redirects, same as reqwest's default policy.
const MAX_REDIRECTS: usize = 10;

/// What a successful fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    /// Response body, decoded as UTF-8.
    Body(String),
    /// The server redirected to this magnet URI.
    MagnetRedirect(String),
}

/// Errors that can occur while fetching a URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Response body is not valid UTF-8: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::ConnectionFailed(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Something that can GET a URL for the engine.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Fetched, FetchError>;
}

fn redirect_policy() -> redirect::Policy {
    redirect::Policy::custom(|attempt| {
        if attempt.url().scheme() == MAGNET_SCHEME {
            attempt.stop()
        } else if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

/// Build the HTTP client shared by fetching and downloading.
///
/// Cookies set by the server are replayed on later requests and across
/// redirects. Redirects to `magnet:` URIs are not followed.
pub fn build_client(timeout: Option<Duration>) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .cookie_store(true)
        .redirect(redirect_policy());
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| FetchError::Client(e.to_string()))
}

/// Magnet URI in a `Location` header. Raw non-UTF-8 bytes are decoded lossily.
fn magnet_location(headers: &HeaderMap) -> Option<String> {
    let location = headers.get(LOCATION)?;
    let location = String::from_utf8_lossy(location.as_bytes());
    location
        .starts_with("magnet:")
        .then(|| location.into_owned())
}

/// [`Fetcher`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with its own client.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        Ok(Self::with_client(build_client(timeout)?))
    }

    /// Create a fetcher around an existing client (see [`build_client`]).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.is_redirection() {
            if let Some(magnet) = magnet_location(response.headers()) {
                debug!(status = status.as_u16(), "Redirected to magnet link");
                return Ok(Fetched::MagnetRedirect(magnet));
            }
        }

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(Fetched::Body(body))
    }
}
