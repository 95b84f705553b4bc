//! HTTP transport for BOOTH pages, JSON endpoints and downloadable assets
//!
//! [`DocumentFetcher`] is the seam the service and the downloader depend on;
//! [`HttpClient`] is its reqwest implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::infrastructure::config::{booth, defaults};

/// Body chunks of a streamed response
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

#[derive(Error, Debug)]
pub enum TransportError {
    /// 4xx: the server refused this request (unknown id, forbidden file, ...)
    #[error("Request rejected with status {status}: {url}")]
    ClientRejected { url: String, status: u16 },

    #[error("Server error with status {status}: {url}")]
    ServerError { url: String, status: u16 },

    #[error("Failed to fetch URL {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response stream interrupted for {url}: {message}")]
    Stream { url: String, message: String },
}

impl TransportError {
    /// Classify a non-success HTTP status
    pub fn from_status(url: &str, status: u16) -> Self {
        if (400..500).contains(&status) {
            Self::ClientRejected {
                url: url.to_string(),
                status,
            }
        } else {
            Self::ServerError {
                url: url.to_string(),
                status,
            }
        }
    }

    pub fn is_client_rejected(&self) -> bool {
        matches!(self, Self::ClientRejected { .. })
    }
}

/// What the caller expects back, used for the `Accept` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Html,
    Json,
    Binary,
}

impl ResponseKind {
    fn accept(self) -> &'static str {
        match self {
            Self::Html => "text/html,application/xhtml+xml",
            Self::Json => "application/json",
            Self::Binary => "*/*",
        }
    }
}

/// Fully formed request produced by the endpoint builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
    pub kind: ResponseKind,
}

impl Request {
    pub fn new(url: Url, kind: ResponseKind) -> Self {
        Self { url, kind }
    }

    /// Value of a query parameter, if present
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Transport capability consumed by the service and the downloader
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the whole response body as text
    async fn get(&self, request: &Request) -> Result<String, TransportError>;

    /// Open the response body as a byte stream
    async fn stream(&self, request: &Request) -> Result<ByteStream, TransportError>;
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Site root, overridable for mirrors and tests
    pub base_url: String,
    pub user_agent: String,
    /// Timeout for page and JSON requests; streamed downloads only use the connect timeout
    pub timeout_seconds: u64,
    pub follow_redirects: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: booth::BASE_URL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            follow_redirects: true,
        }
    }
}

/// reqwest-backed [`DocumentFetcher`]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .cookie_store(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    async fn send(&self, request: &Request, timeout: Option<Duration>) -> Result<Response, TransportError> {
        let url = request.url.as_str();
        info!("Fetching URL: {}", url);

        let mut builder = self
            .client
            .get(request.url.clone())
            .header(ACCEPT, request.kind.accept());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|source| TransportError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::from_status(url, status.as_u16()));
        }

        debug!("Successfully fetched: {} ({})", url, status);
        Ok(response)
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl DocumentFetcher for HttpClient {
    async fn get(&self, request: &Request) -> Result<String, TransportError> {
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let response = self.send(request, Some(timeout)).await?;

        response.text().await.map_err(|source| TransportError::Network {
            url: request.url.to_string(),
            source,
        })
    }

    async fn stream(&self, request: &Request) -> Result<ByteStream, TransportError> {
        let response = self.send(request, None).await?;
        let url = request.url.to_string();

        Ok(response
            .bytes_stream()
            .map(move |chunk| {
                chunk.map(|bytes| bytes.to_vec()).map_err(|e| TransportError::Stream {
                    url: url.clone(),
                    message: e.to_string(),
                })
            })
            .boxed())
    }
}
