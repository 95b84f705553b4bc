//! Test utilities for booth-client
//!
//! Provides an in-memory [`DocumentFetcher`] so service and downloader tests run
//! without a network.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::infrastructure::http_client::{ByteStream, DocumentFetcher, Request, TransportError};

/// Canned reply for one URL
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// Text body for `get`
    Body(String),
    /// Chunks for `stream`; an `Err` chunk interrupts the stream at that point
    Chunks(Vec<Result<Vec<u8>, String>>),
    /// Non-success HTTP status
    Status(u16),
}

/// In-memory fetcher keyed by full URL; records every request in order
#[derive(Debug, Default)]
pub struct StubFetcher {
    responses: HashMap<String, StubResponse>,
    requests: Mutex<Vec<Request>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, response: StubResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn with_body(self, url: &str, body: impl Into<String>) -> Self {
        self.with(url, StubResponse::Body(body.into()))
    }

    pub fn with_file(self, url: &str, content: &[u8]) -> Self {
        self.with(url, StubResponse::Chunks(vec![Ok(content.to_vec())]))
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    fn lookup(&self, request: &Request) -> Result<StubResponse, TransportError> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request.clone());

        let url = request.url.as_str();
        match self.responses.get(url) {
            Some(StubResponse::Status(status)) => Err(TransportError::from_status(url, *status)),
            Some(response) => Ok(response.clone()),
            None => Err(TransportError::from_status(url, 404)),
        }
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn get(&self, request: &Request) -> Result<String, TransportError> {
        match self.lookup(request)? {
            StubResponse::Body(body) => Ok(body),
            StubResponse::Chunks(chunks) => {
                let bytes: Vec<u8> = chunks.into_iter().filter_map(Result::ok).flatten().collect();
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            StubResponse::Status(status) => Err(TransportError::from_status(request.url.as_str(), status)),
        }
    }

    async fn stream(&self, request: &Request) -> Result<ByteStream, TransportError> {
        let url = request.url.to_string();
        let chunks = match self.lookup(request)? {
            StubResponse::Body(body) => vec![Ok(body.into_bytes())],
            StubResponse::Chunks(chunks) => chunks,
            StubResponse::Status(status) => return Err(TransportError::from_status(&url, status)),
        };

        Ok(stream::iter(chunks)
            .map(move |chunk| {
                chunk.map_err(|message| TransportError::Stream {
                    url: url.clone(),
                    message,
                })
            })
            .boxed())
    }
}
