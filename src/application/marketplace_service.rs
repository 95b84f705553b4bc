//! Marketplace service layer
//!
//! Caller-facing operations: validate input, build the request, fetch, and hand
//! the body to the right extractor. Input errors are raised before any I/O.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::product::{DownloadLink, DownloadOutcome, ListingPage, ProductDetail};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::downloader::AssetDownloader;
use crate::infrastructure::endpoints::{EndpointError, Endpoints, SortFilter};
use crate::infrastructure::http_client::{DocumentFetcher, HttpClient, Request, TransportError};
use crate::infrastructure::parsing::{
    ListingExtractor, MappingError, ParsingError, ProductDetailMapper,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("Request failed: {message}")]
    Transport { message: String },
}

impl From<EndpointError> for ServiceError {
    fn from(e: EndpointError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<TransportError> for ServiceError {
    fn from(e: TransportError) -> Self {
        Self::Transport {
            message: e.to_string(),
        }
    }
}

impl ServiceError {
    pub fn is_age_gate(&self) -> bool {
        matches!(self, Self::Parsing(e) if e.is_age_gate())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Entry point for listing, search, detail and download operations
pub struct MarketplaceService {
    fetcher: Arc<dyn DocumentFetcher>,
    endpoints: Endpoints,
    extractor: ListingExtractor,
    mapper: ProductDetailMapper,
    downloader: AssetDownloader,
}

impl MarketplaceService {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        endpoints: Endpoints,
        extractor: ListingExtractor,
    ) -> Self {
        let downloader = AssetDownloader::new(fetcher.clone(), endpoints.clone());
        Self {
            fetcher,
            endpoints,
            extractor,
            mapper: ProductDetailMapper::new(),
            downloader,
        }
    }

    /// Build the service with the reqwest transport described by `config`
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = HttpClient::new(config.http.clone())?;
        let endpoints = Endpoints::new(&config.http.base_url).context("Invalid base URL")?;
        let extractor = ListingExtractor::with_selectors(config.selectors.clone())
            .context("Invalid listing selectors")?;

        Ok(Self::new(Arc::new(client), endpoints, extractor))
    }

    /// One page of the item listing; `page` defaults to 1
    pub async fn list_products(
        &self,
        page: Option<u32>,
        filter: Option<&str>,
    ) -> ServiceResult<ListingPage> {
        let filter = parse_filter(filter)?;
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(ServiceError::InvalidInput(
                "page numbers start at 1".to_string(),
            ));
        }

        let request = self.endpoints.listing(page, filter);
        self.fetch_listing(&request).await
    }

    /// Keyword search; the term must contain something other than whitespace
    pub async fn search(&self, term: &str, filter: Option<&str>) -> ServiceResult<ListingPage> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::InvalidInput(
                "search term must not be empty".to_string(),
            ));
        }
        let filter = parse_filter(filter)?;

        let request = self.endpoints.search(term, filter);
        self.fetch_listing(&request).await
    }

    /// Product detail, or `None` when the site rejects the id
    pub async fn get_product(&self, id: &str) -> ServiceResult<Option<ProductDetail>> {
        let id: u64 = id.trim().parse().map_err(|_| {
            ServiceError::InvalidInput(format!("product id must be numeric, got '{id}'"))
        })?;

        let request = self.endpoints.product(id);
        let body = match self.fetcher.get(&request).await {
            Ok(body) => body,
            Err(e) if e.is_client_rejected() => {
                info!("Product {} not available: {}", id, e);
                return Ok(None);
            }
            Err(e) => {
                return Err(ServiceError::Transport {
                    message: format!("Failed to fetch product {id}: {e}"),
                });
            }
        };

        let detail = self.mapper.map_str(&body)?;
        debug!("Fetched product {} ({})", detail.id, detail.name);
        Ok(Some(detail))
    }

    /// Download every downloadable file of `detail` into `target`
    pub async fn download(&self, detail: &ProductDetail, target: &Path) -> DownloadOutcome {
        info!("Downloading files of product {}", detail.id);
        self.downloader.download(&detail.downloadable, target).await
    }

    /// Download arbitrary links into `target`
    pub async fn download_links(&self, links: &[DownloadLink], target: &Path) -> DownloadOutcome {
        self.downloader.download(links, target).await
    }

    async fn fetch_listing(&self, request: &Request) -> ServiceResult<ListingPage> {
        let html = self.fetcher.get(request).await?;
        let page = self.extractor.extract(&html)?;

        info!(
            "Fetched {} products ({} pages) from {}",
            page.items.len(),
            page.total_pages,
            request.url
        );
        Ok(page)
    }
}

fn parse_filter(token: Option<&str>) -> ServiceResult<Option<SortFilter>> {
    token
        .map(str::parse::<SortFilter>)
        .transpose()
        .map_err(ServiceError::from)
}
