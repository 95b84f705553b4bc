//! Endpoint builder for BOOTH URLs
//!
//! Turns logical parameters (page, sort token, search term, item id) into
//! [`Request`]s against the configured site root.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

use crate::infrastructure::config::booth::{self, params, sort};
use crate::infrastructure::http_client::{Request, ResponseKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Unknown sort filter '{0}' (expected New, Popularity or Loves)")]
    UnknownFilter(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Sort orders offered by listing and search pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortFilter {
    New,
    Popularity,
    Loves,
}

impl FromStr for SortFilter {
    type Err = EndpointError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "New" => Ok(Self::New),
            "Popularity" => Ok(Self::Popularity),
            "Loves" => Ok(Self::Loves),
            other => Err(EndpointError::UnknownFilter(other.to_string())),
        }
    }
}

impl fmt::Display for SortFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::New => "New",
            Self::Popularity => "Popularity",
            Self::Loves => "Loves",
        };
        f.write_str(token)
    }
}

impl SortFilter {
    /// `sort` value for the item listing
    pub fn listing_param(self) -> &'static str {
        match self {
            Self::New => sort::NEW,
            Self::Popularity => sort::POPULARITY,
            Self::Loves => sort::WISH_LISTS,
        }
    }

    /// `sort` value for search; popularity is the search default and sends nothing
    pub fn search_param(self) -> Option<&'static str> {
        match self {
            Self::New => Some(sort::NEW),
            Self::Popularity => None,
            Self::Loves => Some(sort::WISH_LISTS),
        }
    }
}

/// URL builder bound to one site root
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self, EndpointError> {
        let base = Url::parse(base_url).map_err(|e| EndpointError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if base.cannot_be_a_base() {
            return Err(EndpointError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self { base })
    }

    /// `/ja/items?page={page}[&sort=...]`
    pub fn listing(&self, page: u32, filter: Option<SortFilter>) -> Request {
        let mut url = self.url_with_segments(&[booth::LOCALE, "items"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(params::PAGE, &page.to_string());
            if let Some(filter) = filter {
                query.append_pair(params::SORT, filter.listing_param());
            }
        }
        Request::new(url, ResponseKind::Html)
    }

    /// `/ja/search/{term}[?sort=...]`
    pub fn search(&self, term: &str, filter: Option<SortFilter>) -> Request {
        let mut url = self.url_with_segments(&[booth::LOCALE, "search", term]);
        if let Some(sort) = filter.and_then(SortFilter::search_param) {
            url.query_pairs_mut().append_pair(params::SORT, sort);
        }
        Request::new(url, ResponseKind::Html)
    }

    /// `/ja/items/{id}.json`
    pub fn product(&self, id: u64) -> Request {
        let file = format!("{id}.json");
        Request::new(
            self.url_with_segments(&[booth::LOCALE, "items", &file]),
            ResponseKind::Json,
        )
    }

    /// Absolute URL taken as-is, e.g. a download link
    pub fn raw(&self, url: &str) -> Result<Request, EndpointError> {
        let url = Url::parse(url).map_err(|e| EndpointError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Request::new(url, ResponseKind::Binary))
    }

    fn url_with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
