//! booth-client - BOOTH marketplace client
//!
//! Extracts product summaries from listing and search pages, maps item JSON into
//! product details, and downloads a product's files into a local directory.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export the caller-facing API
pub use application::{MarketplaceService, ServiceError, ServiceResult};
pub use domain::{DownloadLink, DownloadOutcome, ListingPage, ProductDetail, ProductOverview};
