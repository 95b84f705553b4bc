//! Domain module - marketplace entities
//!
//! Plain data records shared by the parsing, download and service layers.

pub mod product;

pub use product::{
    Category, DownloadLink, DownloadOutcome, ListingPage, ProductDetail, ProductImage,
    ProductOverview, Shop,
};
