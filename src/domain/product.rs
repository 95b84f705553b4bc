use serde::{Deserialize, Serialize};

/// Product summary extracted from a listing card.
///
/// Every field is optional: a card whose markup lacks one of the expected
/// attributes still produces a record, with the missing value left as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOverview {
    pub id: Option<u64>,
    pub brand: Option<String>,
    pub category_id: Option<u64>,
    pub name: Option<String>,
    pub price: Option<u64>,
    pub image_url: Option<String>,
    pub shop_name: Option<String>,
    pub shop_url: Option<String>,
    pub shop_image_url: Option<String>,
}

/// One page of listing or search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    /// Estimated page count derived from the page's total-count text
    pub total_pages: u32,
    /// Items in display order
    pub items: Vec<ProductOverview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub original: String,
    pub resized: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub subdomain: String,
    pub thumbnail: String,
    pub url: String,
}

/// Downloadable asset reference attached to a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub url: String,
    /// File name used verbatim when the asset is written to disk
    pub name: String,
}

impl DownloadLink {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// Normalized product detail built from the item JSON endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: u64,
    pub description: String,
    pub category: Category,
    pub name: String,
    /// Price exactly as the marketplace reports it
    pub price: String,
    pub images: Vec<ProductImage>,
    pub shop: Shop,
    pub is_adult: bool,
    pub wish_count: u64,
    /// Files of the first variation's `no_musics` download set
    pub downloadable: Vec<DownloadLink>,
}

/// Aggregate result of one download run.
///
/// `successful_downloads + failed_downloads` always equals the number of links
/// that were handed to the downloader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOutcome {
    pub successful_downloads: u32,
    pub failed_downloads: u32,
}

impl DownloadOutcome {
    pub fn total(&self) -> u32 {
        self.successful_downloads + self.failed_downloads
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed_downloads == 0
    }
}
