//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors and attribute names describing the listing markup.

use serde::{Deserialize, Serialize};

/// CSS selectors and attribute names for listing and search pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Title node of the age-confirmation interstitial
    pub age_gate_title: String,

    /// Listing cards; only cards carrying the product id attribute are candidates
    pub product_card: String,

    /// Data attributes on the card element
    pub id_attribute: String,
    pub brand_attribute: String,
    pub category_attribute: String,
    pub price_attribute: String,

    /// Nested product title element
    pub title: String,

    /// Thumbnail image and its lazy-load source attribute
    pub thumbnail: String,
    pub thumbnail_attribute: String,

    /// Shop name text element and the anchor holding the shop URL
    pub shop_name: String,
    pub shop_anchor: String,

    /// Shop avatar image
    pub shop_avatar: String,

    /// Container holding the total result count, e.g. "1,234件"
    pub total_count: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            age_gate_title: ".adult-check-nav .adult-check-title".to_string(),
            product_card: "li.item-card[data-product-id]".to_string(),
            id_attribute: "data-product-id".to_string(),
            brand_attribute: "data-product-brand".to_string(),
            category_attribute: "data-product-category".to_string(),
            price_attribute: "data-product-price".to_string(),
            title: ".item-card__title".to_string(),
            thumbnail: ".item-card__thumbnail-image".to_string(),
            thumbnail_attribute: "data-original".to_string(),
            shop_name: ".item-card__shop-name".to_string(),
            shop_anchor: "a.item-card__shop-name-anchor".to_string(),
            shop_avatar: ".item-card__shop-info .user-avatar".to_string(),
            total_count: ".shop-item-count .u-tpg-caption1".to_string(),
        }
    }
}

/// Listing selectors compiled into the query type of one tree implementation
#[derive(Debug, Clone)]
pub struct CompiledSelectors<Q> {
    pub age_gate_title: Q,
    pub product_card: Q,
    pub title: Q,
    pub thumbnail: Q,
    pub shop_name: Q,
    pub shop_anchor: Q,
    pub shop_avatar: Q,
    pub total_count: Q,
}

impl ListingSelectors {
    /// Compile every CSS selector with `compile`, which receives the field label
    /// and the selector text. Stops at the first failure.
    pub fn compile<Q, E>(
        &self,
        mut compile: impl FnMut(&'static str, &str) -> Result<Q, E>,
    ) -> Result<CompiledSelectors<Q>, E> {
        Ok(CompiledSelectors {
            age_gate_title: compile("age_gate_title", &self.age_gate_title)?,
            product_card: compile("product_card", &self.product_card)?,
            title: compile("title", &self.title)?,
            thumbnail: compile("thumbnail", &self.thumbnail)?,
            shop_name: compile("shop_name", &self.shop_name)?,
            shop_anchor: compile("shop_anchor", &self.shop_anchor)?,
            shop_avatar: compile("shop_avatar", &self.shop_avatar)?,
            total_count: compile("total_count", &self.total_count)?,
        })
    }
}
