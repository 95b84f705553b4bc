//! Product detail mapper
//!
//! Maps the item JSON endpoint (`/ja/items/{id}.json`) onto [`ProductDetail`].
//! The response is validated against explicit schemas before mapping; the id is
//! checked first so a non-product response never gets past the first field.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{MappingError, MappingResult};
use crate::domain::product::{Category, DownloadLink, ProductDetail, ProductImage, Shop};

#[derive(Debug, Deserialize)]
struct ItemResponse {
    #[serde(default)]
    description: Option<String>,
    category: CategoryResponse,
    name: String,
    price: PriceValue,
    #[serde(default)]
    images: Vec<ImageResponse>,
    shop: ShopResponse,
    is_adult: bool,
    #[serde(default)]
    wish_lists_count: u64,
    variations: Vec<VariationResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceValue {
    Text(String),
    Number(serde_json::Number),
}

impl PriceValue {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoryResponse {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    original: String,
    resized: String,
}

#[derive(Debug, Deserialize)]
struct ShopResponse {
    name: String,
    subdomain: String,
    thumbnail_url: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct VariationResponse {
    #[serde(default)]
    downloadable: Option<DownloadableResponse>,
}

#[derive(Debug, Deserialize)]
struct DownloadableResponse {
    #[serde(default)]
    no_musics: Option<Vec<DownloadFileResponse>>,
}

#[derive(Debug, Deserialize)]
struct DownloadFileResponse {
    url: String,
    name: String,
}

/// Validating mapper for item JSON responses
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductDetailMapper;

impl ProductDetailMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map a raw JSON body
    pub fn map_str(&self, body: &str) -> MappingResult<ProductDetail> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| MappingError::shape_mismatch(format!("invalid JSON: {e}")))?;
        self.map(&value)
    }

    /// Map an already decoded response
    pub fn map(&self, response: &Value) -> MappingResult<ProductDetail> {
        let id = parse_id(response)?;

        let item = ItemResponse::deserialize(response)
            .map_err(|e| MappingError::shape_mismatch(e.to_string()))?;

        let downloadable = item
            .variations
            .into_iter()
            .next()
            .ok_or_else(|| MappingError::shape_mismatch("product has no variations"))?
            .downloadable
            .ok_or_else(|| MappingError::shape_mismatch("first variation is not downloadable"))?
            .no_musics
            .ok_or_else(|| MappingError::shape_mismatch("downloadable set has no 'no_musics' entry"))?
            .into_iter()
            .map(|file| DownloadLink::new(file.url, file.name))
            .collect::<Vec<_>>();

        debug!(
            "Mapped product {} with {} images and {} downloadable files",
            id,
            item.images.len(),
            downloadable.len()
        );

        Ok(ProductDetail {
            id,
            description: item.description.unwrap_or_default(),
            category: Category {
                id: item.category.id,
                name: item.category.name,
            },
            name: item.name,
            price: item.price.into_string(),
            images: item
                .images
                .into_iter()
                .map(|image| ProductImage {
                    original: image.original,
                    resized: image.resized,
                })
                .collect(),
            shop: Shop {
                name: item.shop.name,
                subdomain: item.shop.subdomain,
                thumbnail: item.shop.thumbnail_url,
                url: item.shop.url,
            },
            is_adult: item.is_adult,
            wish_count: item.wish_lists_count,
            downloadable,
        })
    }
}

/// Numeric id from either a JSON number or a numeric string
fn parse_id(response: &Value) -> MappingResult<u64> {
    let raw = response.get("id");
    let id = match raw {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    };

    id.ok_or_else(|| MappingError::InvalidId {
        found: raw.map_or_else(|| "nothing".to_string(), Value::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item_json() -> Value {
        json!({
            "id": 3_456_789,
            "description": "Hair texture set",
            "category": { "id": 208, "name": "3Dキャラクター", "url": "https://booth.pm/ja/browse/3D" },
            "name": "Hair Pack",
            "price": "¥ 1,500",
            "images": [
                { "caption": null, "original": "https://img/1.png", "resized": "https://img/1_s.png" },
                { "caption": null, "original": "https://img/2.png", "resized": "https://img/2_s.png" }
            ],
            "shop": {
                "name": "Studio",
                "subdomain": "studio",
                "thumbnail_url": "https://img/shop.png",
                "url": "https://studio.booth.pm/",
                "verified": true
            },
            "is_adult": false,
            "wish_lists_count": 321,
            "variations": [
                {
                    "downloadable": {
                        "musics": [],
                        "no_musics": [
                            { "file_name": "hair", "file_extension": ".zip", "name": "hair.zip", "url": "https://booth.pm/downloadables/1" },
                            { "file_name": "readme", "file_extension": ".txt", "name": "readme.txt", "url": "https://booth.pm/downloadables/2" }
                        ]
                    }
                },
                { "downloadable": null }
            ]
        })
    }

    #[test]
    fn test_map_full_item() {
        let detail = ProductDetailMapper::new().map(&item_json()).unwrap();

        assert_eq!(detail.id, 3_456_789);
        assert_eq!(detail.name, "Hair Pack");
        assert_eq!(detail.price, "¥ 1,500");
        assert_eq!(detail.category, Category { id: 208, name: "3Dキャラクター".to_string() });
        assert_eq!(detail.images.len(), 2);
        assert_eq!(detail.images[1].resized, "https://img/2_s.png");
        assert_eq!(detail.shop.thumbnail, "https://img/shop.png");
        assert!(!detail.is_adult);
        assert_eq!(detail.wish_count, 321);
        assert_eq!(
            detail.downloadable,
            vec![
                DownloadLink::new("https://booth.pm/downloadables/1", "hair.zip"),
                DownloadLink::new("https://booth.pm/downloadables/2", "readme.txt"),
            ]
        );
    }

    #[test]
    fn test_numeric_string_id_and_price_number() {
        let mut value = item_json();
        value["id"] = json!("42");
        value["price"] = json!(500);

        let detail = ProductDetailMapper::new().map(&value).unwrap();

        assert_eq!(detail.id, 42);
        assert_eq!(detail.price, "500");
    }

    #[test]
    fn test_invalid_id_is_reported_before_shape() {
        let value = json!({ "id": "not-a-number" });

        let err = ProductDetailMapper::new().map(&value).unwrap_err();

        assert_eq!(
            err,
            MappingError::InvalidId {
                found: "\"not-a-number\"".to_string()
            }
        );
    }

    #[test]
    fn test_missing_id() {
        let err = ProductDetailMapper::new().map(&json!({ "error": "not found" })).unwrap_err();
        assert!(matches!(err, MappingError::InvalidId { .. }));
    }

    #[test]
    fn test_empty_variations_is_shape_mismatch() {
        let mut value = item_json();
        value["variations"] = json!([]);

        let err = ProductDetailMapper::new().map(&value).unwrap_err();
        assert!(matches!(err, MappingError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_first_variation_without_downloadable_is_shape_mismatch() {
        let mut value = item_json();
        value["variations"] = json!([{ "downloadable": null }, { "downloadable": { "no_musics": [] } }]);

        let err = ProductDetailMapper::new().map(&value).unwrap_err();
        assert_eq!(
            err,
            MappingError::shape_mismatch("first variation is not downloadable")
        );
    }

    #[test]
    fn test_wrong_field_type_is_shape_mismatch() {
        let mut value = item_json();
        value["is_adult"] = json!("yes");

        let err = ProductDetailMapper::new().map(&value).unwrap_err();
        assert!(matches!(err, MappingError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_map_str_rejects_invalid_json() {
        let err = ProductDetailMapper::new().map_str("<html>").unwrap_err();
        assert!(matches!(err, MappingError::ShapeMismatch { .. }));
    }
}
