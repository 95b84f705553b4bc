//! Integration tests for the marketplace service over real HTTP.
//!
//! These tests run `MarketplaceService` with the reqwest transport against a
//! wiremock server standing in for booth.pm.

use booth_client_lib::infrastructure::{AppConfig, HttpClientConfig};
use booth_client_lib::{DownloadLink, DownloadOutcome, MarketplaceService, ServiceError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_HTML: &str = include_str!("fixtures/listing.html");
const AGE_GATE_HTML: &str = include_str!("fixtures/age_gate.html");

fn service_for(server: &MockServer) -> MarketplaceService {
    let config = AppConfig {
        http: HttpClientConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
            ..Default::default()
        },
        ..Default::default()
    };
    MarketplaceService::from_config(&config).expect("service should build")
}

fn item_json(server: &MockServer) -> serde_json::Value {
    json!({
        "id": 1_234_567,
        "description": "Sample outfit",
        "category": { "id": 208, "name": "3D衣装" },
        "name": "Sample Outfit",
        "price": "¥ 2,000",
        "images": [{ "original": "https://img/o.png", "resized": "https://img/r.png" }],
        "shop": {
            "name": "Atelier",
            "subdomain": "atelier",
            "thumbnail_url": "https://img/shop.png",
            "url": "https://atelier.booth.pm/"
        },
        "is_adult": false,
        "wish_lists_count": 42,
        "variations": [{
            "downloadable": {
                "musics": [],
                "no_musics": [
                    { "name": "outfit.zip", "url": format!("{}/files/outfit.zip", server.uri()) },
                    { "name": "broken.zip", "url": format!("{}/files/broken.zip", server.uri()) }
                ]
            }
        }]
    })
}

#[tokio::test]
async fn test_listing_page_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ja/items"))
        .and(query_param("page", "2"))
        .and(query_param("sort", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .mount(&server)
        .await;

    let page = service_for(&server)
        .list_products(Some(2), Some("New"))
        .await
        .expect("listing should parse");

    assert_eq!(page.total_pages, 21);
    let ids: Vec<_> = page.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![Some(30), Some(10), Some(20)]);
    assert_eq!(page.items[0].name.as_deref(), Some("Winter Coat"));
    assert_eq!(page.items[2].image_url, None);
}

#[tokio::test]
async fn test_age_gate_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ja/search/R18"))
        .respond_with(ResponseTemplate::new(200).set_body_string(AGE_GATE_HTML))
        .mount(&server)
        .await;

    let err = service_for(&server).search("R18", None).await.unwrap_err();

    assert!(err.is_age_gate(), "expected age gate, got {err:?}");
}

#[tokio::test]
async fn test_missing_product_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ja/items/999.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = service_for(&server).get_product("999").await;

    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ja/items/1.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = service_for(&server).get_product("1").await;

    assert!(matches!(result, Err(ServiceError::Transport { .. })));
}

#[tokio::test]
async fn test_product_download_partial_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ja/items/1234567.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json(&server)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/outfit.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK outfit".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/broken.zip"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let detail = service
        .get_product("1234567")
        .await
        .expect("detail request should succeed")
        .expect("product should exist");
    assert_eq!(detail.wish_count, 42);

    let dir = TempDir::new().expect("failed to create temp dir");
    let target = dir.path().join("1234567");
    let outcome = service.download(&detail, &target).await;

    assert_eq!(
        outcome,
        DownloadOutcome {
            successful_downloads: 1,
            failed_downloads: 1
        }
    );
    assert_eq!(std::fs::read(target.join("outfit.zip")).unwrap(), b"PK outfit");
    assert!(!target.join("broken.zip").exists());
}

#[tokio::test]
async fn test_download_links_with_unreachable_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/a.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("alpha"))
        .mount(&server)
        .await;

    let links = vec![
        DownloadLink::new("http://127.0.0.1:9/unreachable", "dead.txt"),
        DownloadLink::new(format!("{}/files/a.txt", server.uri()), "a.txt"),
    ];
    let dir = TempDir::new().expect("failed to create temp dir");

    let outcome = service_for(&server).download_links(&links, dir.path()).await;

    assert_eq!(outcome.total(), 2);
    assert_eq!(outcome.successful_downloads, 1);
    assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "alpha");
}
