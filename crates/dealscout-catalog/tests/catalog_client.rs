//! Integration tests for `CatalogClient` and the aggregator using wiremock HTTP mocks.

use std::time::Duration;

use dealscout_catalog::{
    normalize_listings, AggregatorConfig, CatalogClient, CatalogError, DealerStatusProbe,
    InventoryAggregator, InventoryQuery, Retrieval,
};
use dealscout_core::{DealerStatus, ResolvedDealer};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INVENTORY_PATH: &str = "/v2/car/dealer/inventory/active";

fn test_client(server: &MockServer) -> CatalogClient {
    CatalogClient::with_base_url(
        "test-key",
        30,
        "dealscout-test",
        &format!("{}{INVENTORY_PATH}", server.uri()),
    )
    .expect("client construction should not fail")
}

fn dealer() -> ResolvedDealer {
    ResolvedDealer {
        name: "Lakeside Auto".to_owned(),
        website: "lakesideauto.com".to_owned(),
    }
}

fn listing(n: u32) -> serde_json::Value {
    serde_json::json!({
        "id": format!("lst-{n}"),
        "vin": format!("VIN{n:014}"),
        "heading": format!("2019 Toyota Camry #{n}"),
        "price": 20_000 + n,
        "miles": 30_000,
        "vdp_url": format!("https://lakesideauto.com/v/{n}"),
        "media": { "photo_links": [format!("https://cdn.test/{n}.jpg")] },
        "build": { "year": 2019, "make": "Toyota", "model": "Camry", "trim": "SE" },
        "body_type": "Sedan"
    })
}

#[tokio::test]
async fn fetch_inventory_sends_expected_query_and_parses_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INVENTORY_PATH))
        .and(query_param("api_key", "test-key"))
        .and(query_param("source", "lakesideauto.com"))
        .and(query_param("car_type", "used"))
        .and(query_param("rows", "50"))
        .and(query_param("start", "0"))
        .and(query_param("include_non_vin_listings", "true"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "num_found": 2,
            "listings": [listing(1), listing(2)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client
        .fetch_inventory(&InventoryQuery::page("lakesideauto.com", 50, 0))
        .await
        .expect("should parse page");

    assert_eq!(page.total_found, 2);
    assert_eq!(page.listings.len(), 2);
    assert_eq!(page.listings[0].id.as_deref(), Some("lst-1"));
    assert!(page.url.contains("api_key=REDACTED"), "{}", page.url);
    assert!(!page.url.contains("test-key"), "{}", page.url);
}

#[tokio::test]
async fn non_success_status_surfaces_api_message_and_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INVENTORY_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Invalid API key" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .fetch_inventory(&InventoryQuery::page("lakesideauto.com", 50, 0))
        .await
        .expect_err("401 should fail");

    match &err {
        CatalogError::RequestFailed { status, detail, url } => {
            assert_eq!(*status, 401);
            assert_eq!(detail, "Invalid API key");
            assert!(url.contains("source=lakesideauto.com"), "{url}");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.starts_with("API Request Failed: Invalid API key"), "{message}");
    assert!(message.contains("URL Used: "), "{message}");
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INVENTORY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .fetch_inventory(&InventoryQuery::count_only("lakesideauto.com"))
        .await
        .expect_err("html body should fail");

    assert!(matches!(err, CatalogError::Deserialize { .. }), "{err:?}");
}

#[tokio::test]
async fn aggregator_walks_pages_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INVENTORY_PATH))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "num_found": 3,
            "listings": [listing(1), listing(2)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(INVENTORY_PATH))
        .and(query_param("start", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "num_found": 3,
            "listings": [listing(3)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let aggregator = InventoryAggregator::new(
        test_client(&server),
        AggregatorConfig {
            page_size: 2,
            max_pages: 10,
            inter_page_delay: Duration::ZERO,
        },
    );

    let Retrieval::Listings {
        listings,
        pages_requested,
        ..
    } = aggregator.retrieve(&dealer()).await.expect("retrieval")
    else {
        panic!("expected listings");
    };

    assert_eq!(pages_requested, 2);
    let vehicles = normalize_listings(&listings);
    let ids: Vec<&str> = vehicles.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["lst-1", "lst-2", "lst-3"]);
    assert_eq!(vehicles[2].est_monthly_payment, 333);
}

#[tokio::test]
async fn aggregator_reports_no_inventory_with_redacted_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INVENTORY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "num_found": 0,
            "listings": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let aggregator = InventoryAggregator::new(test_client(&server), AggregatorConfig::default());
    let result = aggregator.retrieve(&dealer()).await.expect("retrieval");

    let Retrieval::NoInventory(info) = result else {
        panic!("expected no-inventory outcome");
    };
    assert_eq!(
        info.query_url,
        format!(
            "{}{INVENTORY_PATH}?api_key=REDACTED&source=lakesideauto.com&car_type=used&rows=50&start=0&include_non_vin_listings=true",
            server.uri()
        )
    );
}

#[tokio::test]
async fn status_probe_uses_zero_row_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INVENTORY_PATH))
        .and(query_param("source", "lakesideauto.com"))
        .and(query_param("rows", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "num_found": 41
        })))
        .expect(1)
        .mount(&server)
        .await;

    let probe = DealerStatusProbe::new(test_client(&server));
    assert_eq!(probe.check("lakesideauto.com").await, DealerStatus::Online);
}

#[tokio::test]
async fn status_probe_maps_server_error_to_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INVENTORY_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let probe = DealerStatusProbe::new(test_client(&server));
    assert_eq!(probe.check("lakesideauto.com").await, DealerStatus::Error);
}
