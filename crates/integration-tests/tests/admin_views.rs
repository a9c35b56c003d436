//! Integration tests for the store-admin views against a mocked backend.
//!
//! Run with: cargo test -p pasar-integration-tests

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use pasar_admin::api::AdminApiError;
use pasar_admin::dashboard::DashboardSummary;
use pasar_admin::error::{AdminError, FilterError};
use pasar_admin::inventory::{HistoryFilter, InventoryHistory};
use pasar_admin::store::load_store;
use pasar_core::{InventoryAction, ProductId, Rupiah, StoreId};
use pasar_integration_tests::{ADMIN_COOKIE, admin_client};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE: &str = "/api/v1/auth/profile";
const INVENTORY: &str = "/api/v1/inventory";
const HISTORY: &str = "/api/v1/inventory/history";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn journal(id: &str, product: &str, quantity: Value, action: &str) -> Value {
    json!({
        "id": id,
        "storeId": "s-1",
        "productId": product,
        "quantity": quantity,
        "action": action,
        "createdAt": "2025-06-10T08:30:00.000Z",
        "Product": {
            "id": product,
            "name": format!("Product {product}"),
            "price": 85000,
            "imagePreview": []
        },
        "User": {
            "id": "u-1",
            "firstName": "Budi",
            "lastName": "Santoso",
            "email": "budi@pasar.test",
            "role": "STORE_ADMIN"
        }
    })
}

async fn mount_profile(server: &MockServer, stores: Value) {
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("cookie", ADMIN_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": "u-1", "Store": stores }
        })))
        .mount(server)
        .await;
}

async fn mount_inventory(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(INVENTORY))
        .and(query_param("storeId", "s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                journal("j-1", "p-1", json!(10), "ADD"),
                journal("j-2", "p-2", json!(4), "ADD"),
                journal("j-3", "p-1", json!(-1), "SALE"),
            ]
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Inventory History Tests
// ============================================================================

#[tokio::test]
async fn test_history_sends_filters_and_loads_entries() {
    let server = MockServer::start().await;
    mount_profile(&server, json!([{ "id": "s-1", "name": "Toko Bandung" }])).await;
    mount_inventory(&server).await;

    Mock::given(method("GET"))
        .and(path(HISTORY))
        .and(query_param("action", "SALE"))
        .and(query_param("productId", "p-1"))
        .and(query_param("startDate", "2025-06-01"))
        .and(query_param("endDate", "2025-06-30"))
        .and(query_param_is_missing("storeId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Inventory history retrieved",
            "data": [journal("j-3", "p-1", json!("-3"), "SALE")],
            "pagination": {
                "currentPage": 1,
                "totalPages": 1,
                "totalItems": 1,
                "itemsPerPage": 10,
                "hasNextPage": false,
                "hasPrevPage": false
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = HistoryFilter {
        action: Some(InventoryAction::Sale),
        product: Some(ProductId::new("p-1")),
        start_date: Some(date(2025, 6, 1)),
        end_date: Some(date(2025, 6, 30)),
    };
    let view = InventoryHistory::load(&admin_client(&server), filter)
        .await
        .unwrap();

    assert_eq!(view.store.name, "Toko Bandung");
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].quantity, -3);
    assert_eq!(view.entries[0].user.as_ref().unwrap().full_name(), "Budi Santoso");
    assert_eq!(view.pagination.unwrap().total_items, 1);

    let product_ids: Vec<&str> = view.products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(product_ids, ["p-1", "p-2"]);

    assert_eq!(
        view.summary().unwrap(),
        "Showing 1 inventory transaction for Toko Bandung with action: SALE \
         for selected product within date range"
    );
}

#[tokio::test]
async fn test_history_without_store_is_refused() {
    let server = MockServer::start().await;
    mount_profile(&server, json!([])).await;
    Mock::given(method("GET"))
        .and(path(HISTORY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let result = InventoryHistory::load(&admin_client(&server), HistoryFilter::default()).await;

    assert!(matches!(result, Err(AdminError::NoStoreAssigned)));
}

#[tokio::test]
async fn test_reversed_date_range_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let filter = HistoryFilter {
        start_date: Some(date(2025, 6, 30)),
        end_date: Some(date(2025, 6, 1)),
        ..HistoryFilter::default()
    };
    let result = InventoryHistory::load(&admin_client(&server), filter).await;

    assert!(matches!(
        result,
        Err(AdminError::InvalidFilter(FilterError::EndBeforeStart { .. }))
    ));
}

#[tokio::test]
async fn test_history_survives_product_options_failure() {
    let server = MockServer::start().await;
    mount_profile(&server, json!([{ "id": "s-1", "name": "Toko Bandung" }])).await;
    Mock::given(method("GET"))
        .and(path(INVENTORY))
        .respond_with(ResponseTemplate::new(500).set_body_string("inventory down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(HISTORY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let view = InventoryHistory::load(&admin_client(&server), HistoryFilter::default())
        .await
        .unwrap();

    assert!(view.products.is_empty());
    assert!(view.entries.is_empty());
    assert!(view.summary().is_none());
    assert_eq!(view.empty_message(), "No inventory changes have been made yet");
}

#[tokio::test]
async fn test_profile_is_cached_between_loads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "Store": [{ "id": "s-1", "name": "Toko Bandung" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_inventory(&server).await;
    Mock::given(method("GET"))
        .and(path(HISTORY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(2)
        .mount(&server)
        .await;

    let client = admin_client(&server);
    InventoryHistory::load(&client, HistoryFilter::default())
        .await
        .unwrap();
    let filter = HistoryFilter {
        action: Some(InventoryAction::Restock),
        ..HistoryFilter::default()
    };
    let view = InventoryHistory::load(&client, filter).await.unwrap();

    assert_eq!(view.empty_message(), "Try adjusting your filters");
}

#[tokio::test]
async fn test_expired_session_surfaces_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = InventoryHistory::load(&admin_client(&server), HistoryFilter::default()).await;

    assert!(matches!(
        result,
        Err(AdminError::Api(AdminApiError::Unauthorized(401)))
    ));
}

// ============================================================================
// Store & Dashboard Tests
// ============================================================================

#[tokio::test]
async fn test_store_detail_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/stores/s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "s-1",
                "name": "Toko Bandung",
                "address": "Jl. Braga 5",
                "city": "Bandung",
                "province": "Jawa Barat",
                "postalCode": "40111",
                "StoreProduct": [
                    {
                        "productId": "p-1",
                        "storeId": "s-1",
                        "stock": 12,
                        "Product": {
                            "id": "p-1",
                            "name": "Kopi Gayo 250g",
                            "price": 85000,
                            "weight": 0.25
                        }
                    },
                    {
                        "productId": "p-2",
                        "storeId": "s-1",
                        "stock": 3,
                        "Product": {
                            "id": "p-2",
                            "name": "Teh Melati",
                            "price": 20000,
                            "weight": 0.1
                        }
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = admin_client(&server);
    let id = StoreId::new("s-1");
    let first = load_store(&client, &id).await.unwrap();
    let second = load_store(&client, &id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.full_address(), "Jl. Braga 5, Bandung, Jawa Barat, 40111");
    assert_eq!(first.total_stock(), 15);
}

#[tokio::test]
async fn test_unknown_store_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/stores/s-404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/stores/s-null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .expect(2)
        .mount(&server)
        .await;

    let client = admin_client(&server);

    assert!(matches!(
        load_store(&client, &StoreId::new("s-404")).await,
        Err(AdminError::StoreNotFound(id)) if id.as_str() == "s-404"
    ));
    // Misses are not cached
    for _ in 0..2 {
        assert!(matches!(
            load_store(&client, &StoreId::new("s-null")).await,
            Err(AdminError::StoreNotFound(_))
        ));
    }
}

#[tokio::test]
async fn test_dashboard_lists_enveloped_products() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "p-1", "name": "Kopi Gayo 250g", "price": 85000 },
                { "id": "p-2", "name": "Teh Melati", "price": 20000 },
                { "id": "p-3", "name": "Gula Aren", "price": 30000 },
                { "id": "p-4" }
            ]
        })))
        .mount(&server)
        .await;

    let summary = DashboardSummary::load(&admin_client(&server)).await.unwrap();

    assert_eq!(summary.product_count, 4);
    let names: Vec<&str> = summary.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Kopi Gayo 250g", "Teh Melati", "Gula Aren"]);
    assert_eq!(summary.products[0].price, Rupiah::from_whole(85_000));
}
