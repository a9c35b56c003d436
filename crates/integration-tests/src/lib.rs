//! Integration tests for Pasar.
//!
//! The tests drive the storefront and store-admin clients against a
//! `wiremock` server standing in for the backend, so no running services
//! are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pasar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Checkout initialization, quotes and submission
//! - `product_page` - Add to cart and buy now
//! - `admin_views` - Inventory history and store lookups
//!
//! Shared fixtures live here so each test file stays focused on behavior.

use pasar_admin::api::AdminClient;
use pasar_admin::config::AdminConfig;
use pasar_storefront::api::ApiClient;
use pasar_storefront::config::ApiConfig;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

/// Session cookie sent by the admin client in tests.
pub const ADMIN_COOKIE: &str = "session=integration-admin";

fn server_url(server: &MockServer) -> Url {
    Url::parse(&server.uri()).unwrap_or_else(|e| panic!("mock server URI is invalid: {e}"))
}

/// A storefront client pointed at the mock server.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn storefront_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig::new(server_url(server)))
        .unwrap_or_else(|e| panic!("failed to build storefront client: {e}"))
}

/// An admin client pointed at the mock server.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn admin_client(server: &MockServer) -> AdminClient {
    let config = AdminConfig::new(server_url(server), SecretString::from(ADMIN_COOKIE));
    AdminClient::new(&config).unwrap_or_else(|e| panic!("failed to build admin client: {e}"))
}

/// A mock-server URL for `path`.
///
/// # Panics
///
/// Panics if the path does not form a valid URL.
#[must_use]
pub fn mock_url(server: &MockServer, path: &str) -> Url {
    server_url(server)
        .join(path)
        .unwrap_or_else(|e| panic!("invalid mock path {path}: {e}"))
}

// =============================================================================
// Backend Payloads
// =============================================================================

/// Cart response with one line per `(id, title, price, quantity, weight)`.
#[must_use]
pub fn cart_body(lines: &[(&str, &str, i64, u32, i64)]) -> Value {
    let data: Vec<Value> = lines
        .iter()
        .map(|(id, title, price, quantity, weight)| {
            json!({
                "id": id,
                "quantity": quantity,
                "cartId": "cart-1",
                "productId": format!("p-{id}"),
                "Product": {
                    "id": format!("p-{id}"),
                    "storeId": "s-1",
                    "title": title,
                    "price": price,
                    "weight": weight,
                    "imagePreview": [{ "imageUrl": format!("https://cdn.test/{id}.jpg") }]
                }
            })
        })
        .collect();
    json!({ "data": data })
}

/// A saved address record.
#[must_use]
pub fn address_body(id: &str, destination_id: &str, is_primary: bool) -> Value {
    json!({
        "id": id,
        "recipient": "Siti Rahma",
        "isPrimary": is_primary,
        "Address": {
            "address": "Jl. Merdeka 10",
            "city": "Bandung",
            "province": "Jawa Barat",
            "postalCode": "40111",
            "destinationId": destination_id
        }
    })
}

/// Shipping quote response grouped by delivery type.
#[must_use]
pub fn quotes_body(quotes: &[(&str, &str, i64)]) -> Value {
    let regular: Vec<Value> = quotes
        .iter()
        .map(|(carrier, service, total)| {
            json!({
                "shipping_name": carrier,
                "service_name": service,
                "grandtotal": total,
                "etd": "2-3 day"
            })
        })
        .collect();
    json!({ "data": { "calculate_reguler": regular } })
}
