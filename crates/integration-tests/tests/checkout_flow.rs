//! Integration tests for the checkout flow against a mocked backend.
//!
//! Run with: cargo test -p pasar-integration-tests

#![allow(clippy::unwrap_used)]

use pasar_core::{AddressId, PaymentMethod, Rupiah};
use pasar_integration_tests::{
    address_body, cart_body, mock_url, quotes_body, storefront_client,
};
use pasar_storefront::api::{ApiClient, ApiError, ProofFile};
use pasar_storefront::checkout::{
    CheckoutController, GENERIC_FAILURE_MESSAGE, InitOutcome, PaymentOutcome, PaymentWidget,
    SnapWidget, SubmitBlocker, SubmitOutcome,
};
use pasar_storefront::config::{PaymentConfig, ShippingConfig};
use pasar_storefront::navigation::Destination;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CART: &str = "/api/v1/cart/index";
const ADDRESSES: &str = "/api/v1/addresses";
const QUOTES: &str = "/api/v1/rajaongkir/calculate";
const CHECKOUT: &str = "/api/v1/checkout/manual";
const SNAP_SCRIPT: &str = "/snap/snap.js";

fn widget(server: &MockServer) -> SnapWidget {
    let config = PaymentConfig {
        snap_script_url: mock_url(server, SNAP_SCRIPT),
        redirect_base_url: mock_url(server, "/snap/v4/redirection"),
        ..PaymentConfig::default()
    };
    SnapWidget::new(&config).unwrap()
}

fn controller(server: &MockServer) -> CheckoutController<ApiClient, SnapWidget> {
    CheckoutController::new(
        storefront_client(server),
        widget(server),
        &ShippingConfig::default(),
    )
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_snap_script(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(SNAP_SCRIPT))
        .respond_with(ResponseTemplate::new(200).set_body_string("window.snap = {};"))
        .mount(server)
        .await;
}

/// Cart of two units at 100000 weighing 1 each, one primary address in D1.
async fn mount_storefront(server: &MockServer) {
    mount_json(server, CART, cart_body(&[("c-1", "Batik Shirt", 100_000, 2, 1)])).await;
    mount_json(
        server,
        ADDRESSES,
        json!([
            address_body("a-1", "D0", false),
            address_body("a-2", "D1", true),
        ]),
    )
    .await;
    mount_snap_script(server).await;
}

async fn posted_bodies(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == CHECKOUT)
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect()
}

// ============================================================================
// Initialization Tests
// ============================================================================

#[tokio::test]
async fn test_initialize_quotes_primary_address_and_totals() {
    let server = MockServer::start().await;
    mount_storefront(&server).await;

    Mock::given(method("GET"))
        .and(path(QUOTES))
        .and(query_param("shipper_destination_id", "501"))
        .and(query_param("receiver_destination_id", "D1"))
        .and(query_param("weight", "2"))
        .and(query_param("item_value", "200000"))
        .and(query_param("cod", "false"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(quotes_body(&[("JNE", "REG", 15_000), ("JNE", "YES", 30_000)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut checkout = controller(&server);
    assert!(matches!(checkout.initialize().await, InitOutcome::Ready));

    let session = checkout.session();
    assert_eq!(session.selected_address_id(), Some(&AddressId::new("a-2")));
    assert_eq!(session.form().city, "Bandung");
    assert_eq!(session.quotes().len(), 2);
    assert!(checkout.widget().is_ready());

    checkout.select_quote("JNE", "REG").unwrap();
    let session = checkout.session();
    assert_eq!(session.subtotal(), Rupiah::from_whole(200_000));
    assert_eq!(session.shipping_cost(), Rupiah::from_whole(15_000));
    assert_eq!(session.grand_total(), Rupiah::from_whole(215_000));
}

#[tokio::test]
async fn test_initialize_unauthorized_redirects_to_login() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CART))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .expect(1)
        .mount(&server)
        .await;
    for route in [ADDRESSES, QUOTES, SNAP_SCRIPT] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }

    let mut checkout = controller(&server);
    let outcome = checkout.initialize().await;

    assert!(matches!(outcome, InitOutcome::Redirect(Destination::Login)));
    assert!(checkout.session().cart().is_empty());
    assert!(checkout.session().addresses().is_empty());
    assert!(!checkout.widget().is_ready());
}

#[tokio::test]
async fn test_initialize_survives_address_failure() {
    let server = MockServer::start().await;
    mount_json(&server, CART, cart_body(&[("c-1", "Batik Shirt", 100_000, 1, 1)])).await;
    mount_snap_script(&server).await;
    Mock::given(method("GET"))
        .and(path(ADDRESSES))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(QUOTES))
        .respond_with(ResponseTemplate::new(200).set_body_json(quotes_body(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let mut checkout = controller(&server);
    assert!(matches!(checkout.initialize().await, InitOutcome::Ready));
    assert_eq!(checkout.session().cart().len(), 1);
    assert!(checkout.session().selected_address().is_none());
}

#[tokio::test]
async fn test_initialize_survives_quote_failure() {
    let server = MockServer::start().await;
    mount_storefront(&server).await;
    Mock::given(method("GET"))
        .and(path(QUOTES))
        .respond_with(ResponseTemplate::new(500).set_body_string("courier down"))
        .expect(1)
        .mount(&server)
        .await;

    let mut checkout = controller(&server);
    assert!(matches!(checkout.initialize().await, InitOutcome::Ready));
    assert!(checkout.session().quotes().is_empty());

    let outcome = checkout.submit().await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Blocked(SubmitBlocker::NoShippingOption)
    ));
    assert!(posted_bodies(&server).await.is_empty());
}

// ============================================================================
// Address Change Tests
// ============================================================================

#[tokio::test]
async fn test_address_change_requests_fresh_quotes() {
    let server = MockServer::start().await;
    mount_storefront(&server).await;

    Mock::given(method("GET"))
        .and(path(QUOTES))
        .and(query_param("receiver_destination_id", "D1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quotes_body(&[("JNE", "REG", 15_000)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(QUOTES))
        .and(query_param("receiver_destination_id", "D0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quotes_body(&[("SICEPAT", "BEST", 22_000)])))
        .expect(1)
        .mount(&server)
        .await;

    let mut checkout = controller(&server);
    checkout.initialize().await;
    checkout.select_quote("JNE", "REG").unwrap();

    checkout.select_address(&AddressId::new("a-1")).await.unwrap();

    let session = checkout.session();
    assert!(session.selected_quote().is_none());
    assert_eq!(session.grand_total(), Rupiah::from_whole(200_000));
    assert!(session.quotes().find("JNE", "REG").is_none());
    assert!(session.quotes().find("SICEPAT", "BEST").is_some());
}

// ============================================================================
// Submission Tests
// ============================================================================

async fn ready_checkout(server: &MockServer) -> CheckoutController<ApiClient, SnapWidget> {
    mount_storefront(server).await;
    mount_json(server, QUOTES, quotes_body(&[("JNE", "REG", 15_000)])).await;

    let mut checkout = controller(server);
    checkout.initialize().await;
    checkout.select_quote("JNE", "REG").unwrap();
    checkout
}

#[tokio::test]
async fn test_manual_submission_without_proof_is_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHECKOUT))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut checkout = ready_checkout(&server).await;
    checkout.select_payment_method(PaymentMethod::Manual);

    let outcome = checkout.submit().await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Blocked(SubmitBlocker::MissingProof)
    ));
    assert!(outcome.user_message().is_some());
}

#[tokio::test]
async fn test_manual_submission_posts_multipart_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHECKOUT))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "Order created"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut checkout = ready_checkout(&server).await;
    checkout.select_payment_method(PaymentMethod::Manual);
    checkout
        .attach_proof(ProofFile::new("transfer.jpg", "image/jpeg", b"jpeg-bytes".to_vec()))
        .unwrap();

    let outcome = checkout.submit().await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Redirect(Destination::OrderHistory)
    ));

    let bodies = posted_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert!(body.contains("name=\"paymentProof\"; filename=\"transfer.jpg\""));
    assert!(body.contains("jpeg-bytes"));
    assert!(body.contains("name=\"paymentMethod\""));
    assert!(body.contains("manual"));
    assert!(body.contains("name=\"shippingOptions\""));
    assert!(body.contains("\"shippingName\":\"JNE\""));
    assert!(body.contains("\"grandTotal\":15000"));
    assert!(!body.contains("15000.0"));
    assert!(body.contains("name=\"cartItems\""));
    assert!(body.contains("Batik Shirt"));
    assert!(body.contains("\"productId\":\"p-c-1\""));
    assert!(body.contains("\"cartId\":\"cart-1\""));
    assert!(body.contains("\"storeId\":\"s-1\""));
    assert!(body.contains("\"weight\":1"));
    assert!(body.contains("name=\"address\""));
    assert!(body.contains("\"destinationId\":\"D1\""));
}

#[tokio::test]
async fn test_hosted_submission_hands_token_to_widget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHECKOUT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Order created",
            "data": { "midtransTransaction": { "token": "snap-token-1" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut checkout = ready_checkout(&server).await;
    let outcome = checkout.submit().await;

    let SubmitOutcome::Payment { token, outcome } = outcome else {
        panic!("expected a hosted payment, got {outcome:?}");
    };
    assert_eq!(token.as_str(), "snap-token-1");
    assert!(matches!(outcome, PaymentOutcome::Pending(_)));
    assert!(checkout.session().last_payment_outcome().is_some());
    assert_eq!(
        checkout.widget().payment_url(&token).path(),
        "/snap/v4/redirection/snap-token-1"
    );

    let bodies = posted_bodies(&server).await;
    assert!(!bodies[0].contains("name=\"paymentProof\""));
    assert!(bodies[0].contains("epayment"));
}

#[tokio::test]
async fn test_hosted_submission_without_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHECKOUT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let mut checkout = ready_checkout(&server).await;
    let outcome = checkout.submit().await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(ApiError::MissingField(_))
    ));
    assert!(checkout.session().last_payment_outcome().is_none());
}

#[tokio::test]
async fn test_rejected_submission_keeps_selections() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHECKOUT))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Stock changed"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut checkout = ready_checkout(&server).await;
    let outcome = checkout.submit().await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(ApiError::Api { status: 500, .. })
    ));
    assert_eq!(outcome.user_message(), Some(GENERIC_FAILURE_MESSAGE));

    let session = checkout.session();
    assert_eq!(session.cart().len(), 1);
    assert_eq!(session.selected_address_id(), Some(&AddressId::new("a-2")));
    assert_eq!(session.selected_quote().unwrap().service_name, "REG");
    assert_eq!(session.grand_total(), Rupiah::from_whole(215_000));
}

#[tokio::test]
async fn test_hosted_submission_waits_for_widget() {
    let server = MockServer::start().await;
    mount_json(&server, CART, cart_body(&[("c-1", "Batik Shirt", 100_000, 2, 1)])).await;
    mount_json(&server, ADDRESSES, json!([address_body("a-2", "D1", true)])).await;
    mount_json(&server, QUOTES, quotes_body(&[("JNE", "REG", 15_000)])).await;
    Mock::given(method("GET"))
        .and(path(SNAP_SCRIPT))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHECKOUT))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut checkout = controller(&server);
    checkout.initialize().await;
    checkout.select_quote("JNE", "REG").unwrap();

    assert!(!checkout.widget().is_ready());
    assert!(matches!(
        checkout.submit().await,
        SubmitOutcome::Blocked(SubmitBlocker::WidgetNotReady)
    ));
}
