//! Integration tests for the cart over HTTP.
//!
//! Each test runs its own storefront with an in-memory session store; the
//! client keeps the session cookie between requests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use suresh_integration_tests::TestServer;
use suresh_storefront::middleware::SESSION_COOKIE_NAME;
use suresh_storefront::{Site, StorefrontConfig};
use tower_sessions::cookie::time::{Duration as CookieDuration, OffsetDateTime};
use tower_sessions::session::{Id, Record};
use tower_sessions::{MemoryStore, SessionStore};

// =============================================================================
// Add / Merge / Remove
// =============================================================================

#[tokio::test]
async fn test_add_then_reload_restores_cart() {
    let server = TestServer::start(Site::Bikes).await;

    assert_eq!(server.add("b1", "Road Bike", "1200").await.status(), StatusCode::OK);
    assert_eq!(server.add("b2", "Helmet", "85").await.status(), StatusCode::OK);

    let cart = server.cart().await;
    let ids: Vec<_> = cart.lines.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["b1", "b2"]);
    assert!(cart.lines.iter().all(|l| l.quantity == 1));
    assert_eq!(cart.item_count, 2);
    assert!((cart.total - 1285.0).abs() < f64::EPSILON);
    assert_eq!(cart.total_display, "$1,285");
}

#[tokio::test]
async fn test_add_response_carries_oob_fragments() {
    let server = TestServer::start(Site::Bikes).await;

    let body = server.add("b2", "Helmet", "85").await.text().await.unwrap_or_default();

    assert!(body.contains(r#"id="cart-body""#));
    assert!(body.contains(r#"id="cart-count""#));
    assert!(body.contains("Helmet added to cart!"));
}

#[tokio::test]
async fn test_repeated_add_merges_and_keeps_first_details() {
    let server = TestServer::start(Site::Bikes).await;

    server.add("b1", "Road Bike", "1200").await;
    server.add("b1", "Renamed Bike", "999").await;

    let cart = server.cart().await;
    assert_eq!(cart.lines.len(), 1);
    let line = &cart.lines[0];
    assert_eq!(line.quantity, 2);
    assert_eq!(line.name, "Road Bike");
    assert!((line.unit_price - 1200.0).abs() < f64::EPSILON);
    assert_eq!(cart.total_display, "$2,400");
}

#[tokio::test]
async fn test_remove_then_add_starts_fresh_line() {
    let server = TestServer::start(Site::Bikes).await;

    server.add("b1", "Road Bike", "1200").await;
    server.add("b1", "Road Bike", "1200").await;
    server.add("b2", "Helmet", "85").await;
    assert_eq!(server.remove("b1").await.status(), StatusCode::OK);

    let cart = server.cart().await;
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].id, "b2");

    server.add("b1", "Road Bike", "1200").await;
    let cart = server.cart().await;
    let ids: Vec<_> = cart.lines.iter().map(|l| (l.id.as_str(), l.quantity)).collect();
    assert_eq!(ids, [("b2", 1), ("b1", 1)]);
}

#[tokio::test]
async fn test_remove_missing_id_is_noop() {
    let server = TestServer::start(Site::Bikes).await;

    server.add("b2", "Helmet", "85").await;
    assert_eq!(server.remove("zz").await.status(), StatusCode::OK);

    assert_eq!(server.cart().await.item_count, 1);
}

#[tokio::test]
async fn test_invalid_price_rejected() {
    let server = TestServer::start(Site::Bikes).await;

    assert_eq!(
        server.add("b1", "Road Bike", "twelve hundred").await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        server.add("b1", "Road Bike", "-5").await.status(),
        StatusCode::BAD_REQUEST
    );
    assert!(server.cart().await.is_empty);
}

#[tokio::test]
async fn test_oversized_price_rejected_without_touching_cart() {
    let server = TestServer::start(Site::Bikes).await;
    let huge = "79228162514264337593543950335";

    for _ in 0..2 {
        assert_eq!(
            server.add("x", "Big", huge).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
    assert!(server.cart().await.is_empty);

    server.add("x", "Big", "1000000").await;
    assert_eq!(server.add("x", "Big", "1").await.status(), StatusCode::OK);
    let cart = server.cart().await;
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.total_display, "$2,000,000");
}

#[tokio::test]
async fn test_overprecise_price_rejected() {
    let server = TestServer::start(Site::Athlete).await;

    assert_eq!(
        server.add("g1", "Gel", "0.12345678901234567891").await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(server.add("g1", "Gel", "0.1234").await.status(), StatusCode::OK);

    let cart = server.cart().await;
    assert!((cart.lines[0].unit_price - 0.1234).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_visitors_have_separate_carts() {
    let server = TestServer::start(Site::Bikes).await;
    server.add("b1", "Road Bike", "1200").await;

    let other = server.new_visitor();
    let body: serde_json::Value = other
        .get(server.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["item_count"], 0);
    assert_eq!(server.cart().await.item_count, 1);
}

// =============================================================================
// Panel and Badge
// =============================================================================

#[tokio::test]
async fn test_panel_open_and_closed() {
    let server = TestServer::start(Site::Bikes).await;
    server.add("m2", "Full Suspension", "3100").await;

    let open = server.get_text("/cart?open=true").await;
    assert!(open.contains("cart-sidebar active"));
    assert!(open.contains("Full Suspension"));
    assert!(open.contains("$3,100 x 1"));

    let closed = server.get_text("/cart?open=false").await;
    assert!(!closed.contains("cart-sidebar active"));
}

#[tokio::test]
async fn test_count_badge() {
    let server = TestServer::start(Site::Bikes).await;
    server.add("b2", "Helmet", "85").await;
    server.add("b2", "Helmet", "85").await;
    server.add("a2", "Bike Lights", "45.50").await;

    let badge = server.get_text("/cart/count").await;
    assert!(badge.contains(">3<"));
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_empty_cart_only_notifies() {
    let server = TestServer::start(Site::Bikes).await;

    let body = server.checkout().await.text().await.unwrap_or_default();

    assert!(body.contains("Your cart is empty!"));
    assert!(!body.contains("load delay:"));
}

#[tokio::test]
async fn test_checkout_clears_after_delay() {
    let server = TestServer::with_checkout_delay(Site::Bikes, Duration::from_millis(100)).await;
    server.add("b1", "Road Bike", "1200").await;

    let body = server.checkout().await.text().await.unwrap_or_default();
    assert!(body.contains("Redirecting to checkout..."));
    assert!(body.contains("load delay:350ms"));

    // Still there until the delay passes
    assert_eq!(server.cart().await.item_count, 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    let cart = server.cart().await;
    assert!(cart.is_empty);
    assert_eq!(cart.total_display, "$0");
}

#[tokio::test]
async fn test_add_during_checkout_delay_cancels_checkout() {
    let server = TestServer::with_checkout_delay(Site::Bikes, Duration::from_millis(200)).await;
    server.add("b1", "Road Bike", "1200").await;
    server.checkout().await;

    server.add("b2", "Helmet", "85").await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let cart = server.cart().await;
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.total_display, "$1,285");
}

#[tokio::test]
async fn test_repeated_checkout_restarts_delay() {
    let server = TestServer::with_checkout_delay(Site::Bikes, Duration::from_millis(300)).await;
    server.add("b1", "Road Bike", "1200").await;

    server.checkout().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    server.checkout().await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // 400ms after the first checkout, but only 200ms after the second
    assert_eq!(server.cart().await.item_count, 1);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(server.cart().await.is_empty);
}

// =============================================================================
// Stored Data
// =============================================================================

async fn seeded_session(sessions: &MemoryStore, key: &str, value: serde_json::Value) -> Id {
    let mut data = HashMap::new();
    data.insert(key.to_owned(), value);
    let mut record = Record {
        id: Id::default(),
        data,
        expiry_date: OffsetDateTime::now_utc() + CookieDuration::days(1),
    };
    sessions.create(&mut record).await.unwrap();
    record.id
}

#[tokio::test]
async fn test_corrupt_stored_cart_starts_empty() {
    let sessions = MemoryStore::default();
    let id = seeded_session(
        &sessions,
        Site::Bikes.storage_key(),
        serde_json::Value::String("{not json".to_owned()),
    )
    .await;
    let server = TestServer::start_with(StorefrontConfig::for_site(Site::Bikes), sessions).await;
    let cookie = format!("{SESSION_COOKIE_NAME}={id}");

    let response = server
        .new_visitor()
        .get(server.url("/api/cart"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(cart["is_empty"], true);

    // The next mutation overwrites the bad value
    let response = server
        .new_visitor()
        .post(server.url("/cart/add"))
        .header(reqwest::header::COOKIE, &cookie)
        .form(&[("id", "b2"), ("name", "Helmet"), ("price", "85")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let record = server.sessions().load(&id).await.unwrap().unwrap();
    let stored = record.data[Site::Bikes.storage_key()].as_str().unwrap().to_owned();
    let parsed: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(parsed[0]["id"], "b2");
    assert_eq!(parsed[0]["quantity"], 1);
}

#[tokio::test]
async fn test_fractional_prices_total_exactly() {
    let server = TestServer::start(Site::Athlete).await;
    server.add("g2", "Team Bottle", "12.99").await;
    server.add("g2", "Team Bottle", "12.99").await;

    let cart = server.cart().await;
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.total_display, "$25.98");
}

#[tokio::test]
async fn test_sites_use_distinct_storage_keys() {
    let sessions = MemoryStore::default();
    let id = seeded_session(
        &sessions,
        Site::Bikes.storage_key(),
        serde_json::Value::String(
            r#"[{"id":"b1","name":"Road Bike","price":1200,"quantity":1}]"#.to_owned(),
        ),
    )
    .await;
    let server = TestServer::start_with(StorefrontConfig::for_site(Site::Athlete), sessions).await;

    let cart: serde_json::Value = server
        .new_visitor()
        .get(server.url("/api/cart"))
        .header(reqwest::header::COOKIE, format!("{SESSION_COOKIE_NAME}={id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(cart["item_count"], 0);
}
