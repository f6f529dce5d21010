//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (catalog, cart sidebar, forms)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (session database)
//!
//! # Products
//! GET  /products?category=     - Filtered product grid fragment (HTMX)
//!
//! # Cart (HTMX fragments)
//! GET  /cart?open=             - Cart sidebar, open or closed
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add one unit (id, name, price)
//! POST /cart/remove            - Remove a line (id)
//! POST /checkout               - Start checkout; clears the cart after a delay
//! GET  /api/cart               - Cart summary as JSON
//!
//! # Forms
//! POST /newsletter             - Newsletter signup (confirmation only)
//! POST /contact                - Contact message (confirmation only)
//! ```

pub mod cart;
pub mod contact;
pub mod home;
pub mod newsletter;
pub mod products;
pub mod toast;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::SessionStore;

use crate::config::StorefrontConfig;
use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all page and fragment routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products", get(products::index))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .route("/api/cart", get(cart::summary))
        .route("/newsletter", post(newsletter::subscribe))
        .route("/contact", post(contact::submit))
}

/// Build the full application over a session store.
///
/// `pool` is the database behind `store`, if any; readiness checks it.
pub fn app<S>(config: StorefrontConfig, store: S, pool: Option<SqlitePool>) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(store.clone(), &config);
    let state = AppState::new(config, Arc::new(store), pool);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir()))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

fn static_dir() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/static")
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the session database is reachable, when there is one.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
