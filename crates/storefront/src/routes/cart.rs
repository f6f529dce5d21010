//! Cart route handlers.
//!
//! Cart buttons post with `hx-swap="none"`; every response carries its
//! updates as out-of-band fragments (cart body, count badge, toast) so the
//! sidebar keeps whatever open state it had.

use std::sync::Arc;
use std::time::Duration;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use suresh_core::CartSummary;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::routes::toast::ToastView;
use crate::services::{SessionCart, TaskKind, complete_checkout};
use crate::state::AppState;

/// Extra wait before the browser refreshes the panel after checkout, so the
/// refresh lands after the server-side clear.
const REFRESH_MARGIN: Duration = Duration::from_millis(250);

/// Cart sidebar display data.
#[derive(Debug, Clone)]
pub struct CartPanelView {
    pub summary: CartSummary,
    pub open: bool,
    /// Render the cart body as an out-of-band swap.
    pub oob: bool,
    /// Ask the browser to refresh the panel (closed) after this many ms.
    pub refresh_after_ms: Option<u64>,
}

impl CartPanelView {
    #[must_use]
    pub const fn new(summary: CartSummary, open: bool) -> Self {
        Self {
            summary,
            open,
            oob: false,
            refresh_after_ms: None,
        }
    }

    /// Body-only update sent alongside other fragments.
    #[must_use]
    pub const fn update(summary: CartSummary) -> Self {
        Self {
            summary,
            open: false,
            oob: true,
            refresh_after_ms: None,
        }
    }

    #[must_use]
    pub fn badge(&self, oob: bool) -> BadgeView {
        BadgeView {
            count: self.summary.item_count,
            oob,
        }
    }
}

/// Cart count badge display data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeView {
    pub count: u64,
    pub oob: bool,
}

/// Add to cart form data, as carried by a product card.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub name: String,
    pub price: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Query for the panel fragment.
#[derive(Debug, Default, Deserialize)]
pub struct PanelQuery {
    pub open: Option<bool>,
}

/// Whole cart panel, swapped in place of `#cart-panel`.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_refresh.html")]
pub struct CartRefreshTemplate {
    pub panel: CartPanelView,
    pub badge: BadgeView,
}

/// Out-of-band cart body, badge and toast.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_update.html")]
pub struct CartUpdateTemplate {
    pub panel: CartPanelView,
    pub badge: BadgeView,
    pub toast: Option<ToastView>,
}

impl CartUpdateTemplate {
    fn new(panel: CartPanelView, toast: Option<ToastView>) -> Self {
        Self {
            badge: panel.badge(true),
            panel,
            toast,
        }
    }
}

/// Cart count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub badge: BadgeView,
}

/// Render the cart panel, open or closed.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PanelQuery>,
) -> Result<CartRefreshTemplate> {
    let cart = SessionCart::open(session, state.site()).await?;
    let panel = CartPanelView::new(cart.render(), query.open.unwrap_or(false));

    Ok(CartRefreshTemplate {
        badge: panel.badge(true),
        panel,
    })
}

/// Cart count badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let cart = SessionCart::open(session, state.site()).await?;
    Ok(CartCountTemplate {
        badge: BadgeView {
            count: cart.render().item_count,
            oob: false,
        },
    })
}

/// Cart summary as JSON.
#[instrument(skip(state, session))]
pub async fn summary(State(state): State<AppState>, session: Session) -> Result<Json<CartSummary>> {
    let cart = SessionCart::open(session, state.site()).await?;
    Ok(Json(cart.render()))
}

/// Add one unit of a product.
#[instrument(skip(state, session), fields(product_id = %form.id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<CartUpdateTemplate> {
    let mut cart = SessionCart::open(session, state.site()).await?;
    let notice = cart
        .store_mut()
        .add_item(form.id.as_str(), &form.name, &form.price)?;
    cancel_pending_checkout(&state, &cart);

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", &form.id)]));
    tracing::info!(product_id = %form.id, "Added to cart");

    let summary = cart.save().await?;
    Ok(CartUpdateTemplate::new(
        CartPanelView::update(summary),
        Some(ToastView::new(&notice, state.config().toast_duration)),
    ))
}

/// Remove a product line entirely.
#[instrument(skip(state, session), fields(product_id = %form.id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<CartUpdateTemplate> {
    let mut cart = SessionCart::open(session, state.site()).await?;
    let removed = cart.store_mut().remove_item(&form.id.as_str().into())?;
    cancel_pending_checkout(&state, &cart);

    tracing::info!(product_id = %form.id, removed, "Removed from cart");

    let summary = cart.save().await?;
    Ok(CartUpdateTemplate::new(CartPanelView::update(summary), None))
}

/// Start checkout.
///
/// An empty cart only gets a notice. Otherwise the visitor sees the redirect
/// notice, and the cart is cleared once the checkout delay has passed; the
/// panel asks to be refreshed (closed) shortly after.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<CartUpdateTemplate> {
    let mut cart = SessionCart::open(session, state.site()).await?;
    let outcome = cart.store().checkout();
    let toast = Some(ToastView::new(outcome.notice(), state.config().toast_duration));

    if !outcome.is_started() {
        return Ok(CartUpdateTemplate::new(
            CartPanelView::update(cart.render()),
            toast,
        ));
    }

    let delay = state.config().checkout_delay;
    let Some(session_id) = cart.session_id() else {
        // A cart that was never saved has no record to clear later.
        cart.store_mut().clear()?;
        let summary = cart.save().await?;
        return Ok(CartUpdateTemplate::new(CartPanelView::update(summary), toast));
    };

    let sessions = Arc::clone(state.sessions());
    let key = state.site().storage_key();
    let task_id = session_id;
    let superseded = state.scheduler().schedule(
        &session_id.to_string(),
        TaskKind::CheckoutCompletion,
        delay,
        async move {
            match complete_checkout(sessions.as_ref(), &task_id, key).await {
                Ok(true) => tracing::info!(key, "Checkout complete, cart cleared"),
                Ok(false) => tracing::debug!(key, "Session gone before checkout completed"),
                Err(e) => tracing::error!(error = %e, key, "Failed to clear cart after checkout"),
            }
        },
    );

    add_breadcrumb("cart", "Checkout started", None);
    tracing::info!(superseded, delay_ms = millis(delay), "Checkout started");

    let mut panel = CartPanelView::update(cart.render());
    panel.refresh_after_ms = Some(millis(delay + REFRESH_MARGIN));
    Ok(CartUpdateTemplate::new(panel, toast))
}

fn cancel_pending_checkout(state: &AppState, cart: &SessionCart) {
    if let Some(id) = cart.session_id()
        && state
            .scheduler()
            .cancel(&id.to_string(), TaskKind::CheckoutCompletion)
    {
        tracing::info!("Cart changed during checkout delay, checkout cancelled");
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
