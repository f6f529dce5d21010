//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::routes::cart::{BadgeView, CartPanelView};
use crate::routes::contact::ContactView;
use crate::routes::newsletter::NewsletterView;
use crate::routes::products::ProductGridView;
use crate::services::SessionCart;
use crate::site::Site;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub site: Site,
    pub grid: ProductGridView,
    pub panel: CartPanelView,
    pub badge: BadgeView,
    pub newsletter: NewsletterView,
    pub contact: ContactView,
}

/// Display the home page with the visitor's cart restored.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let site = state.site();
    let cart = SessionCart::open(session, site).await?;
    let panel = CartPanelView::new(cart.render(), false);

    Ok(HomeTemplate {
        site,
        grid: ProductGridView::new(site, None),
        badge: panel.badge(false),
        panel,
        newsletter: NewsletterView::default(),
        contact: ContactView::default(),
    })
}
