//! Product grid and category filtering.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::site::{ALL_CATEGORIES, Product, Site};
use crate::state::AppState;

/// One filter button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Product section display data: filter buttons and the matching cards.
#[derive(Debug, Clone)]
pub struct ProductGridView {
    pub filters: Vec<FilterButton>,
    pub products: Vec<Product>,
}

impl ProductGridView {
    /// Grid for `site` filtered by `category` (`None` shows everything).
    #[must_use]
    pub fn new(site: Site, category: Option<&str>) -> Self {
        let active = category.map_or(ALL_CATEGORIES, str::trim);
        Self {
            filters: site
                .categories()
                .iter()
                .map(|&(value, label)| FilterButton {
                    value,
                    label,
                    active: value == active,
                })
                .collect(),
            products: site.filter(Some(active)),
        }
    }
}

/// Product listing query.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

/// Product grid fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: ProductGridView,
}

/// Filter the product grid.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ProductGridTemplate {
    let grid = ProductGridView::new(state.site(), query.category.as_deref());
    tracing::debug!(shown = grid.products.len(), "Filtered products");
    ProductGridTemplate { grid }
}
