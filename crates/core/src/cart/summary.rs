//! Display projection of a cart.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{Cart, LineItem};
use crate::types::{ProductId, format_usd};

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineView {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// e.g. `"$1,200"`
    pub unit_price_display: String,
    /// e.g. `"$2,400"`
    pub line_total_display: String,
}

impl From<&LineItem> for LineView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            unit_price_display: format_usd(item.unit_price),
            line_total_display: format_usd(item.line_total()),
        }
    }
}

/// Everything the cart panel and badge need, derived fresh from state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub lines: Vec<LineView>,
    pub item_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub total_display: String,
    pub is_empty: bool,
}

impl CartSummary {
    /// Summary of an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        let total = cart.total();
        Self {
            lines: cart.items().iter().map(LineView::from).collect(),
            item_count: cart.item_count(),
            total,
            total_display: format_usd(total),
            is_empty: cart.is_empty(),
        }
    }
}
