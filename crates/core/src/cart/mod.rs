//! Shopping cart state.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s keyed by product id:
//! insertion order is display order, repeated adds merge into one line, and
//! no line is ever stored with a quantity of zero.
//!
//! - [`summary`] - pure projection of a cart into display data
//! - [`storage`] - the durable key-value slot a cart is mirrored into
//! - [`store`] - the store tying cart state and storage together

pub mod storage;
pub mod store;
pub mod summary;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, PriceError, ProductId};

pub use storage::{DurableStorage, MemoryStorage, StorageError};
pub use store::{CHECKOUT_DELAY, CartStore, Checkout, LoadOutcome, StoreError};
pub use summary::{CartSummary, LineView};

/// Errors raised when a cart invariant would be broken.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// A line item's price could not be parsed or is out of bounds.
    #[error("invalid price for {id}: {source}")]
    InvalidPrice {
        id: ProductId,
        #[source]
        source: PriceError,
    },
    /// Two line items share the same product id.
    #[error("duplicate line item: {0}")]
    DuplicateItem(ProductId),
    /// A line item has a quantity of zero.
    #[error("line item {0} has zero quantity")]
    ZeroQuantity(ProductId),
    /// Incrementing the quantity would overflow.
    #[error("quantity overflow for {0}")]
    QuantityOverflow(ProductId),
    /// The cart total would no longer be representable.
    #[error("cart total overflow adding {0}")]
    TotalOverflow(ProductId),
}

/// One product entry in the cart.
///
/// Serialized as `{"id", "name", "price": number, "quantity": integer}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    /// A fresh line with quantity 1.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity: 1,
        }
    }

    /// `unit_price × quantity`, or `None` on overflow.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    /// `unit_price × quantity`.
    ///
    /// Lines held by a [`Cart`] never overflow; a detached line that does
    /// saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }
}

fn checked_total(items: &[LineItem]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        total.checked_add(item.checked_line_total()?)
    })
}

/// Ordered line items with at most one entry per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from stored items, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids, zero quantities, prices out of
    /// bounds, or a total that overflows.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut total = Decimal::ZERO;
        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartError::ZeroQuantity(item.id.clone()));
            }
            Price::new(item.unit_price).map_err(|source| CartError::InvalidPrice {
                id: item.id.clone(),
                source,
            })?;
            if items.iter().take(index).any(|earlier| earlier.id == item.id) {
                return Err(CartError::DuplicateItem(item.id.clone()));
            }
            total = item
                .checked_line_total()
                .and_then(|line_total| total.checked_add(line_total))
                .ok_or_else(|| CartError::TotalOverflow(item.id.clone()))?;
        }
        Ok(Self { items })
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Add one unit of a product and return the line's new quantity.
    ///
    /// An existing line has its quantity incremented and keeps its original
    /// name and price. Otherwise a new line with quantity 1 is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the quantity is saturated,
    /// [`CartError::InvalidPrice`] for a new line whose price is out of
    /// bounds, or [`CartError::TotalOverflow`] if the total would overflow.
    /// The cart is unchanged on error.
    pub fn add(
        &mut self,
        id: ProductId,
        name: &str,
        unit_price: Decimal,
    ) -> Result<u32, CartError> {
        let total = self.total();

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            let quantity = item
                .quantity
                .checked_add(1)
                .ok_or_else(|| CartError::QuantityOverflow(id.clone()))?;
            total
                .checked_add(item.unit_price)
                .ok_or(CartError::TotalOverflow(id))?;
            item.quantity = quantity;
            return Ok(quantity);
        }

        let price = Price::new(unit_price).map_err(|source| CartError::InvalidPrice {
            id: id.clone(),
            source,
        })?;
        total
            .checked_add(price.amount())
            .ok_or_else(|| CartError::TotalOverflow(id.clone()))?;
        self.items.push(LineItem::new(id, name, price.amount()));
        Ok(1)
    }

    /// Drop the line for a product entirely. Returns the removed line, if any.
    pub fn remove(&mut self, id: &ProductId) -> Option<LineItem> {
        let position = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(position))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `unit_price × quantity` across all lines.
    ///
    /// [`Cart::add`] and [`Cart::from_items`] refuse any change that would
    /// make this overflow.
    #[must_use]
    pub fn total(&self) -> Decimal {
        checked_total(&self.items).unwrap_or(Decimal::MAX)
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let mut cart = Cart::new();
        cart.add("b2".into(), "Helmet", d("85")).unwrap();
        cart.add("b1".into(), "Road Bike", d("1200")).unwrap();

        let ids: Vec<_> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b2", "b1"]);
    }

    #[test]
    fn test_add_merges_and_keeps_first_name_and_price() {
        let mut cart = Cart::new();
        cart.add("b1".into(), "Road Bike", d("1200")).unwrap();
        assert_eq!(cart.add("b1".into(), "Renamed Bike", d("999")).unwrap(), 2);

        let line = cart.get(&"b1".into()).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.name, "Road Bike");
        assert_eq!(line.unit_price, d("1200"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_then_add_starts_fresh() {
        let mut cart = Cart::new();
        cart.add("b1".into(), "Road Bike", d("1200")).unwrap();
        cart.add("b1".into(), "Road Bike", d("1200")).unwrap();

        let removed = cart.remove(&"b1".into()).unwrap();
        assert_eq!(removed.quantity, 2);
        assert!(cart.is_empty());

        assert_eq!(cart.add("b1".into(), "Road Bike", d("1200")).unwrap(), 1);
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut cart = Cart::new();
        assert!(cart.remove(&"nope".into()).is_none());
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add("b1".into(), "Road Bike", d("1200")).unwrap();
        cart.add("b2".into(), "Helmet", d("85")).unwrap();
        cart.add("b2".into(), "Helmet", d("85")).unwrap();
        cart.add("g1".into(), "Gel Pack", d("2.10")).unwrap();

        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.total(), d("1372.10"));
    }

    #[test]
    fn test_add_rejects_out_of_bounds_price() {
        let mut cart = Cart::new();
        let err = cart.add("x".into(), "Refund", d("-1")).unwrap_err();
        assert_eq!(
            err,
            CartError::InvalidPrice {
                id: "x".into(),
                source: PriceError::Negative(d("-1")),
            }
        );

        let err = cart
            .add("x".into(), "Big", d("79228162514264337593543950335"))
            .unwrap_err();
        assert!(matches!(
            err,
            CartError::InvalidPrice {
                source: PriceError::TooLarge(_),
                ..
            }
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_at_bounds_does_not_overflow() {
        let mut cart = Cart::from_items(vec![LineItem {
            id: "b1".into(),
            name: "Top Bike".to_string(),
            unit_price: crate::types::MAX_AMOUNT,
            quantity: u32::MAX - 1,
        }])
        .unwrap();
        assert_eq!(cart.add("b1".into(), "Top Bike", d("1")).unwrap(), u32::MAX);
        assert_eq!(
            cart.total(),
            crate::types::MAX_AMOUNT * Decimal::from(u32::MAX)
        );
        assert_eq!(
            cart.items()[0].checked_line_total(),
            Some(cart.total())
        );
    }

    #[test]
    fn test_detached_line_total_saturates() {
        let line = LineItem {
            id: "x".into(),
            name: "Big".to_string(),
            unit_price: Decimal::MAX,
            quantity: 2,
        };
        assert_eq!(line.checked_line_total(), None);
        assert_eq!(line.line_total(), Decimal::MAX);
    }

    #[test]
    fn test_add_overflow() {
        let mut cart = Cart::from_items(vec![LineItem {
            id: "b1".into(),
            name: "Road Bike".to_string(),
            unit_price: d("1"),
            quantity: u32::MAX,
        }])
        .unwrap();

        let err = cart.add("b1".into(), "Road Bike", d("1")).unwrap_err();
        assert_eq!(err, CartError::QuantityOverflow("b1".into()));
        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_from_items_rejects_broken_invariants() {
        let line = |id: &str, quantity| LineItem {
            id: id.into(),
            name: "Thing".to_string(),
            unit_price: d("5"),
            quantity,
        };

        assert_eq!(
            Cart::from_items(vec![line("a", 1), line("a", 2)]),
            Err(CartError::DuplicateItem("a".into()))
        );
        assert_eq!(
            Cart::from_items(vec![line("a", 0)]),
            Err(CartError::ZeroQuantity("a".into()))
        );

        let mut pricey = line("a", 1);
        pricey.unit_price = d("1000000.5");
        assert!(matches!(
            Cart::from_items(vec![pricey]),
            Err(CartError::InvalidPrice {
                source: PriceError::TooLarge(_),
                ..
            })
        ));
    }

    #[test]
    fn test_json_round_trip_at_price_bounds() {
        let mut cart = Cart::new();
        for (id, price) in [("max", "1000000"), ("fine", "999999.9999"), ("tiny", "0.0001")] {
            let price = Price::parse(price).unwrap();
            cart.add(id.into(), id, price.amount()).unwrap();
        }
        cart.add("fine".into(), "fine", Decimal::ZERO).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
        assert_eq!(back.total(), cart.total());
    }

    #[test]
    fn test_serialized_schema() {
        let mut cart = Cart::new();
        cart.add("b1".into(), "Road Bike", d("1200")).unwrap();

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value[0]["id"], "b1");
        assert_eq!(value[0]["name"], "Road Bike");
        assert_eq!(value[0]["price"].as_f64(), Some(1200.0));
        assert_eq!(value[0]["quantity"], 1);
    }

    #[test]
    fn test_deserialize_accepts_integer_prices() {
        let cart: Cart =
            serde_json::from_str(r#"[{"id":"b2","name":"Helmet","price":85,"quantity":3}]"#)
                .unwrap();
        assert_eq!(cart.items()[0].unit_price, d("85"));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_deserialize_validates_invariants() {
        let result: Result<Cart, _> = serde_json::from_str(
            r#"[{"id":"b2","name":"Helmet","price":85,"quantity":0}]"#,
        );
        assert!(result.is_err());
    }
}
