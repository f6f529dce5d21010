//! The cart store: cart state mirrored into durable storage.
//!
//! The store is an explicit object owned by whatever composes it (a request
//! handler, the CLI). Every mutation persists the full cart under the store's
//! key, and [`CartStore::render`] recomputes totals from scratch.

use std::time::Duration;

use super::{Cart, CartError, CartSummary, DurableStorage, StorageError};
use crate::notice::Notice;
use crate::types::{Price, ProductId};

/// How long checkout waits before clearing the cart.
pub const CHECKOUT_DELAY: Duration = Duration::from_millis(1500);

/// Errors from a store mutation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What [`CartStore::load`] found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored under the key; the cart is empty.
    Missing,
    /// A stored cart replaced the in-memory state.
    Restored { lines: usize },
    /// The stored value was unreadable or broke an invariant and was ignored.
    Discarded { reason: String },
}

/// Result of starting a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    /// The cart is empty; nothing happens beyond the notice.
    Empty(Notice),
    /// The cart should be cleared with [`CartStore::clear`] after the delay.
    Started(Notice),
}

impl Checkout {
    #[must_use]
    pub const fn notice(&self) -> &Notice {
        match self {
            Self::Empty(notice) | Self::Started(notice) => notice,
        }
    }

    #[must_use]
    pub const fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }
}

/// Cart state bound to a storage slot.
#[derive(Debug)]
pub struct CartStore<S> {
    key: String,
    cart: Cart,
    storage: S,
}

impl<S: DurableStorage> CartStore<S> {
    /// A store with an empty cart. Nothing is read from storage.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cart: Cart::new(),
            storage,
        }
    }

    /// Create a store and immediately [`load`](Self::load) it.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    pub fn open(storage: S, key: impl Into<String>) -> Result<(Self, LoadOutcome), StorageError> {
        let mut store = Self::new(storage, key);
        let outcome = store.load()?;
        Ok((store, outcome))
    }

    /// Replace in-memory state with whatever is stored under the key.
    ///
    /// Malformed JSON or a cart breaking an invariant is discarded and the
    /// cart is left empty; the stored value is not touched until the next
    /// mutation overwrites it.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    pub fn load(&mut self) -> Result<LoadOutcome, StorageError> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            self.cart = Cart::new();
            return Ok(LoadOutcome::Missing);
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => {
                let lines = cart.len();
                self.cart = cart;
                Ok(LoadOutcome::Restored { lines })
            }
            Err(err) => {
                self.cart = Cart::new();
                Ok(LoadOutcome::Discarded {
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Add one unit of a product and persist.
    ///
    /// The raw price is only parsed when the product is new to the cart; an
    /// existing line keeps its original name and price.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed, the quantity would
    /// overflow, or the cart cannot be persisted.
    pub fn add_item(
        &mut self,
        id: impl Into<ProductId>,
        name: &str,
        unit_price_raw: &str,
    ) -> Result<Notice, StoreError> {
        let id = id.into();
        let unit_price = if let Some(existing) = self.cart.get(&id) {
            existing.unit_price
        } else {
            Price::parse(unit_price_raw)
                .map_err(|source| CartError::InvalidPrice {
                    id: id.clone(),
                    source,
                })?
                .amount()
        };

        self.cart.add(id, name, unit_price)?;
        self.persist()?;
        Ok(Notice::added(name))
    }

    /// Drop a product's line entirely and persist.
    ///
    /// Returns whether a line was removed; an unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_item(&mut self, id: &ProductId) -> Result<bool, StorageError> {
        let removed = self.cart.remove(id).is_some();
        self.persist()?;
        Ok(removed)
    }

    /// Empty the cart and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        self.persist()
    }

    /// Start a checkout. See [`Checkout`].
    #[must_use]
    pub fn checkout(&self) -> Checkout {
        if self.cart.is_empty() {
            Checkout::Empty(Notice::new(Notice::EMPTY_CART))
        } else {
            Checkout::Started(Notice::new(Notice::REDIRECTING))
        }
    }

    /// Serialize the full cart under the key, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the storage write fails.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&self.cart)?;
        self.storage.set_item(&self.key, encoded)
    }

    /// Project the current state for display.
    #[must_use]
    pub fn render(&self) -> CartSummary {
        CartSummary::from(&self.cart)
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the storage back, e.g. to flush a buffered slot.
    pub fn into_storage(self) -> S {
        self.storage
    }
}
