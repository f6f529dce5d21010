//! Suresh Core - cart store and shared types.
//!
//! This crate provides the pieces shared by every Suresh component:
//! - `storefront` - Server-rendered bike shop and athlete sites
//! - `cli` - Command-line tools for migrations and local cart inspection
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure state logic - no
//! network I/O, no database access, no async runtime. Persistence goes through
//! the [`cart::DurableStorage`] trait, so the storefront can back it with a
//! session record and the CLI with a JSON file.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and emails
//! - [`cart`] - Line items, the cart, its rendered summary and the store
//! - [`notice`] - Toast messages returned by store operations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod notice;
pub mod types;

pub use cart::{
    CHECKOUT_DELAY, Cart, CartError, CartStore, CartSummary, Checkout, DurableStorage, LineItem,
    LineView, LoadOutcome, MemoryStorage, StorageError, StoreError,
};
pub use notice::{Notice, TOAST_DURATION};
pub use types::*;
