//! Core types for the Suresh sites.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{
    MAX_AMOUNT, MAX_FRACTION_DIGITS, Price, PriceError, format_amount, format_usd,
};
