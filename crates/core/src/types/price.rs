//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog markup carries prices as strings (`data-price="1200"`). They are
//! parsed once into a [`Price`] and all cart arithmetic stays in
//! [`Decimal`], so totals never drift the way accumulated floats do.
//! Prices are bounded so that storing them as JSON numbers is lossless.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest unit price a cart line may carry.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Most fraction digits a unit price may carry.
///
/// Together with [`MAX_AMOUNT`] this keeps every price within the digits an
/// `f64` reproduces exactly, so the stored JSON number reads back unchanged.
pub const MAX_FRACTION_DIGITS: u32 = 4;

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty or whitespace.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price is not a number: {0:?}")]
    NotANumber(String),
    /// The input is a negative amount.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount is above [`MAX_AMOUNT`].
    #[error("price cannot exceed {MAX_AMOUNT}: {0}")]
    TooLarge(Decimal),
    /// The amount has more than [`MAX_FRACTION_DIGITS`] fraction digits.
    #[error("price has more than {MAX_FRACTION_DIGITS} decimal places: {0}")]
    TooPrecise(Decimal),
}

/// A US dollar unit price, checked against the cart's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    amount: Decimal,
}

impl Price {
    /// Check an amount and wrap it, dropping trailing zeros.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, above [`MAX_AMOUNT`], or
    /// has more than [`MAX_FRACTION_DIGITS`] fraction digits.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(PriceError::TooLarge(amount));
        }
        let amount = amount.normalize();
        if amount.scale() > MAX_FRACTION_DIGITS {
            return Err(PriceError::TooPrecise(amount));
        }
        Ok(Self { amount })
    }

    /// Parse a raw price string such as `"1200"` or `" 85.50 "`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not a decimal number, or if
    /// [`Price::new`] rejects the amount.
    pub fn parse(raw: &str) -> Result<Self, PriceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(trimmed)
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::new(amount)
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Format for display, e.g. `"$1,285"` or `"$1,200.5"`.
    #[must_use]
    pub fn display(&self) -> String {
        format_usd(self.amount)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Format any dollar amount, including totals above [`MAX_AMOUNT`].
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("${}", format_amount(amount))
}

/// Format an amount with en-US digit grouping.
///
/// Matches `Number.prototype.toLocaleString()` for the default locale:
/// thousands separated by commas, at most three fraction digits (rounded
/// half away from zero), trailing zeros dropped.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let digits = rounded.abs().to_string();
    let (whole, fraction) = digits
        .split_once('.')
        .map_or((digits.as_str(), None), |(w, f)| (w, Some(f)));

    let mut out = String::with_capacity(digits.len() + whole.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
