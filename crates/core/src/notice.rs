//! Toast messages produced by cart and form operations.
//!
//! Operations return a [`Notice`] instead of poking a display widget; the
//! composing layer decides how to show it and for how long.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// How long a toast stays visible before hiding itself.
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// A transient message for the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Notice(String);

impl Notice {
    /// Shown when checkout is attempted on an empty cart.
    pub const EMPTY_CART: &'static str = "Your cart is empty!";
    /// Shown when checkout starts.
    pub const REDIRECTING: &'static str = "Redirecting to checkout...";
    /// Shown after a newsletter signup.
    pub const SUBSCRIBED: &'static str = "Thanks for subscribing!";
    /// Shown after a contact form submission.
    pub const MESSAGE_SENT: &'static str = "Message sent! We'll get back to you soon.";

    /// Create a notice with arbitrary text.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Confirmation for an item added to the cart.
    #[must_use]
    pub fn added(name: &str) -> Self {
        Self(format!("{name} added to cart!"))
    }

    /// The message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_includes_name() {
        assert_eq!(Notice::added("Road Bike").message(), "Road Bike added to cart!");
    }

    #[test]
    fn test_constants_render() {
        assert_eq!(Notice::new(Notice::EMPTY_CART).to_string(), "Your cart is empty!");
    }
}
