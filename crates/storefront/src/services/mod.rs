//! Business logic services for the storefront.
//!
//! - `scheduler` - Cancellable deferred tasks (checkout completion)
//! - `session_cart` - The cart store bound to a visitor's session

pub mod scheduler;
pub mod session_cart;

pub use scheduler::{Scheduler, TaskKind};
pub use session_cart::{SessionCart, SessionSlot, complete_checkout};
