//! Suresh storefront library.
//!
//! Serves the bike shop or the athlete site: product grid, cart sidebar with
//! session-backed persistence, toasts and confirmation-only forms. Built as a
//! library so the router can be driven from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod site;
pub mod state;

pub use config::StorefrontConfig;
pub use routes::app;
pub use site::Site;
