//! Session middleware configuration.
//!
//! The session record is where each visitor's cart lives, so the cookie is
//! long-lived and refreshed on activity.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "suresh_session";

/// Session expiry on inactivity, in days.
const SESSION_EXPIRY_DAYS: i64 = 30;

/// Create the session layer over any session store.
///
/// Production passes the `SQLite` store; tests pass an in-memory one.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &StorefrontConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::days(SESSION_EXPIRY_DAYS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
