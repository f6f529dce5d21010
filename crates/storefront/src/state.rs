//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;
use tower_sessions::SessionStore;

use crate::config::StorefrontConfig;
use crate::services::Scheduler;
use crate::site::Site;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the session store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    scheduler: Scheduler,
    sessions: Arc<dyn SessionStore>,
    pool: Option<SqlitePool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `sessions` - The session store also used by the session layer
    /// * `pool` - `SQLite` pool behind the session store, checked by readiness
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        sessions: Arc<dyn SessionStore>,
        pool: Option<SqlitePool>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                scheduler: Scheduler::new(),
                sessions,
                pool,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The site this process serves.
    #[must_use]
    pub fn site(&self) -> Site {
        self.inner.config.site
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    /// Session store for work that runs outside a request.
    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.inner.sessions
    }

    #[must_use]
    pub fn pool(&self) -> Option<&SqlitePool> {
        self.inner.pool.as_ref()
    }
}
