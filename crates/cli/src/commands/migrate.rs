//! Session store migration.
//!
//! # Usage
//!
//! ```bash
//! suresh-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - `SQLite` URL of the
//!   session database, default `sqlite://storefront.db?mode=rwc`

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use suresh_storefront::StorefrontConfig;
use suresh_storefront::config::ConfigError;
use tower_sessions_sqlx_store::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the session table the storefront keeps carts in.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the database cannot
/// be reached.
pub async fn sessions() -> Result<(), MigrationError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!("Connecting to session database...");
    let pool = SqlitePool::connect(config.database_url.expose_secret()).await?;

    tracing::info!("Running session store migration...");
    SqliteStore::new(pool).migrate().await?;

    tracing::info!("Session store migration complete!");
    Ok(())
}
