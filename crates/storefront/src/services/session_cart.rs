//! Cart storage backed by the visitor's session record.
//!
//! The session record plays the part of the browser's durable key-value
//! storage: the cart is kept as JSON text under the site's storage key.

use serde_json::Value;
use suresh_core::{CartStore, CartSummary, DurableStorage, LoadOutcome, StorageError};
use tower_sessions::session::{Id, Record};
use tower_sessions::{Session, SessionStore, session_store};

use crate::error::AppError;
use crate::site::Site;

/// Requested a key the slot was not loaded for.
#[derive(Debug, thiserror::Error)]
#[error("session slot holds {held:?}, not {requested:?}")]
pub struct ForeignKey {
    held: String,
    requested: String,
}

/// One session value, buffered so the synchronous cart store can use it.
///
/// Writes stay in the buffer until [`SessionSlot::flush`] (or
/// [`SessionSlot::write_to`] for a detached record).
#[derive(Debug, Clone)]
pub struct SessionSlot {
    key: String,
    value: Option<String>,
    dirty: bool,
}

impl SessionSlot {
    /// Read `key` from the live session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be loaded from its store.
    pub async fn load(session: &Session, key: &str) -> Result<Self, tower_sessions::session::Error> {
        let value = session.get_value(key).await?.map(stored_text);
        Ok(Self::with_value(key, value))
    }

    /// Read `key` from a record fetched straight from the session store.
    #[must_use]
    pub fn from_record(record: &Record, key: &str) -> Self {
        Self::with_value(key, record.data.get(key).cloned().map(stored_text))
    }

    fn with_value(key: &str, value: Option<String>) -> Self {
        Self {
            key: key.to_owned(),
            value,
            dirty: false,
        }
    }

    /// Whether a write is waiting to be flushed.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write a pending value back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be updated.
    pub async fn flush(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        if let (true, Some(value)) = (self.dirty, self.value) {
            session.insert(&self.key, value).await?;
        }
        Ok(())
    }

    /// Write a pending value into a detached record.
    pub fn write_to(self, record: &mut Record) {
        if let (true, Some(value)) = (self.dirty, self.value) {
            record.data.insert(self.key, Value::String(value));
        }
    }

    fn check_key(&self, key: &str) -> Result<(), StorageError> {
        if key == self.key {
            Ok(())
        } else {
            Err(StorageError::backend(ForeignKey {
                held: self.key.clone(),
                requested: key.to_owned(),
            }))
        }
    }
}

/// Stored values are JSON text; anything else is handed over as its JSON
/// rendering and left for the cart loader to judge.
fn stored_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

impl DurableStorage for SessionSlot {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_key(key)?;
        Ok(self.value.clone())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.check_key(key)?;
        self.value = Some(value);
        self.dirty = true;
        Ok(())
    }
}

/// A visitor's cart, loaded from their session for the span of one request.
#[derive(Debug)]
pub struct SessionCart {
    store: CartStore<SessionSlot>,
    session: Session,
}

impl SessionCart {
    /// Load the site's cart from the session.
    ///
    /// A stored cart that cannot be read is discarded with a warning and the
    /// visitor starts with an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn open(session: Session, site: Site) -> Result<Self, AppError> {
        let key = site.storage_key();
        let slot = SessionSlot::load(&session, key).await?;
        let (store, outcome) = CartStore::open(slot, key)?;

        match outcome {
            LoadOutcome::Discarded { reason } => {
                tracing::warn!(key, %reason, "Discarding unreadable stored cart");
            }
            LoadOutcome::Restored { lines } => tracing::debug!(key, lines, "Cart restored"),
            LoadOutcome::Missing => {}
        }

        Ok(Self { store, session })
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<SessionSlot> {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut CartStore<SessionSlot> {
        &mut self.store
    }

    #[must_use]
    pub fn render(&self) -> CartSummary {
        self.store.render()
    }

    /// The visitor's session id, if the session has been saved before.
    #[must_use]
    pub fn session_id(&self) -> Option<Id> {
        self.session.id()
    }

    /// Flush pending writes to the session and return the rendered cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be updated.
    pub async fn save(self) -> Result<CartSummary, AppError> {
        let summary = self.store.render();
        self.store.into_storage().flush(&self.session).await?;
        Ok(summary)
    }
}

/// Failure while clearing a cart outside of a request.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("session store error: {0}")]
    Store(#[from] session_store::Error),
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Clear the cart held in session `id` directly in the session store.
///
/// Returns `false` if the session no longer exists.
///
/// # Errors
///
/// Returns an error if the record cannot be loaded or saved.
pub async fn complete_checkout(
    sessions: &dyn SessionStore,
    id: &Id,
    key: &str,
) -> Result<bool, CompletionError> {
    let Some(mut record) = sessions.load(id).await? else {
        return Ok(false);
    };

    let mut store = CartStore::new(SessionSlot::from_record(&record, key), key);
    store.clear()?;
    store.into_storage().write_to(&mut record);

    sessions.save(&record).await?;
    Ok(true)
}
