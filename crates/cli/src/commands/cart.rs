//! Drive the cart store against a JSON file.
//!
//! The file holds a JSON object of storage key to stored text, the same shape
//! a browser's key-value storage would have, so one file can carry both
//! sites' carts side by side.
//!
//! # Usage
//!
//! ```bash
//! suresh-cli cart --file cart.json show
//! suresh-cli cart --file cart.json add b1 "Road Bike" 1200
//! suresh-cli cart --file cart.json --site athlete remove t1
//! suresh-cli cart --file cart.json checkout
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use suresh_core::{CartStore, CartSummary, DurableStorage, LoadOutcome, StorageError, StoreError};
use suresh_storefront::Site;

#[derive(Debug, thiserror::Error)]
pub enum CartCommandError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a storage file: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Key-value storage persisted to a JSON file on every write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open `path`; a missing file is an empty storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CartCommandError> {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| CartCommandError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(CartCommandError::Read { path, source }),
        };
        Ok(Self { path, items })
    }
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value);
        let text = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, text).map_err(StorageError::backend)
    }
}

/// A cart subcommand.
#[derive(Debug, Clone)]
pub enum CartAction {
    Show,
    Add {
        id: String,
        name: String,
        price: String,
    },
    Remove {
        id: String,
    },
    Checkout {
        delay: Duration,
    },
}

/// Open the site's cart in `file` and apply `action`.
///
/// # Errors
///
/// Returns an error if the file cannot be used or the action is rejected.
pub async fn run(file: &Path, site: Site, action: CartAction) -> Result<(), CartCommandError> {
    let storage = FileStorage::open(file)?;
    let (mut store, outcome) = CartStore::open(storage, site.storage_key())?;
    if let LoadOutcome::Discarded { reason } = &outcome {
        tracing::warn!(file = %file.display(), %reason, "Stored cart unreadable, starting empty");
    }

    match action {
        CartAction::Show => {}
        CartAction::Add { id, name, price } => {
            let notice = store.add_item(id, &name, &price)?;
            say(notice.message());
        }
        CartAction::Remove { id } => {
            if !store.remove_item(&id.as_str().into())? {
                tracing::info!(%id, "Not in cart");
            }
        }
        CartAction::Checkout { delay } => {
            let checkout = store.checkout();
            say(checkout.notice().message());
            if checkout.is_started() {
                tokio::time::sleep(delay).await;
                store.clear()?;
                tracing::info!("Checkout complete, cart cleared");
            }
        }
    }

    print_summary(&store.render());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn say(message: &str) {
    println!("{message}");
}

#[allow(clippy::print_stdout)]
fn print_summary(summary: &CartSummary) {
    if summary.is_empty {
        println!("Your cart is empty");
        return;
    }
    for line in &summary.lines {
        println!(
            "{:<6} {:<24} {} x {} = {}",
            line.id.as_str(), line.name, line.unit_price_display, line.quantity, line.line_total_display
        );
    }
    println!("{} item(s), total {}", summary.item_count, summary.total_display);
}
