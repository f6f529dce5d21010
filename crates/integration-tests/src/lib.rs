//! Integration tests for the Suresh sites.
//!
//! Each test starts the storefront in-process on an ephemeral port with an
//! in-memory session store, then drives it over HTTP with a cookie-holding
//! client, the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p suresh-integration-tests
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use suresh_storefront::{Site, StorefrontConfig};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_sessions::MemoryStore;

/// A storefront running on a local port.
pub struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    sessions: MemoryStore,
    handle: JoinHandle<()>,
}

/// Cart as returned by `GET /api/cart`.
#[derive(Debug, Deserialize)]
pub struct CartJson {
    pub lines: Vec<LineJson>,
    pub item_count: u64,
    pub total: f64,
    pub total_display: String,
    pub is_empty: bool,
}

/// One line of [`CartJson`].
#[derive(Debug, Deserialize)]
pub struct LineJson {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl TestServer {
    /// Start a server for `site` with default timings.
    pub async fn start(site: Site) -> Self {
        Self::start_with(StorefrontConfig::for_site(site), MemoryStore::default()).await
    }

    /// Start a server for `site` whose checkout completes after `delay`.
    pub async fn with_checkout_delay(site: Site, delay: Duration) -> Self {
        let mut config = StorefrontConfig::for_site(site);
        config.checkout_delay = delay;
        Self::start_with(config, MemoryStore::default()).await
    }

    /// Start a server over a given session store.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start_with(config: StorefrontConfig, sessions: MemoryStore) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = suresh_storefront::app(config, sessions.clone(), None);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                report_server_error(&e);
            }
        });

        Self {
            addr,
            client: new_client(),
            sessions,
            handle,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// The visitor's client, carrying their session cookie.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// A fresh visitor with no cookies.
    #[must_use]
    pub fn new_visitor(&self) -> reqwest::Client {
        new_client()
    }

    #[must_use]
    pub const fn sessions(&self) -> &MemoryStore {
        &self.sessions
    }

    /// Post an add-to-cart form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn add(&self, id: &str, name: &str, price: &str) -> reqwest::Response {
        self.client
            .post(self.url("/cart/add"))
            .form(&[("id", id), ("name", name), ("price", price)])
            .send()
            .await
            .expect("add request failed")
    }

    /// Post a remove form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn remove(&self, id: &str) -> reqwest::Response {
        self.client
            .post(self.url("/cart/remove"))
            .form(&[("id", id)])
            .send()
            .await
            .expect("remove request failed")
    }

    /// Post checkout.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn checkout(&self) -> reqwest::Response {
        self.client
            .post(self.url("/checkout"))
            .send()
            .await
            .expect("checkout request failed")
    }

    /// Fetch the cart as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not a cart.
    pub async fn cart(&self) -> CartJson {
        self.client
            .get(self.url("/api/cart"))
            .send()
            .await
            .expect("cart request failed")
            .json()
            .await
            .expect("cart body is not JSON")
    }

    /// GET a path and return the body text.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get_text(&self, path: &str) -> String {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed")
            .text()
            .await
            .expect("body is not text")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn new_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

#[allow(clippy::print_stderr)]
fn report_server_error(e: &std::io::Error) {
    eprintln!("test server stopped: {e}");
}
