//! Integration tests for Dev Books.
//!
//! Each test boots the full storefront router on an ephemeral local port and
//! drives it with a cookie-aware HTTP client, the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dev-books-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use dev_books_core::Catalog;
use dev_books_storefront::config::StorefrontConfig;
use dev_books_storefront::services::OrderPlacement;
use dev_books_storefront::state::AppState;

/// A router served on `127.0.0.1` for the lifetime of the value.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve `router` on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { addr, handle }
    }

    /// Serve the storefront with the sample catalog and `orders`.
    pub async fn storefront(orders: Arc<dyn OrderPlacement>) -> Self {
        Self::storefront_with(Catalog::sample().expect("Sample catalog is valid"), orders).await
    }

    /// Serve the storefront with a custom catalog.
    pub async fn storefront_with(catalog: Catalog, orders: Arc<dyn OrderPlacement>) -> Self {
        let state = AppState::new(StorefrontConfig::default(), Arc::new(catalog), orders);
        Self::spawn(dev_books_storefront::app(state)).await
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A client that keeps cookies between requests, like a single browser.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Valid checkout form fields.
#[must_use]
pub fn buyer(name: &str, email: &str) -> Vec<(&'static str, String)> {
    vec![
        ("customerName", name.to_string()),
        ("email", email.to_string()),
        ("address", "12 Analytical Row, London".to_string()),
    ]
}
