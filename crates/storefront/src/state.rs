//! Application state shared across handlers.

use std::sync::Arc;

use dev_books_core::Catalog;

use crate::checkout::CheckoutRegistry;
use crate::config::StorefrontConfig;
use crate::services::orders::OrderPlacement;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the order placement collaborator and the live checkout sessions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    orders: Arc<dyn OrderPlacement>,
    checkouts: CheckoutRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Validated, immutable book catalog
    /// * `orders` - Order placement collaborator
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<Catalog>,
        orders: Arc<dyn OrderPlacement>,
    ) -> Self {
        let checkouts = CheckoutRegistry::new(config.checkout_idle_timeout);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
                checkouts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the book catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the order placement collaborator.
    #[must_use]
    pub fn orders(&self) -> &dyn OrderPlacement {
        self.inner.orders.as_ref()
    }

    /// Get the registry of live checkout sessions.
    #[must_use]
    pub fn checkouts(&self) -> &CheckoutRegistry {
        &self.inner.checkouts
    }
}
