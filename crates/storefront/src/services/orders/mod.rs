//! Order placement collaborators.
//!
//! The checkout controller only knows the [`OrderPlacement`] trait. Which
//! implementation backs it is decided once at start-up from configuration:
//!
//! - [`HttpOrderClient`] - posts orders to a real order API with a bounded
//!   timeout and retry/backoff for transient failures
//! - [`SimulatedOrderService`] - waits a configurable latency and reports
//!   success; used for demos and local development
//!
//! Unit tests use the generated `MockOrderPlacement`.

mod http;
mod simulated;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dev_books_core::BookId;

use crate::config::OrderServiceConfig;

pub use http::HttpOrderClient;
pub use simulated::SimulatedOrderService;

/// Payload handed to the order placement collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: String,
    pub email: String,
    pub address: String,
    pub product_id: BookId,
    pub quantity: u32,
}

/// Errors reported by an order placement collaborator.
#[derive(Debug, Error)]
pub enum OrderError {
    /// HTTP request failed (connect, timeout, body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Order API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Order API asked us to slow down.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The collaborator refused the order outright.
    #[error("Order rejected: {0}")]
    Rejected(String),
}

impl OrderError {
    /// Whether another attempt could reasonably succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500 || *status == 408,
            Self::RateLimited(_) => true,
            Self::Rejected(_) => false,
        }
    }
}

/// Something that can place an order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderPlacement: Send + Sync {
    /// Place a single order. Resolves once the order is accepted or has
    /// definitively failed.
    async fn place_order(&self, request: &OrderRequest) -> Result<(), OrderError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Error building an order placement collaborator.
#[derive(Debug, Error)]
pub enum OrderServiceInitError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid API key header: {0}")]
    InvalidApiKey(String),
}

/// Build the collaborator selected by configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn from_config(
    config: &OrderServiceConfig,
) -> Result<Arc<dyn OrderPlacement>, OrderServiceInitError> {
    let service: Arc<dyn OrderPlacement> = match config {
        OrderServiceConfig::Simulated { latency } => {
            Arc::new(SimulatedOrderService::new(*latency))
        }
        OrderServiceConfig::Http(http) => Arc::new(HttpOrderClient::new(http)?),
    };
    Ok(service)
}
