//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured book, catalog grid)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check
//!
//! # Checkout
//! GET  /checkout?bookId={id}   - Start a checkout (order summary + form)
//! POST /checkout               - Submit the checkout form
//!
//! # Static
//! GET  /static/*               - Stylesheet and cover images
//! ```

pub mod checkout;
pub mod home;

use axum::{
    Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::error::AppError;
use crate::state::AppState;

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::submit))
        // Health checks
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// The catalog is loaded and validated before the listener binds, and the
/// order service is only reached per submission, so a process that can
/// answer is ready.
async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
