//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Loads the book catalog at start-up (file or built-in sample)
//! - `orders` - Order placement collaborators (HTTP API or simulated)

pub mod catalog;
pub mod orders;

pub use catalog::{CatalogLoadError, load_catalog};
pub use orders::{OrderError, OrderPlacement, OrderRequest};
