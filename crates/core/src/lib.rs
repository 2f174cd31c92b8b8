//! Dev Books Core - Shared types library.
//!
//! This crate provides common types used across all Dev Books components:
//! - `storefront` - Public-facing book store (listing and checkout)
//! - `cli` - Command-line tools for inspecting and validating catalogs
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! Catalog files are read by the callers and handed to
//! [`Catalog::from_json_str`] as text.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, books and checkout phases
//! - [`catalog`] - The immutable, validated book catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::{BookLookup, Catalog, CatalogError};
pub use types::*;
