//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # List the built-in sample catalog
//! books-cli catalog list
//!
//! # List a catalog file
//! books-cli catalog list --file catalog.json
//!
//! # Validate a catalog file before deploying it
//! books-cli catalog validate --file catalog.json
//!
//! # Show one book
//! books-cli catalog show 2 --file catalog.json
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_CATALOG_PATH` - Used when `--file` is not given

use std::path::{Path, PathBuf};

use thiserror::Error;

use dev_books_core::{Book, Catalog};
use dev_books_storefront::services::{CatalogLoadError, load_catalog};

/// Errors from catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// The catalog could not be loaded or failed validation.
    #[error(transparent)]
    Load(#[from] CatalogLoadError),

    /// No book with the requested id.
    #[error("No book with id '{0}' in catalog")]
    BookNotFound(String),
}

/// Resolve the catalog source: explicit flag, then environment, then sample.
fn catalog_source(file: Option<PathBuf>) -> Option<PathBuf> {
    file.or_else(|| {
        dotenvy::dotenv().ok();
        configured_path(std::env::var("STOREFRONT_CATALOG_PATH").ok())
    })
}

/// A configured catalog path; blank values count as unset, as in the
/// storefront's configuration.
fn configured_path(value: Option<String>) -> Option<PathBuf> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// One listing line for a book.
#[must_use]
pub fn format_row(book: &Book, featured: bool) -> String {
    let marker = if featured { " [featured]" } else { "" };
    format!(
        "{id:<8} {price:>10}  {title} by {author}{marker}",
        id = book.id.as_str(),
        price = book.price.display(),
        title = book.title,
        author = book.author,
    )
}

fn featured_id(catalog: &Catalog) -> &str {
    catalog.featured().id.as_str()
}

/// List every book in catalog order.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn list(file: Option<PathBuf>) -> Result<Vec<String>, CatalogCommandError> {
    let source = catalog_source(file);
    let catalog = load_catalog(source.as_deref())?;
    let featured = featured_id(&catalog);

    let rows: Vec<String> = catalog
        .list_all()
        .iter()
        .map(|book| format_row(book, book.id.as_str() == featured))
        .collect();

    for row in &rows {
        tracing::info!("{row}");
    }
    Ok(rows)
}

/// Load and validate a catalog file.
///
/// # Errors
///
/// Returns the validation error when the file is not a valid catalog.
pub fn validate(file: &Path) -> Result<usize, CatalogCommandError> {
    let catalog = load_catalog(Some(file))?;
    tracing::info!(
        "{} is valid: {} books, featured '{}'",
        file.display(),
        catalog.len(),
        featured_id(&catalog)
    );
    Ok(catalog.len())
}

/// Show one book by id.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or has no such book.
pub fn show(id: &str, file: Option<PathBuf>) -> Result<Book, CatalogCommandError> {
    let source = catalog_source(file);
    let catalog = load_catalog(source.as_deref())?;
    let book = catalog
        .lookup(id)
        .cloned()
        .ok_or_else(|| CatalogCommandError::BookNotFound(id.to_string()))?;

    tracing::info!("{}", format_row(&book, book.featured));
    if !book.description.is_empty() {
        tracing::info!("{}", book.description);
    }
    tracing::info!("cover: {}  checkout: {}", book.cover_image, book.checkout_path());
    Ok(book)
}
