//! Catalog loading.
//!
//! The catalog is read once at start-up and injected into the application
//! state. It is never reloaded or mutated afterwards.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::instrument;

use dev_books_core::{Catalog, CatalogError};

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog {origin}: {source}")]
    Invalid {
        origin: String,
        #[source]
        source: CatalogError,
    },
}

/// Load the catalog from `path`, or the built-in sample catalog when no path
/// is configured.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
#[instrument]
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let catalog = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Catalog::from_json_str(&json).map_err(|source| CatalogLoadError::Invalid {
                origin: path.display().to_string(),
                source,
            })?
        }
        None => Catalog::sample().map_err(|source| CatalogLoadError::Invalid {
            origin: "sample".to_string(),
            source,
        })?,
    };

    tracing::info!(
        books = catalog.len(),
        featured = %catalog.featured().id,
        "Catalog loaded"
    );
    Ok(catalog)
}
