//! Book record type.

use serde::{Deserialize, Serialize};

use super::{BookId, Price};

/// A purchasable book.
///
/// Field names serialize in camelCase (`coverImage`) to match catalog files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Identifier, unique within a catalog.
    pub id: BookId,
    /// Title shown on listing and checkout pages.
    pub title: String,
    /// Author display name.
    pub author: String,
    /// Unit price.
    pub price: Price,
    /// Cover image path or URL, resolved by the rendering layer.
    pub cover_image: String,
    /// Short blurb.
    #[serde(default)]
    pub description: String,
    /// Whether this book is the home page highlight.
    #[serde(default)]
    pub featured: bool,
}

impl Book {
    /// Relative link to start a checkout for this book.
    #[must_use]
    pub fn checkout_path(&self) -> String {
        format!("/checkout?bookId={}", self.id)
    }
}
