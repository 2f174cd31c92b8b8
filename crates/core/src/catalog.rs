//! The book catalog.
//!
//! A [`Catalog`] is built once, validated once, and then only read. Callers
//! share it behind an `Arc` and look books up by exact identifier.
//!
//! # Invariants
//!
//! Enforced by [`Catalog::new`]:
//! - at least one book
//! - identifiers are unique, non-empty and URL-safe (`[A-Za-z0-9_-]`)
//! - titles and authors are non-empty
//! - prices are non-negative
//! - exactly one book is flagged `featured`

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Book, BookId, Price};

/// Errors raised while building a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be parsed.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog contains no books.
    #[error("catalog must contain at least one book")]
    Empty,

    /// An identifier is empty or contains characters that are not URL-safe.
    #[error("book id {0:?} must be non-empty and contain only letters, digits, '-' or '_'")]
    InvalidId(String),

    /// Two books share an identifier.
    #[error("duplicate book id: {0}")]
    DuplicateId(BookId),

    /// A book has an empty title.
    #[error("book {0} has an empty title")]
    EmptyTitle(BookId),

    /// A book has an empty author.
    #[error("book {0} has an empty author")]
    EmptyAuthor(BookId),

    /// A book has a negative price.
    #[error("book {id} has a negative price: {price}")]
    NegativePrice {
        /// Offending book.
        id: BookId,
        /// The rejected price.
        price: Price,
    },

    /// No book is flagged as featured.
    #[error("exactly one book must be featured, found none")]
    NoFeatured,

    /// More than one book is flagged as featured.
    #[error("exactly one book must be featured, found {}", .0.len())]
    MultipleFeatured(Vec<BookId>),
}

/// Read access to books by identifier.
///
/// The checkout controller depends on this rather than on [`Catalog`]
/// directly so tests can observe whether a lookup happened at all.
pub trait BookLookup {
    /// Find the book whose id equals `id` exactly.
    fn find_book(&self, id: &str) -> Option<Book>;
}

/// An immutable, validated list of books in declaration order.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
    featured: usize,
}

impl Catalog {
    /// Build a catalog, enforcing every invariant listed in the module docs.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] encountered, in declaration order.
    pub fn new(books: Vec<Book>) -> Result<Self, CatalogError> {
        if books.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            validate_book(book)?;
            if !seen.insert(book.id.as_str()) {
                return Err(CatalogError::DuplicateId(book.id.clone()));
            }
        }

        let featured: Vec<usize> = books
            .iter()
            .enumerate()
            .filter(|(_, b)| b.featured)
            .map(|(i, _)| i)
            .collect();

        let featured = match featured.as_slice() {
            [] => return Err(CatalogError::NoFeatured),
            [index] => *index,
            indices => {
                return Err(CatalogError::MultipleFeatured(
                    indices
                        .iter()
                        .filter_map(|&i| books.get(i))
                        .map(|b| b.id.clone())
                        .collect(),
                ));
            }
        };

        Ok(Self { books, featured })
    }

    /// Parse a JSON array of books and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON, otherwise any
    /// validation error from [`Catalog::new`].
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let books: Vec<Book> = serde_json::from_str(json)?;
        Self::new(books)
    }

    /// The built-in demo catalog.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the records satisfy every invariant.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::new(vec![
            Book {
                id: BookId::new("1"),
                title: "The Art of Programming".to_string(),
                author: "Jane Developer".to_string(),
                price: Price::usd(2999),
                cover_image: "/static/images/the-art-of-programming.svg".to_string(),
                description: "A comprehensive guide to mastering modern programming paradigms with practical examples and exercises.".to_string(),
                featured: true,
            },
            Book {
                id: BookId::new("2"),
                title: "Data Structures Simplified".to_string(),
                author: "John Algorithm".to_string(),
                price: Price::usd(2499),
                cover_image: "/static/images/data-structures.svg".to_string(),
                description: "Learn essential data structures and algorithms through clear explanations and real-world applications.".to_string(),
                featured: false,
            },
            Book {
                id: BookId::new("3"),
                title: "Web Development Mastery".to_string(),
                author: "Sarah Frontend".to_string(),
                price: Price::usd(3499),
                cover_image: "/static/images/web-development.svg".to_string(),
                description: "A complete guide to modern web development, covering HTML, CSS, JavaScript, and popular frameworks.".to_string(),
                featured: false,
            },
        ])
    }

    /// Find the book whose id equals `id` exactly.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id.as_str() == id)
    }

    /// All books in declaration order.
    #[must_use]
    pub fn list_all(&self) -> &[Book] {
        &self.books
    }

    /// The single featured book.
    #[must_use]
    pub fn featured(&self) -> &Book {
        // `featured` is an index produced by `new` over this same vector
        #[allow(clippy::indexing_slicing)]
        &self.books[self.featured]
    }

    /// Number of books.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl BookLookup for Catalog {
    fn find_book(&self, id: &str) -> Option<Book> {
        self.lookup(id).cloned()
    }
}

fn validate_book(book: &Book) -> Result<(), CatalogError> {
    let id = book.id.as_str();
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CatalogError::InvalidId(id.to_string()));
    }
    if book.title.trim().is_empty() {
        return Err(CatalogError::EmptyTitle(book.id.clone()));
    }
    if book.author.trim().is_empty() {
        return Err(CatalogError::EmptyAuthor(book.id.clone()));
    }
    if book.price.is_negative() {
        return Err(CatalogError::NegativePrice {
            id: book.id.clone(),
            price: book.price,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn book(id: &str, featured: bool) -> Book {
        Book {
            id: BookId::new(id),
            title: format!("Book {id}"),
            author: "Author".to_string(),
            price: Price::usd(1000),
            cover_image: format!("/static/images/{id}.png"),
            description: String::new(),
            featured,
        }
    }

    #[test]
    fn test_lookup_every_sample_id() {
        let catalog = Catalog::sample().unwrap();
        for book in catalog.list_all() {
            let found = catalog.lookup(book.id.as_str()).unwrap();
            assert_eq!(found, book);
        }
    }

    #[test]
    fn test_lookup_unknown_id() {
        let catalog = Catalog::sample().unwrap();
        assert!(catalog.lookup("999").is_none());
        assert!(catalog.lookup("").is_none());
        assert!(catalog.lookup(" 1").is_none());
    }

    #[test]
    fn test_sample_book_one() {
        let catalog = Catalog::sample().unwrap();
        let book = catalog.lookup("1").unwrap();
        assert_eq!(book.title, "The Art of Programming");
        assert_eq!(book.price, Price::usd(2999));
        assert_eq!(book.price.display(), "$29.99");
    }

    #[test]
    fn test_sample_prices_render_two_decimals() {
        let catalog = Catalog::sample().unwrap();
        let rendered: Vec<String> = catalog
            .list_all()
            .iter()
            .map(|b| b.price.display())
            .collect();
        assert_eq!(rendered, vec!["$29.99", "$24.99", "$34.99"]);
    }

    #[test]
    fn test_list_all_preserves_declaration_order() {
        let catalog = Catalog::new(vec![book("b", true), book("a", false), book("c", false)]).unwrap();
        let ids: Vec<&str> = catalog.list_all().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_featured() {
        let catalog = Catalog::sample().unwrap();
        assert_eq!(catalog.featured().id.as_str(), "1");

        let catalog = Catalog::new(vec![book("x", false), book("y", true)]).unwrap();
        assert_eq!(catalog.featured().id.as_str(), "y");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_rejects_no_featured() {
        let result = Catalog::new(vec![book("1", false), book("2", false)]);
        assert!(matches!(result, Err(CatalogError::NoFeatured)));
    }

    #[test]
    fn test_rejects_multiple_featured() {
        let result = Catalog::new(vec![book("1", true), book("2", false), book("3", true)]);
        match result {
            Err(CatalogError::MultipleFeatured(ids)) => {
                assert_eq!(ids, vec![BookId::new("1"), BookId::new("3")]);
            }
            other => panic!("expected MultipleFeatured, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let result = Catalog::new(vec![book("1", true), book("1", false)]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_str() == "1"));
    }

    #[test]
    fn test_rejects_invalid_id() {
        let result = Catalog::new(vec![book("a b", true)]);
        assert!(matches!(result, Err(CatalogError::InvalidId(_))));

        let result = Catalog::new(vec![book("", true)]);
        assert!(matches!(result, Err(CatalogError::InvalidId(_))));
    }

    #[test]
    fn test_rejects_blank_title_and_author() {
        let mut untitled = book("1", true);
        untitled.title = "   ".to_string();
        assert!(matches!(
            Catalog::new(vec![untitled]),
            Err(CatalogError::EmptyTitle(_))
        ));

        let mut anonymous = book("1", true);
        anonymous.author = String::new();
        assert!(matches!(
            Catalog::new(vec![anonymous]),
            Err(CatalogError::EmptyAuthor(_))
        ));
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut discounted = book("1", true);
        discounted.price = Price::usd(-1);
        assert!(matches!(
            Catalog::new(vec![discounted]),
            Err(CatalogError::NegativePrice { .. })
        ));
    }

    #[test]
    fn test_free_book_is_allowed() {
        let mut free = book("1", true);
        free.price = Price::usd(0);
        assert!(Catalog::new(vec![free]).is_ok());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[
            {
                "id": "rust-101",
                "title": "Rust 101",
                "author": "Ferris",
                "price": { "amount": "19.50" },
                "coverImage": "/static/images/rust-101.png",
                "featured": true
            }
        ]"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        let book = catalog.lookup("rust-101").unwrap();
        assert_eq!(book.price.display(), "$19.50");
        assert_eq!(book.description, "");
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(matches!(
            Catalog::from_json_str("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_book_lookup_trait_clones() {
        let catalog = Catalog::sample().unwrap();
        let book = catalog.find_book("2").unwrap();
        assert_eq!(book.author, "John Algorithm");
        assert!(catalog.find_book("999").is_none());
    }
}
