//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Catalog identifiers arrive as opaque tokens (query parameters, JSON
/// files), so IDs wrap a `String` rather than a number. The generated type has:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use dev_books_core::define_id;
/// define_id!(AuthorId);
/// define_id!(PublisherId);
///
/// let author = AuthorId::new("jane");
/// let publisher = PublisherId::new("jane");
/// assert_eq!(author.as_str(), publisher.as_str());
///
/// // These are different types, so this won't compile:
/// // let _: AuthorId = publisher;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(BookId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_id_display_is_raw_value() {
        let id = BookId::new("42");
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_book_id_serializes_transparently() {
        let id = BookId::from("3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3\"");

        let parsed: BookId = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_book_id_comparison_is_exact() {
        assert_ne!(BookId::new("1"), BookId::new("01"));
        assert_ne!(BookId::new("1"), BookId::new("1 "));
    }
}
