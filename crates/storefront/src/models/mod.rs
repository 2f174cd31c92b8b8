//! Domain models for storefront.
//!
//! Book and price types live in `dev-books-core`; this module only holds
//! types tied to the web session.

pub mod session;

pub use session::keys as session_keys;
