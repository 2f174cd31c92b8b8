//! Session-related types.

/// Session keys for per-visitor state.
pub mod keys {
    /// Key for the visitor's current checkout session id.
    pub const CHECKOUT_ID: &str = "checkout_id";
}
