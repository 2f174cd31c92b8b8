//! Status enums for checkout sessions.

use serde::{Deserialize, Serialize};

/// Phase of a single checkout session.
///
/// ```text
/// Loading ──► NotFound            (terminal)
///    │
///    └──────► Ready ──► Submitting ──► Complete   (terminal)
///               ▲            │
///               │            ▼
///               └──────── Failed ──► Submitting   (manual resubmission)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// The view is activating and has not resolved its book yet.
    #[default]
    Loading,
    /// The book identifier was absent or did not resolve.
    NotFound,
    /// A book is in scope and the buyer is filling the form.
    Ready,
    /// An order placement call is in flight.
    Submitting,
    /// The order was placed.
    Complete,
    /// The last order placement attempt failed.
    Failed,
}

impl CheckoutPhase {
    /// Whether `submit` may be invoked in this phase.
    #[must_use]
    pub const fn accepts_submit(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::NotFound => write!(f, "not_found"),
            Self::Ready => write!(f, "ready"),
            Self::Submitting => write!(f, "submitting"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
