//! Checkout session controller.
//!
//! One [`CheckoutSession`] covers one buyer's interaction with one book's
//! checkout view. It is a linear state machine:
//!
//! ```text
//! Loading ──activate──► NotFound
//!    │
//!    └─────activate───► Ready ──begin_submit──► Submitting ──finish_submit──► Complete
//!                         ▲                          │
//!                         │                          ▼
//!                      set_field ◄──────────────── Failed ──begin_submit──► Submitting
//! ```
//!
//! Submission is split into [`CheckoutSession::begin_submit`] and
//! [`CheckoutSession::finish_submit`] so callers that share a session behind
//! a lock can release it while the order placement call is in flight. A
//! second submit arriving in the meantime observes `Submitting` and is a
//! no-op.

mod form;
mod registry;

pub use form::{CheckoutForm, FieldError, FormField};
pub use registry::{CheckoutId, CheckoutRegistry, SharedCheckout};

use dev_books_core::{Book, BookId, BookLookup, CheckoutPhase};

use crate::services::orders::{OrderError, OrderPlacement, OrderRequest};

/// Message shown when order placement fails.
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "There was an error processing your order. Please try again.";

/// Quantity of every checkout; the storefront sells one copy at a time.
const ORDER_QUANTITY: u32 = 1;

/// State of a checkout session, with the data each state owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Loading,
    NotFound,
    Ready {
        book: Book,
        form: CheckoutForm,
    },
    Submitting {
        book: Book,
        form: CheckoutForm,
    },
    Complete {
        book: Book,
        customer_name: String,
        email: String,
    },
    Failed {
        book: Book,
        form: CheckoutForm,
        error: String,
    },
}

impl CheckoutState {
    /// The phase name of this state.
    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        match self {
            Self::Loading => CheckoutPhase::Loading,
            Self::NotFound => CheckoutPhase::NotFound,
            Self::Ready { .. } => CheckoutPhase::Ready,
            Self::Submitting { .. } => CheckoutPhase::Submitting,
            Self::Complete { .. } => CheckoutPhase::Complete,
            Self::Failed { .. } => CheckoutPhase::Failed,
        }
    }
}

/// An order about to be placed. Exists only between `begin_submit` and the
/// order placement call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    pub book_id: BookId,
    pub quantity: u32,
    pub form: CheckoutForm,
}

impl OrderSubmission {
    /// Payload for the order placement collaborator.
    #[must_use]
    pub fn to_request(&self) -> OrderRequest {
        OrderRequest {
            customer_name: self.form.customer_name.clone(),
            email: self.form.email.clone(),
            address: self.form.address.clone(),
            product_id: self.book_id.clone(),
            quantity: self.quantity,
        }
    }
}

/// A single buyer's checkout.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    state: CheckoutState,
}

impl CheckoutSession {
    /// A fresh session in `Loading`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.state.phase()
    }

    /// The book in scope, if the session resolved one.
    #[must_use]
    pub const fn book(&self) -> Option<&Book> {
        match &self.state {
            CheckoutState::Loading | CheckoutState::NotFound => None,
            CheckoutState::Ready { book, .. }
            | CheckoutState::Submitting { book, .. }
            | CheckoutState::Complete { book, .. }
            | CheckoutState::Failed { book, .. } => Some(book),
        }
    }

    /// Entered form values, while the form is still in play.
    #[must_use]
    pub const fn form(&self) -> Option<&CheckoutForm> {
        match &self.state {
            CheckoutState::Ready { form, .. }
            | CheckoutState::Submitting { form, .. }
            | CheckoutState::Failed { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Error message from the last failed submission.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            CheckoutState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Resolve the externally supplied book identifier.
    ///
    /// Only acts in `Loading`. An absent identifier goes straight to
    /// `NotFound` without consulting `lookup`.
    pub fn activate(&mut self, book_id: Option<&str>, lookup: &impl BookLookup) {
        if !matches!(self.state, CheckoutState::Loading) {
            tracing::debug!(phase = %self.phase(), "Ignoring activate outside loading");
            return;
        }

        self.state = match book_id.and_then(|id| lookup.find_book(id)) {
            Some(book) => CheckoutState::Ready {
                book,
                form: CheckoutForm::default(),
            },
            None => CheckoutState::NotFound,
        };
    }

    /// Overwrite one form field. Returns whether the edit was accepted.
    ///
    /// Accepted only in `Ready` and `Failed`; no validation happens here.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
        match &mut self.state {
            CheckoutState::Ready { form, .. } | CheckoutState::Failed { form, .. } => {
                form.set(field, value.into());
                true
            }
            _ => false,
        }
    }

    /// Overwrite every field from a posted form. Returns whether the edit
    /// was accepted.
    pub fn set_form(&mut self, values: &CheckoutForm) -> bool {
        FormField::ALL
            .into_iter()
            .all(|field| self.set_field(field, values.get(field)))
    }

    /// Move to `Submitting` and hand back the order to place.
    ///
    /// Returns `None`, leaving the state untouched, unless the session is in
    /// `Ready` or `Failed`. Any previous error message is dropped.
    pub fn begin_submit(&mut self) -> Option<OrderSubmission> {
        match std::mem::take(&mut self.state) {
            CheckoutState::Ready { book, form } | CheckoutState::Failed { book, form, .. } => {
                let submission = OrderSubmission {
                    book_id: book.id.clone(),
                    quantity: ORDER_QUANTITY,
                    form: form.clone(),
                };
                self.state = CheckoutState::Submitting { book, form };
                Some(submission)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Record the outcome of the order placement call.
    ///
    /// Only acts in `Submitting`. Success keeps the buyer's name and email
    /// for the confirmation; failure keeps every field for resubmission.
    pub fn finish_submit(&mut self, outcome: Result<(), OrderError>) {
        match std::mem::take(&mut self.state) {
            CheckoutState::Submitting { book, form } => {
                self.state = match outcome {
                    Ok(()) => CheckoutState::Complete {
                        book,
                        customer_name: form.customer_name,
                        email: form.email,
                    },
                    Err(e) => {
                        tracing::warn!(book_id = %book.id, error = %e, "Order submission failed");
                        CheckoutState::Failed {
                            book,
                            form,
                            error: SUBMISSION_FAILED_MESSAGE.to_string(),
                        }
                    }
                };
            }
            other => {
                tracing::debug!(phase = %other.phase(), "Ignoring finish_submit outside submitting");
                self.state = other;
            }
        }
    }

    /// Submit and wait for the outcome, for callers that own the session
    /// outright.
    ///
    /// Returns whether `orders` was called.
    pub async fn submit(&mut self, orders: &dyn OrderPlacement) -> bool {
        let Some(submission) = self.begin_submit() else {
            return false;
        };
        let outcome = orders.place_order(&submission.to_request()).await;
        self.finish_submit(outcome);
        true
    }
}
