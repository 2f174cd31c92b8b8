//! Checkout route handlers.
//!
//! `GET /checkout?bookId=` activates a fresh checkout session and stores its
//! id in the visitor's cookie session. `POST /checkout` drives that session
//! through submission. The session lock is held only while the state machine
//! moves; the order placement call runs on its own task with the lock
//! released, so a second POST during the call sees `Submitting` and backs
//! off instead of placing a duplicate order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use dev_books_core::CheckoutPhase;

use super::home::BookView;
use crate::checkout::{
    CheckoutForm, CheckoutId, CheckoutSession, CheckoutState, FieldError, FormField,
    SharedCheckout,
};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session_keys;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Per-field validation messages.
#[derive(Clone, Default)]
pub struct FieldErrorsView {
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<&[FieldError]> for FieldErrorsView {
    fn from(errors: &[FieldError]) -> Self {
        let mut view = Self::default();
        for error in errors {
            let slot = match error.field {
                FormField::CustomerName => &mut view.customer_name,
                FormField::Email => &mut view.email,
                FormField::Address => &mut view.address,
            };
            slot.get_or_insert_with(|| error.message.clone());
        }
        view
    }
}

/// Order summary and buyer form.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutFormTemplate {
    pub book: BookView,
    pub form: CheckoutForm,
    pub field_errors: FieldErrorsView,
    /// Banner shown after a failed order placement.
    pub error: Option<String>,
}

/// Order confirmation.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CheckoutCompleteTemplate {
    pub book: BookView,
    pub customer_name: String,
    pub email: String,
}

/// Shown while an order for this session is still in flight.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/processing.html")]
pub struct CheckoutProcessingTemplate {
    pub book: BookView,
}

/// Unknown or missing book identifier.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/not_found.html")]
pub struct BookNotFoundTemplate;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the checkout ID from the session.
async fn get_checkout_id(session: &Session) -> Option<CheckoutId> {
    session
        .get::<CheckoutId>(session_keys::CHECKOUT_ID)
        .await
        .ok()
        .flatten()
}

/// Set the checkout ID in the session.
async fn set_checkout_id(
    session: &Session,
    checkout_id: CheckoutId,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHECKOUT_ID, checkout_id).await
}

/// Resolve the visitor's live checkout, if any.
async fn current_checkout(
    state: &AppState,
    session: &Session,
) -> Option<(CheckoutId, SharedCheckout)> {
    let id = get_checkout_id(session).await?;
    let shared = state.checkouts().get(&id).await?;
    Some((id, shared))
}

/// Render the view for a checkout state.
fn render(state: &CheckoutState) -> Response {
    match state {
        CheckoutState::Loading => Redirect::to("/").into_response(),
        CheckoutState::NotFound => {
            (StatusCode::NOT_FOUND, BookNotFoundTemplate).into_response()
        }
        CheckoutState::Ready { book, form } => CheckoutFormTemplate {
            book: BookView::from(book),
            form: form.clone(),
            field_errors: FieldErrorsView::default(),
            error: None,
        }
        .into_response(),
        CheckoutState::Failed { book, form, error } => CheckoutFormTemplate {
            book: BookView::from(book),
            form: form.clone(),
            field_errors: FieldErrorsView::default(),
            error: Some(error.clone()),
        }
        .into_response(),
        CheckoutState::Submitting { book, .. } => (
            StatusCode::CONFLICT,
            CheckoutProcessingTemplate {
                book: BookView::from(book),
            },
        )
            .into_response(),
        CheckoutState::Complete {
            book,
            customer_name,
            email,
        } => CheckoutCompleteTemplate {
            book: BookView::from(book),
            customer_name: customer_name.clone(),
            email: email.clone(),
        }
        .into_response(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Checkout query parameters.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    #[serde(rename = "bookId")]
    pub book_id: Option<String>,
}

/// Start a checkout for one book.
///
/// GET /checkout?bookId={id}
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CheckoutQuery>,
) -> Result<Response> {
    let mut checkout = CheckoutSession::new();
    checkout.activate(query.book_id.as_deref(), state.catalog());

    if checkout.phase() == CheckoutPhase::NotFound {
        tracing::info!("Checkout requested for unknown book");
        return Ok(render(checkout.state()));
    }

    // A new checkout replaces whatever this visitor had open before
    if let Some(previous) = get_checkout_id(&session).await {
        state.checkouts().remove(&previous).await;
    }

    let response = render(checkout.state());
    let (checkout_id, _) = state.checkouts().insert(checkout).await;
    set_checkout_id(&session, checkout_id).await?;

    tracing::info!(%checkout_id, "Checkout started");
    Ok(response)
}

/// Submit the checkout form.
///
/// POST /checkout
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let Some((checkout_id, shared)) = current_checkout(&state, &session).await else {
        tracing::debug!("Checkout submitted without a live session");
        return Ok(Redirect::to("/").into_response());
    };

    let submission = {
        let mut checkout = shared.lock().await;
        let phase = checkout.phase();

        if !phase.accepts_submit() {
            tracing::info!(%checkout_id, %phase, "Ignoring submit");
            return Ok(render(checkout.state()));
        }

        checkout.set_form(&form);

        if let Err(errors) = form.validate() {
            tracing::debug!(%checkout_id, errors = errors.len(), "Checkout form invalid");
            let Some(book) = checkout.book() else {
                return Err(AppError::Internal("checkout without a book".to_string()));
            };
            let template = CheckoutFormTemplate {
                book: BookView::from(book),
                form,
                field_errors: FieldErrorsView::from(errors.as_slice()),
                error: checkout.error_message().map(String::from),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }

        checkout
            .begin_submit()
            .ok_or_else(|| AppError::Internal("submit rejected after phase check".to_string()))?
    };

    let book_id = submission.book_id.to_string();
    add_breadcrumb(
        "checkout",
        "Order submitted",
        Some(&[("book_id", book_id.as_str())]),
    );

    // The order call runs to completion even if this request is dropped
    let task_state = state.clone();
    let task_checkout = shared.clone();
    let placement = tokio::spawn(async move {
        let outcome = task_state
            .orders()
            .place_order(&submission.to_request())
            .await;
        let mut checkout = task_checkout.lock().await;
        checkout.finish_submit(outcome);
        checkout.state().clone()
    });

    // Render this submission's outcome, even if another request has moved
    // the session on since
    let outcome = placement
        .await
        .map_err(|e| AppError::Internal(format!("order task failed: {e}")))?;
    let phase = outcome.phase();
    tracing::info!(
        %checkout_id,
        %book_id,
        %phase,
        "Order submission finished"
    );

    // The cookie session is left alone: it may already point at a newer
    // checkout opened while this order was in flight
    if phase == CheckoutPhase::Complete {
        state.checkouts().remove(&checkout_id).await;
    }

    Ok(render(&outcome))
}
