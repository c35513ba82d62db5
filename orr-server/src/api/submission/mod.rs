//! Submission API handlers.
//!
//! These endpoints accept community submissions into the pending store.
//! Nothing here writes canonical storage; every mutation waits for a
//! moderator decision.
//!
//! # Endpoints
//!
//! - `POST /claims/new`          – new vehicle + first owner (identity token)
//! - `POST /claims/existing`     – ownership claim on a cataloged vehicle (identity token)
//! - `POST /tips`                – anonymous fact-field tip (multipart, no auth)
//! - `POST /photos/{vehicle_id}` – photo upload (multipart, current owner only)

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use kanau::processor::Processor;
use orr_core::entities::ChangeKind;
use orr_core::entities::owner_profile::GetOwnerProfileByIdentity;
use orr_core::entities::pending_owner_profile::InsertOwnerProfileDraft;
use orr_core::events::NotifyEvent;
use orr_core::framework::DatabaseProcessor;
use orr_sdk::objects::ErrorBody;
use orr_sdk::objects::submission::OwnerDraft;
use uuid::Uuid;

use crate::state::AppState;

mod claim_existing;
mod claim_new;
mod tip;
mod upload_photo;

/// Build the Submission API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/claims/new", post(claim_new::claim_new))
        .route("/claims/existing", post(claim_existing::claim_existing))
        .route("/tips", post(tip::submit_tip))
        .route("/photos/{vehicle_id}", post(upload_photo::upload_photo))
}

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

/// Errors that can occur in Submission API handlers.
#[derive(Debug)]
pub(crate) enum SubmissionApiError {
    /// Malformed or missing submission fields.
    Validation(String),
    /// A referenced canonical entity or edition is absent.
    NotFound(&'static str),
    /// The submitter is not the vehicle's current owner.
    NotOwner,
    /// A database query failed.
    Database(sqlx::Error),
    /// Writing to the pending object namespace failed.
    Storage(object_store::Error),
}

impl IntoResponse for SubmissionApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            SubmissionApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::with_details("validation", details),
            ),
            SubmissionApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorBody::with_details("not_found", format!("{what} not found")),
            ),
            SubmissionApiError::NotOwner => (
                StatusCode::FORBIDDEN,
                ErrorBody::with_details(
                    "unauthorized",
                    "only the current owner may submit photos for this vehicle",
                ),
            ),
            SubmissionApiError::Database(e) => {
                tracing::error!(error = %e, "Submission API database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("internal server error"),
                )
            }
            SubmissionApiError::Storage(e) => {
                tracing::error!(error = %e, "Submission API storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("internal server error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Queue a best-effort operator notification for a fresh submission.
/// Failures are logged and never surfaced to the caller.
pub(crate) async fn notify_operators(state: &AppState, kind: ChangeKind, pending_id: Uuid) {
    let event = NotifyEvent::SubmissionReceived { kind, pending_id };
    if let Err(e) = state.notify_tx.send(event).await {
        tracing::warn!(
            kind = %kind,
            pending_id = %pending_id,
            error = %e,
            "failed to queue operator notification"
        );
    }
}

/// Stage an owner-profile creation alongside a claim when the submitter
/// has no canonical profile yet.
///
/// The canonical-profile check is the fast path; the unique constraint on
/// the identity remains the authoritative guard at approval time.
pub(crate) async fn stage_profile_if_missing(
    state: &AppState,
    identity: &str,
    owner: &OwnerDraft,
) -> Result<Option<Uuid>, SubmissionApiError> {
    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let existing = processor
        .process(GetOwnerProfileByIdentity {
            identity: identity.to_owned(),
        })
        .await
        .map_err(SubmissionApiError::Database)?;
    if existing.is_some() {
        return Ok(None);
    }

    let pending_id = processor
        .process(InsertOwnerProfileDraft {
            submitter_identity: identity.to_owned(),
            payload: owner.clone(),
        })
        .await
        .map_err(SubmissionApiError::Database)?;

    notify_operators(state, ChangeKind::OwnerProfile, pending_id).await;
    Ok(Some(pending_id))
}
