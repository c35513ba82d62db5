//! Moderation API handlers.
//!
//! These endpoints are called by the moderation dashboard frontend and
//! require the `Orr-Moderator-Authorization` header with the plaintext
//! moderator secret.
//!
//! # Endpoints
//!
//! - `GET  /moderation/stats`                 – pending/approved/rejected counts
//! - `GET  /moderation/{kind}`                – list pending changes with diffs
//! - `POST /moderation/{kind}/{id}/approve`   – merge a change into canonical storage
//! - `POST /moderation/{kind}/{id}/reject`    – discard a change

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use orr_core::moderation::ModerationError;
use orr_core::reconcile::ReconcileError;
use orr_sdk::objects::ErrorBody;

use crate::state::AppState;

mod approve;
mod list_pending;
mod reject;
mod stats;

/// Build the Moderation API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::stats))
        .route("/{kind}", get(list_pending::list_pending))
        .route("/{kind}/{id}/approve", post(approve::approve))
        .route("/{kind}/{id}/reject", post(reject::reject))
}

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

/// Errors that can occur in Moderation API handlers.
#[derive(Debug)]
pub(crate) enum ModerationApiError {
    Queue(ModerationError),
    Reconcile(ReconcileError),
    Database(sqlx::Error),
}

impl IntoResponse for ModerationApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ModerationApiError::Reconcile(ReconcileError::AlreadyProcessed) => (
                StatusCode::CONFLICT,
                ErrorBody::with_details(
                    "conflict",
                    "change was already approved or rejected",
                ),
            ),
            ModerationApiError::Reconcile(ReconcileError::NotFound(what)) => (
                StatusCode::NOT_FOUND,
                ErrorBody::with_details("not_found", format!("{what} not found")),
            ),
            ModerationApiError::Reconcile(ReconcileError::Conflict(details)) => {
                (StatusCode::CONFLICT, ErrorBody::with_details("conflict", details))
            }
            ModerationApiError::Reconcile(e) => {
                tracing::error!(error = %e, "Moderation API reconcile error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("internal server error"),
                )
            }
            ModerationApiError::Queue(e) => {
                tracing::error!(error = %e, "Moderation API queue error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("internal server error"),
                )
            }
            ModerationApiError::Database(e) => {
                tracing::error!(error = %e, "Moderation API database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("internal server error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
