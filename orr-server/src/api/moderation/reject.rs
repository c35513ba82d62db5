use axum::{Json, extract::Path, response::IntoResponse};
use orr_sdk::objects::ChangeKind;
use orr_sdk::objects::moderation::ActionResponse;
use uuid::Uuid;

use super::ModerationApiError;
use crate::api::extractors::ModeratorAuth;
use crate::state::AppState;

/// `POST /moderation/{kind}/{id}/reject` — discard a staged change.
/// No canonical mutation, no cache invalidation, no notification.
pub async fn reject(
    state: axum::extract::State<AppState>,
    _auth: ModeratorAuth,
    Path((kind, id)): Path<(ChangeKind, Uuid)>,
) -> Result<impl IntoResponse, ModerationApiError> {
    state
        .reconciler
        .reject(kind.into(), id)
        .await
        .map_err(ModerationApiError::Reconcile)?;

    Ok(Json(ActionResponse { success: true }))
}
