use axum::{Json, extract::Path, response::IntoResponse};
use orr_sdk::objects::ChangeKind;
use orr_sdk::objects::moderation::ActionResponse;
use uuid::Uuid;

use super::ModerationApiError;
use crate::api::extractors::ModeratorAuth;
use crate::state::AppState;

/// `POST /moderation/{kind}/{id}/approve` — merge a staged change into
/// canonical storage.
///
/// The reconciler guards against double approval; a change that already
/// left `pending` surfaces as 409 without touching canonical state.
pub async fn approve(
    state: axum::extract::State<AppState>,
    _auth: ModeratorAuth,
    Path((kind, id)): Path<(ChangeKind, Uuid)>,
) -> Result<impl IntoResponse, ModerationApiError> {
    state
        .reconciler
        .approve(kind.into(), id)
        .await
        .map_err(ModerationApiError::Reconcile)?;

    Ok(Json(ActionResponse { success: true }))
}
