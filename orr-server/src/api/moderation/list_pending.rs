use axum::{Json, extract::Path, response::IntoResponse};
use kanau::processor::Processor;
use orr_core::framework::DatabaseProcessor;
use orr_core::moderation::ListModerationQueue;
use orr_sdk::objects::ChangeKind;

use super::ModerationApiError;
use crate::api::extractors::ModeratorAuth;
use crate::state::AppState;

/// `GET /moderation/{kind}` — list pending changes of one kind, joined
/// against canonical storage with a field-level diff.
pub async fn list_pending(
    state: axum::extract::State<AppState>,
    _auth: ModeratorAuth,
    Path(kind): Path<ChangeKind>,
) -> Result<impl IntoResponse, ModerationApiError> {
    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let items = processor
        .process(ListModerationQueue { kind: kind.into() })
        .await
        .map_err(ModerationApiError::Queue)?;

    Ok(Json(items))
}
