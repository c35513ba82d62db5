use axum::{Json, response::IntoResponse};
use kanau::processor::Processor;
use orr_core::framework::DatabaseProcessor;
use orr_core::stats::CountsByStatus;
use orr_sdk::objects::moderation::StatsResponse;

use super::ModerationApiError;
use crate::api::extractors::ModeratorAuth;
use crate::state::AppState;

/// `GET /moderation/stats` — pending/approved/rejected totals across
/// every staged kind.
pub async fn stats(
    state: axum::extract::State<AppState>,
    _auth: ModeratorAuth,
) -> Result<impl IntoResponse, ModerationApiError> {
    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let counts = processor
        .process(CountsByStatus)
        .await
        .map_err(ModerationApiError::Database)?;

    Ok(Json(StatsResponse::from(counts)))
}
