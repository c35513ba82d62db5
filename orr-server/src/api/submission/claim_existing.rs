use axum::{Json, http::StatusCode, response::IntoResponse};
use kanau::processor::Processor;
use orr_core::entities::ChangeKind;
use orr_core::entities::pending_ownership_claim::{
    ClaimTarget, InsertOwnershipClaim, OwnershipClaimPayload,
};
use orr_core::entities::vehicle::GetVehicleById;
use orr_core::framework::DatabaseProcessor;
use orr_sdk::objects::submission::{ExistingVehicleClaimRequest, SubmissionAccepted};

use super::{SubmissionApiError, notify_operators, stage_profile_if_missing};
use crate::api::extractors::SubmitterIdentity;
use crate::state::AppState;

/// `POST /claims/existing` — stage an ownership claim on a cataloged
/// vehicle.
pub(super) async fn claim_existing(
    state: axum::extract::State<AppState>,
    SubmitterIdentity(identity): SubmitterIdentity,
    Json(body): Json<ExistingVehicleClaimRequest>,
) -> Result<impl IntoResponse, SubmissionApiError> {
    if body.owner.display_name.trim().is_empty() {
        return Err(SubmissionApiError::Validation(
            "owner display_name must not be empty".into(),
        ));
    }
    if let Some(date_end) = body.date_end {
        if date_end < body.date_start {
            return Err(SubmissionApiError::Validation(
                "date_end must not precede date_start".into(),
            ));
        }
    }

    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let vehicle = processor
        .process(GetVehicleById {
            vehicle_id: body.vehicle_id,
        })
        .await
        .map_err(SubmissionApiError::Database)?
        .ok_or(SubmissionApiError::NotFound("vehicle"))?;

    stage_profile_if_missing(&state, &identity, &body.owner).await?;

    let payload = OwnershipClaimPayload {
        vehicle: ClaimTarget::Existing {
            vehicle: vehicle.id,
        },
        owner: body.owner,
        date_start: body.date_start,
        date_end: body.date_end,
        notes: body.notes,
    };

    let pending_id = processor
        .process(InsertOwnershipClaim {
            submitter_identity: identity,
            payload,
        })
        .await
        .map_err(SubmissionApiError::Database)?;

    notify_operators(&state, ChangeKind::OwnershipClaim, pending_id).await;

    Ok((StatusCode::CREATED, Json(SubmissionAccepted { pending_id })))
}
