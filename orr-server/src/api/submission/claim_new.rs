use axum::{Json, http::StatusCode, response::IntoResponse};
use kanau::processor::Processor;
use orr_core::entities::ChangeKind;
use orr_core::entities::edition::{GetEditionByYearName, parse_edition_label};
use orr_core::entities::pending_ownership_claim::{
    ClaimTarget, InsertOwnershipClaim, NewVehicleDraft, OwnershipClaimPayload,
};
use orr_core::framework::DatabaseProcessor;
use orr_sdk::objects::submission::{NewVehicleClaimRequest, SubmissionAccepted};

use super::{SubmissionApiError, notify_operators, stage_profile_if_missing};
use crate::api::extractors::SubmitterIdentity;
use crate::state::AppState;

/// `POST /claims/new` — stage an ownership claim for a vehicle the
/// catalog has never seen.
///
/// The edition is resolved from the `"{year} {name}"` label now so the
/// moderator reviews a claim that already points at a real edition; the
/// vehicle row itself is only materialized on approval.
pub(super) async fn claim_new(
    state: axum::extract::State<AppState>,
    SubmitterIdentity(identity): SubmitterIdentity,
    Json(body): Json<NewVehicleClaimRequest>,
) -> Result<impl IntoResponse, SubmissionApiError> {
    if body.vin.trim().is_empty() {
        return Err(SubmissionApiError::Validation("vin must not be empty".into()));
    }
    if body.sequence <= 0 {
        return Err(SubmissionApiError::Validation(
            "sequence must be a positive number".into(),
        ));
    }
    if body.owner.display_name.trim().is_empty() {
        return Err(SubmissionApiError::Validation(
            "owner display_name must not be empty".into(),
        ));
    }
    let Some((year, name)) = parse_edition_label(&body.edition_name) else {
        return Err(SubmissionApiError::Validation(
            "edition_name must look like \"1991 British Racing Green\"".into(),
        ));
    };

    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let edition = processor
        .process(GetEditionByYearName {
            year,
            name: name.to_owned(),
        })
        .await
        .map_err(SubmissionApiError::Database)?
        .ok_or(SubmissionApiError::NotFound("edition"))?;

    stage_profile_if_missing(&state, &identity, &body.owner).await?;

    let payload = OwnershipClaimPayload {
        vehicle: ClaimTarget::New(NewVehicleDraft {
            edition_name: body.edition_name,
            edition: edition.id,
            sequence: body.sequence,
            vin: body.vin,
        }),
        owner: body.owner,
        date_start: body.date_start,
        date_end: None,
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
