use axum::extract::{Multipart, Path};
use axum::{Json, http::StatusCode, response::IntoResponse};
use kanau::processor::Processor;
use orr_core::entities::ChangeKind;
use orr_core::entities::owner_profile::GetOwnerProfileById;
use orr_core::entities::pending_photo::InsertPendingPhoto;
use orr_core::entities::vehicle::GetVehicleById;
use orr_core::framework::DatabaseProcessor;
use orr_core::photo_store::PhotoStore;
use orr_sdk::objects::submission::SubmissionAccepted;
use uuid::Uuid;

use super::{SubmissionApiError, notify_operators};
use crate::api::extractors::SubmitterIdentity;
use crate::state::AppState;

/// `POST /photos/{vehicle_id}` — stage a photo for a vehicle.
///
/// Multipart form with a single `photo` file part. Only the vehicle's
/// current owner may submit: the bytes land in the pending namespace and
/// a staging row is inserted for the moderation queue.
pub(super) async fn upload_photo(
    state: axum::extract::State<AppState>,
    SubmitterIdentity(identity): SubmitterIdentity,
    Path(vehicle_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, SubmissionApiError> {
    let mut photo: Option<(bytes::Bytes, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SubmissionApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| SubmissionApiError::Validation(format!("unreadable photo: {e}")))?;
        photo = Some((bytes, content_type));
    }

    let (bytes, content_type) =
        photo.ok_or_else(|| SubmissionApiError::Validation("missing photo field".into()))?;
    if bytes.is_empty() {
        return Err(SubmissionApiError::Validation("photo is empty".into()));
    }

    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let vehicle = processor
        .process(GetVehicleById { vehicle_id })
        .await
        .map_err(SubmissionApiError::Database)?
        .ok_or(SubmissionApiError::NotFound("vehicle"))?;

    // Only the current owner may attach photos.
    let owner_id = vehicle.current_owner.ok_or(SubmissionApiError::NotOwner)?;
    let owner = processor
        .process(GetOwnerProfileById {
            profile_id: owner_id,
        })
        .await
        .map_err(SubmissionApiError::Database)?
        .ok_or(SubmissionApiError::NotOwner)?;
    if owner.submitter_identity != identity {
        return Err(SubmissionApiError::NotOwner);
    }

    state
        .photos
        .put_pending(vehicle_id, bytes)
        .await
        .map_err(SubmissionApiError::Storage)?;

    let pending_id = processor
        .process(InsertPendingPhoto {
            vehicle: vehicle_id,
            submitter_identity: identity,
            object_key: PhotoStore::pending_key(vehicle_id),
            content_type,
        })
        .await
        .map_err(SubmissionApiError::Database)?;

    notify_operators(&state, ChangeKind::Photo, pending_id).await;

    Ok((StatusCode::CREATED, Json(SubmissionAccepted { pending_id })))
}
