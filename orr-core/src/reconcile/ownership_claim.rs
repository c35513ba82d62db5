use super::{ReconcileError, ReconcileHandler, ReconcileOutcome, is_unique_violation};
use crate::entities::ReviewStatus;
use crate::entities::owner_profile::OwnerProfile;
use crate::entities::ownership_interval::{ClaimPlan, OwnershipInterval, plan_claim};
use crate::entities::pending_ownership_claim::{ClaimTarget, PendingOwnershipClaim};
use crate::entities::vehicle::Vehicle;
use async_trait::async_trait;
use smallvec::smallvec;
use uuid::Uuid;

/// Applies approved ownership claims.
///
/// A claim whose `(vehicle, owner)` interval already exists is an
/// in-place correction of that interval's dates and notes. Anything else
/// is a genuine handover: close the open interval with the incoming start
/// date, insert the new open interval, repoint the current-owner pointer.
/// Everything, including materializing a brand-new vehicle or owner
/// profile from the claim's drafts, commits atomically with the status
/// transition.
pub struct OwnershipClaimHandler;

impl OwnershipClaimHandler {
    async fn resolve_vehicle_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        target: &ClaimTarget,
    ) -> Result<Uuid, ReconcileError> {
        match target {
            ClaimTarget::Existing { vehicle } => {
                let vehicle = Vehicle::get_for_update_tx(tx, *vehicle)
                    .await?
                    .ok_or(ReconcileError::NotFound("vehicle"))?;
                Ok(vehicle.id)
            }
            ClaimTarget::New(draft) => {
                // The claim may have been approved after an earlier claim
                // already materialized the same VIN.
                match Vehicle::get_by_vin_for_update_tx(tx, &draft.vin).await? {
                    Some(vehicle) => Ok(vehicle.id),
                    None => {
                        Ok(Vehicle::insert_new_tx(tx, &draft.vin, draft.edition, draft.sequence)
                            .await?)
                    }
                }
            }
        }
    }

    async fn resolve_owner_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        identity: &str,
        draft: &orr_sdk::objects::submission::OwnerDraft,
    ) -> Result<Uuid, ReconcileError> {
        if let Some(profile) = OwnerProfile::get_by_identity_tx(tx, identity).await? {
            return Ok(profile.id);
        }
        OwnerProfile::insert_tx(tx, identity, draft)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ReconcileError::Conflict("a profile already exists for this identity")
                } else {
                    e.into()
                }
            })
    }
}

#[async_trait]
impl ReconcileHandler for OwnershipClaimHandler {
    async fn approve_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let row = PendingOwnershipClaim::claim_tx(tx, pending_id, ReviewStatus::Approved)
            .await?
            .ok_or(ReconcileError::AlreadyProcessed)?;
        let payload = &row.payload.0;

        let vehicle_id = Self::resolve_vehicle_tx(tx, &payload.vehicle).await?;
        let owner_id = Self::resolve_owner_tx(tx, &row.submitter_identity, &payload.owner).await?;

        let pair = OwnershipInterval::get_for_pair_tx(tx, vehicle_id, owner_id).await?;
        match plan_claim(pair.as_ref()) {
            ClaimPlan::Correct { interval_id } => {
                OwnershipInterval::update_dates_tx(
                    tx,
                    interval_id,
                    payload.date_start,
                    payload.date_end,
                    payload.notes.as_deref(),
                )
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        ReconcileError::Conflict(
                            "vehicle already has an open ownership interval",
                        )
                    } else {
                        e.into()
                    }
                })?;
                // The correction may have opened or closed the vehicle's
                // open interval; re-derive the pointer from it.
                OwnershipInterval::sync_current_owner_tx(tx, vehicle_id).await?;
            }
            ClaimPlan::Handover => {
                OwnershipInterval::record_handover_tx(
                    tx,
                    vehicle_id,
                    owner_id,
                    payload.date_start,
                    payload.notes.as_deref(),
                )
                .await?;
            }
        }

        Ok(ReconcileOutcome {
            touched_vehicles: smallvec![vehicle_id],
            notify_recipient: Some(row.submitter_identity),
            discard_pending_photo: None,
        })
    }

    async fn reject_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<(), ReconcileError> {
        PendingOwnershipClaim::claim_tx(tx, pending_id, ReviewStatus::Rejected)
            .await?
            .ok_or(ReconcileError::AlreadyProcessed)?;
        Ok(())
    }
}
