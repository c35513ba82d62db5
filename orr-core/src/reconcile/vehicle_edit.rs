use super::{ReconcileError, ReconcileHandler, ReconcileOutcome};
use crate::entities::ReviewStatus;
use crate::entities::pending_vehicle_edit::PendingVehicleEdit;
use crate::entities::vehicle::Vehicle;
use async_trait::async_trait;
use smallvec::smallvec;
use uuid::Uuid;

/// Merges approved fact-field edits into the canonical vehicle.
///
/// An edit never creates a vehicle: a missing canonical row fails the
/// approval and the change stays pending.
pub struct VehicleEditHandler;

#[async_trait]
impl ReconcileHandler for VehicleEditHandler {
    async fn approve_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let row = PendingVehicleEdit::claim_tx(tx, pending_id, ReviewStatus::Approved)
            .await?
            .ok_or(ReconcileError::AlreadyProcessed)?;

        let mut vehicle = Vehicle::get_for_update_tx(tx, row.vehicle)
            .await?
            .ok_or(ReconcileError::NotFound("vehicle"))?;

        vehicle.apply_edit(&row.payload.0);
        Vehicle::update_facts_tx(tx, &vehicle).await?;

        Ok(ReconcileOutcome {
            touched_vehicles: smallvec![row.vehicle],
            notify_recipient: row.submitter_identity,
            discard_pending_photo: None,
        })
    }

    async fn reject_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<(), ReconcileError> {
        PendingVehicleEdit::claim_tx(tx, pending_id, ReviewStatus::Rejected)
            .await?
            .ok_or(ReconcileError::AlreadyProcessed)?;
        Ok(())
    }
}
