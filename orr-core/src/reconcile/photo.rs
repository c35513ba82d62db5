use super::{ReconcileError, ReconcileHandler, ReconcileOutcome};
use crate::entities::ReviewStatus;
use crate::entities::pending_photo::PendingPhoto;
use crate::photo_store::PhotoStore;
use async_trait::async_trait;
use smallvec::smallvec;
use uuid::Uuid;

/// Promotes approved photos from the pending to the canonical namespace.
///
/// The copy happens before commit, so a storage failure rolls the status
/// transition back and the submission stays pending. Deleting the
/// pending copy is deferred until after commit; a failed delete leaves
/// an orphan object, not an inconsistency.
pub struct PhotoHandler {
    photos: PhotoStore,
}

impl PhotoHandler {
    pub fn new(photos: PhotoStore) -> Self {
        Self { photos }
    }
}

#[async_trait]
impl ReconcileHandler for PhotoHandler {
    async fn approve_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let row = PendingPhoto::claim_tx(tx, pending_id, ReviewStatus::Approved)
            .await?
            .ok_or(ReconcileError::AlreadyProcessed)?;

        self.photos.promote(row.vehicle).await?;

        Ok(ReconcileOutcome {
            touched_vehicles: smallvec![row.vehicle],
            notify_recipient: Some(row.submitter_identity),
            discard_pending_photo: Some(row.vehicle),
        })
    }

    async fn reject_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<(), ReconcileError> {
        PendingPhoto::claim_tx(tx, pending_id, ReviewStatus::Rejected)
            .await?
            .ok_or(ReconcileError::AlreadyProcessed)?;
        Ok(())
    }
}
