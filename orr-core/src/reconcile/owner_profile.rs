use super::{ReconcileError, ReconcileHandler, ReconcileOutcome, is_unique_violation};
use crate::entities::ReviewStatus;
use crate::entities::owner_profile::OwnerProfile;
use crate::entities::pending_owner_profile::PendingOwnerProfile;
use async_trait::async_trait;
use uuid::Uuid;

/// Inserts approved owner profiles.
///
/// This path only ever creates; it never edits an existing profile. The
/// unique constraint on the identity is the authoritative duplicate
/// guard and surfaces as a conflict here.
pub struct OwnerProfileHandler;

#[async_trait]
impl ReconcileHandler for OwnerProfileHandler {
    async fn approve_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let row = PendingOwnerProfile::claim_tx(tx, pending_id, ReviewStatus::Approved)
            .await?
            .ok_or(ReconcileError::AlreadyProcessed)?;

        OwnerProfile::insert_tx(tx, &row.submitter_identity, &row.payload.0)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ReconcileError::Conflict("a profile already exists for this identity")
                } else {
                    e.into()
                }
            })?;

        Ok(ReconcileOutcome {
            notify_recipient: Some(row.submitter_identity),
            ..Default::default()
        })
    }

    async fn reject_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<(), ReconcileError> {
        PendingOwnerProfile::claim_tx(tx, pending_id, ReviewStatus::Rejected)
            .await?
            .ok_or(ReconcileError::AlreadyProcessed)?;
        Ok(())
    }
}
