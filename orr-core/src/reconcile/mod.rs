//! The approve/reject state machine.
//!
//! Every staged change moves `pending -> approved | rejected` exactly once.
//! Approval applies the kind-specific merge to canonical storage inside a
//! single database transaction together with the status transition, so a
//! failed merge leaves the change `pending` and a concurrent second
//! approval observes [`ReconcileError::AlreadyProcessed`].
//!
//! Cache invalidation and submitter notification run after commit and are
//! advisory: their failures are logged and never change the outcome.

mod owner_profile;
mod ownership_claim;
mod photo;
mod vehicle_edit;

pub use owner_profile::OwnerProfileHandler;
pub use ownership_claim::OwnershipClaimHandler;
pub use photo::PhotoHandler;
pub use vehicle_edit::VehicleEditHandler;

use crate::cache::DerivedCache;
use crate::entities::ChangeKind;
use crate::events::{NotifyEvent, NotifyEventSender};
use crate::photo_store::PhotoStore;
use async_trait::async_trait;
use itertools::Itertools;
use smallvec::SmallVec;
use sqlx::PgPool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Errors that can occur during reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The change already left `pending`; nothing was mutated.
    #[error("change was already approved or rejected")]
    AlreadyProcessed,

    /// A canonical entity the change references does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The merge collides with canonical state (e.g. a profile already
    /// exists for the identity).
    #[error("conflict: {0}")]
    Conflict(&'static str),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Object storage error
    #[error("object storage error: {0}")]
    Storage(#[from] object_store::Error),
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// What a successful approval asks the reconciler to do after commit.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Vehicles whose derived cache entries must be dropped.
    pub touched_vehicles: SmallVec<[Uuid; 2]>,
    /// Submitter to notify, when resolvable.
    pub notify_recipient: Option<String>,
    /// Vehicle whose pending photo object should be deleted now that the
    /// canonical copy is durable.
    pub discard_pending_photo: Option<Uuid>,
}

/// One staged kind's merge logic.
///
/// Implementations must perform the conditional status transition first
/// and surface [`ReconcileError::AlreadyProcessed`] when the row is no
/// longer `pending`; everything they write goes through the supplied
/// transaction.
#[async_trait]
pub trait ReconcileHandler: Send + Sync {
    async fn approve_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<ReconcileOutcome, ReconcileError>;

    async fn reject_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        pending_id: Uuid,
    ) -> Result<(), ReconcileError>;
}

/// Applies approved changes to canonical storage and keeps the derived
/// cache coherent.
pub struct Reconciler {
    pool: PgPool,
    cache: DerivedCache,
    photos: PhotoStore,
    notify_tx: NotifyEventSender,
    vehicle_edits: VehicleEditHandler,
    ownership_claims: OwnershipClaimHandler,
    owner_profiles: OwnerProfileHandler,
    photo_submissions: PhotoHandler,
}

impl Reconciler {
    pub fn new(
        pool: PgPool,
        cache: DerivedCache,
        photos: PhotoStore,
        notify_tx: NotifyEventSender,
    ) -> Self {
        Self {
            pool,
            cache,
            photos: photos.clone(),
            notify_tx,
            vehicle_edits: VehicleEditHandler,
            ownership_claims: OwnershipClaimHandler,
            owner_profiles: OwnerProfileHandler,
            photo_submissions: PhotoHandler::new(photos),
        }
    }

    fn handler(&self, kind: ChangeKind) -> &dyn ReconcileHandler {
        match kind {
            ChangeKind::VehicleEdit => &self.vehicle_edits,
            ChangeKind::OwnershipClaim => &self.ownership_claims,
            ChangeKind::OwnerProfile => &self.owner_profiles,
            ChangeKind::Photo => &self.photo_submissions,
        }
    }

    /// Approve a staged change.
    #[tracing::instrument(skip(self), err, name = "Reconcile:approve")]
    pub async fn approve(&self, kind: ChangeKind, pending_id: Uuid) -> Result<(), ReconcileError> {
        let mut tx = self.pool.begin().await?;
        let outcome = self.handler(kind).approve_tx(&mut tx, pending_id).await?;
        tx.commit().await?;

        // Everything below is outside the consistency boundary.
        for vehicle in outcome.touched_vehicles.iter().copied().unique() {
            self.cache.invalidate_vehicle(vehicle).await;
        }

        if let Some(vehicle) = outcome.discard_pending_photo {
            if let Err(e) = self.photos.discard_pending(vehicle).await {
                warn!(
                    vehicle_id = %vehicle,
                    error = %e,
                    "failed to delete pending photo copy; orphan left behind"
                );
            }
        }

        if let Some(recipient) = outcome.notify_recipient {
            let event = NotifyEvent::SubmissionApproved {
                kind,
                pending_id,
                recipient,
            };
            if let Err(e) = self.notify_tx.send(event).await {
                warn!(error = %e, "failed to queue approval notification");
            }
        }

        Ok(())
    }

    /// Reject a staged change. No canonical mutation, no cache work, no
    /// notification.
    #[tracing::instrument(skip(self), err, name = "Reconcile:reject")]
    pub async fn reject(&self, kind: ChangeKind, pending_id: Uuid) -> Result<(), ReconcileError> {
        let mut tx = self.pool.begin().await?;
        self.handler(kind).reject_tx(&mut tx, pending_id).await?;
        tx.commit().await?;
        Ok(())
    }
}
