//! Read-only joins of the pending store against canonical storage,
//! producing the moderation queue entries the dashboard renders.

use crate::entities::owner_profile::GetOwnerProfileByIdentity;
use crate::entities::ownership_interval::GetIntervalForPair;
use crate::entities::pending_owner_profile::ListPendingOwnerProfiles;
use crate::entities::pending_ownership_claim::ListPendingOwnershipClaims;
use crate::entities::pending_photo::ListPendingPhotos;
use crate::entities::pending_vehicle_edit::ListPendingVehicleEdits;
use crate::entities::vehicle::GetVehicleById;
use crate::entities::{ChangeKind, ReviewStatus};
use crate::framework::DatabaseProcessor;
use crate::moderation::diff_fields;
use kanau::processor::Processor;
use orr_sdk::objects::moderation::ModerationItem;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while building the moderation queue.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("payload serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// List the pending entries of one staged kind, joined against canonical
/// storage by natural key, with a field-level diff.
#[derive(Debug, Clone, Copy)]
pub struct ListModerationQueue {
    pub kind: ChangeKind,
}

impl Processor<ListModerationQueue> for DatabaseProcessor {
    type Output = Vec<ModerationItem>;
    type Error = ModerationError;
    #[tracing::instrument(skip_all, err, name = "ModerationQueue", fields(kind = %query.kind))]
    async fn process(
        &self,
        query: ListModerationQueue,
    ) -> Result<Vec<ModerationItem>, ModerationError> {
        match query.kind {
            ChangeKind::VehicleEdit => self.list_vehicle_edits().await,
            ChangeKind::OwnershipClaim => self.list_ownership_claims().await,
            ChangeKind::OwnerProfile => self.list_owner_profiles().await,
            ChangeKind::Photo => self.list_photos().await,
        }
    }
}

fn item(
    id: Uuid,
    created_at: time::PrimitiveDateTime,
    status: ReviewStatus,
    current: Option<serde_json::Value>,
    proposed: serde_json::Value,
) -> ModerationItem {
    let diff = diff_fields(current.as_ref(), &proposed);
    ModerationItem {
        id,
        created_at: created_at.assume_utc().unix_timestamp(),
        status: status.into(),
        current,
        proposed,
        diff,
    }
}

impl DatabaseProcessor {
    async fn list_vehicle_edits(&self) -> Result<Vec<ModerationItem>, ModerationError> {
        let rows = self.process(ListPendingVehicleEdits).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            // Join by vehicle id; an edit of a vanished vehicle renders
            // with no canonical side.
            let current = self
                .process(GetVehicleById {
                    vehicle_id: row.vehicle,
                })
                .await?
                .map(|v| v.fact_fields());
            let proposed = serde_json::to_value(&row.payload.0)?;
            items.push(item(row.id, row.created_at, row.status, current, proposed));
        }
        Ok(items)
    }

    async fn list_ownership_claims(&self) -> Result<Vec<ModerationItem>, ModerationError> {
        let rows = self.process(ListPendingOwnershipClaims).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            // Natural key is the (vehicle, owner) composite. New-vehicle
            // claims have no canonical side at all.
            let mut current = None;
            if let Some(vehicle_id) = row.vehicle {
                let profile = self
                    .process(GetOwnerProfileByIdentity {
                        identity: row.submitter_identity.clone(),
                    })
                    .await?;
                if let Some(profile) = profile {
                    current = self
                        .process(GetIntervalForPair {
                            vehicle_id,
                            owner_id: profile.id,
                        })
                        .await?
                        .map(|interval| interval.interval_fields());
                }
            }
            let proposed = serde_json::to_value(&row.payload.0)?;
            items.push(item(row.id, row.created_at, row.status, current, proposed));
        }
        Ok(items)
    }

    async fn list_owner_profiles(&self) -> Result<Vec<ModerationItem>, ModerationError> {
        let rows = self.process(ListPendingOwnerProfiles).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let current = self
                .process(GetOwnerProfileByIdentity {
                    identity: row.submitter_identity.clone(),
                })
                .await?
                .map(|p| p.profile_fields());
            let proposed = serde_json::to_value(&row.payload.0)?;
            items.push(item(row.id, row.created_at, row.status, current, proposed));
        }
        Ok(items)
    }

    async fn list_photos(&self) -> Result<Vec<ModerationItem>, ModerationError> {
        let rows = self.process(ListPendingPhotos).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let proposed = row.proposed_fields();
                item(row.id, row.created_at, row.status, None, proposed)
            })
            .collect())
    }
}
