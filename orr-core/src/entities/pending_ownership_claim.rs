use crate::entities::ReviewStatus;
use crate::framework::DatabaseProcessor;
use crate::stats::{StatusCounts, count_table};
use kanau::processor::Processor;
use orr_sdk::objects::submission::OwnerDraft;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TABLE: &str = "pending_ownership_claims";

/// The vehicle an ownership claim targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClaimTarget {
    /// A vehicle already in the catalog.
    Existing { vehicle: Uuid },
    /// A vehicle the catalog has never seen; materialized on approval.
    New(NewVehicleDraft),
}

/// Draft of a not-yet-canonical vehicle, carried inside a new-vehicle claim.
///
/// `edition_name`, `sequence` and `vin` are stored verbatim as submitted;
/// `edition` is the id resolved from the label at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVehicleDraft {
    pub edition_name: String,
    pub edition: Uuid,
    pub sequence: i32,
    pub vin: String,
}

/// Staged ownership claim payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipClaimPayload {
    pub vehicle: ClaimTarget,
    pub owner: OwnerDraft,
    pub date_start: time::Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<time::Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A staged ownership claim.
///
/// `vehicle` is the canonical vehicle id for existing-vehicle claims and
/// `NULL` for new-vehicle claims (the natural-key join has nothing to
/// join against yet).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingOwnershipClaim {
    pub id: Uuid,
    pub vehicle: Option<Uuid>,
    pub submitter_identity: String,
    pub status: ReviewStatus,
    pub created_at: time::PrimitiveDateTime,
    pub payload: sqlx::types::Json<OwnershipClaimPayload>,
}

const SELECT_CLAIM: &str = r#"
    SELECT id, vehicle, submitter_identity, status, created_at, payload
    FROM pending_ownership_claims
"#;

impl PendingOwnershipClaim {
    /// Conditional status transition; see
    /// [`PendingVehicleEdit::claim_tx`](crate::entities::pending_vehicle_edit::PendingVehicleEdit::claim_tx).
    pub async fn claim_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
        status: ReviewStatus,
    ) -> Result<Option<PendingOwnershipClaim>, sqlx::Error> {
        sqlx::query_as::<_, PendingOwnershipClaim>(
            r#"
            UPDATE pending_ownership_claims
            SET status = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING id, vehicle, submitter_identity, status, created_at, payload
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut **tx)
        .await
    }

    pub async fn count_by_status(pool: &sqlx::PgPool) -> Result<StatusCounts, sqlx::Error> {
        count_table(pool, TABLE).await
    }
}

/// Stage an ownership claim.
#[derive(Debug, Clone)]
pub struct InsertOwnershipClaim {
    pub submitter_identity: String,
    pub payload: OwnershipClaimPayload,
}

impl Processor<InsertOwnershipClaim> for DatabaseProcessor {
    type Output = Uuid;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertOwnershipClaim")]
    async fn process(&self, insert: InsertOwnershipClaim) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::now_v7();
        let vehicle = match &insert.payload.vehicle {
            ClaimTarget::Existing { vehicle } => Some(*vehicle),
            ClaimTarget::New(_) => None,
        };
        sqlx::query(
            r#"
            INSERT INTO pending_ownership_claims (id, vehicle, submitter_identity, payload)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(vehicle)
        .bind(&insert.submitter_identity)
        .bind(sqlx::types::Json(&insert.payload))
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}

/// List staged ownership claims awaiting review, oldest first.
#[derive(Debug, Clone, Copy)]
pub struct ListPendingOwnershipClaims;

impl Processor<ListPendingOwnershipClaims> for DatabaseProcessor {
    type Output = Vec<PendingOwnershipClaim>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListPendingOwnershipClaims")]
    async fn process(
        &self,
        _query: ListPendingOwnershipClaims,
    ) -> Result<Vec<PendingOwnershipClaim>, sqlx::Error> {
        sqlx::query_as::<_, PendingOwnershipClaim>(&format!(
            "{SELECT_CLAIM} WHERE status = 'pending' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn new_vehicle_claim_payload_carries_draft_verbatim() {
        let payload = OwnershipClaimPayload {
            vehicle: ClaimTarget::New(NewVehicleDraft {
                edition_name: "1991 British Racing Green".to_owned(),
                edition: Uuid::now_v7(),
                sequence: 182,
                vin: "JM1NA3510M1221538".to_owned(),
            }),
            owner: OwnerDraft {
                display_name: "Sam".to_owned(),
                location: None,
                links: vec![],
            },
            date_start: date!(2023 - 06 - 01),
            date_end: None,
            notes: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        let vehicle = &json["vehicle"];
        assert_eq!(vehicle["edition_name"], "1991 British Racing Green");
        assert_eq!(vehicle["sequence"], 182);
        assert_eq!(vehicle["vin"], "JM1NA3510M1221538");

        let back: OwnershipClaimPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }
}
