use crate::entities::ReviewStatus;
use crate::framework::DatabaseProcessor;
use crate::stats::{StatusCounts, count_table};
use kanau::processor::Processor;
use orr_sdk::objects::submission::OwnerDraft;
use uuid::Uuid;

pub const TABLE: &str = "pending_owner_profiles";

/// A staged owner-profile creation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingOwnerProfile {
    pub id: Uuid,
    pub submitter_identity: String,
    pub status: ReviewStatus,
    pub created_at: time::PrimitiveDateTime,
    pub payload: sqlx::types::Json<OwnerDraft>,
}

const SELECT_PROFILE: &str = r#"
    SELECT id, submitter_identity, status, created_at, payload
    FROM pending_owner_profiles
"#;

impl PendingOwnerProfile {
    /// Conditional status transition; see
    /// [`PendingVehicleEdit::claim_tx`](crate::entities::pending_vehicle_edit::PendingVehicleEdit::claim_tx).
    pub async fn claim_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
        status: ReviewStatus,
    ) -> Result<Option<PendingOwnerProfile>, sqlx::Error> {
        sqlx::query_as::<_, PendingOwnerProfile>(
            r#"
            UPDATE pending_owner_profiles
            SET status = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING id, submitter_identity, status, created_at, payload
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

/// Stage an owner-profile creation.
#[derive(Debug, Clone)]
pub struct InsertOwnerProfileDraft {
    pub submitter_identity: String,
    pub payload: OwnerDraft,
}

impl Processor<InsertOwnerProfileDraft> for DatabaseProcessor {
    type Output = Uuid;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertOwnerProfileDraft")]
    async fn process(&self, insert: InsertOwnerProfileDraft) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO pending_owner_profiles (id, submitter_identity, payload)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id)
        .bind(&insert.submitter_identity)
        .bind(sqlx::types::Json(&insert.payload))
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}

/// List staged profiles awaiting review, oldest first.
#[derive(Debug, Clone, Copy)]
pub struct ListPendingOwnerProfiles;

impl Processor<ListPendingOwnerProfiles> for DatabaseProcessor {
    type Output = Vec<PendingOwnerProfile>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListPendingOwnerProfiles")]
    async fn process(
        &self,
        _query: ListPendingOwnerProfiles,
    ) -> Result<Vec<PendingOwnerProfile>, sqlx::Error> {
        sqlx::query_as::<_, PendingOwnerProfile>(&format!(
            "{SELECT_PROFILE} WHERE status = 'pending' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
    }
}
