use crate::entities::ReviewStatus;
use crate::framework::DatabaseProcessor;
use crate::stats::{StatusCounts, count_table};
use kanau::processor::Processor;
use orr_sdk::objects::submission::VehicleEditFields;
use uuid::Uuid;

pub const TABLE: &str = "pending_vehicle_edits";

/// A staged edit of an existing vehicle's fact fields.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingVehicleEdit {
    pub id: Uuid,
    pub vehicle: Uuid,
    pub submitter_identity: Option<String>,
    pub status: ReviewStatus,
    pub created_at: time::PrimitiveDateTime,
    pub payload: sqlx::types::Json<VehicleEditFields>,
}

const SELECT_EDIT: &str = r#"
    SELECT id, vehicle, submitter_identity, status, created_at, payload
    FROM pending_vehicle_edits
"#;

impl PendingVehicleEdit {
    /// Transition the row out of `pending` and return it.
    ///
    /// The `WHERE status = 'pending'` clause is the double-approval guard:
    /// `None` means the row was already processed (or never existed), and
    /// nothing was written. The new status only becomes durable with the
    /// surrounding transaction.
    pub async fn claim_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
        status: ReviewStatus,
    ) -> Result<Option<PendingVehicleEdit>, sqlx::Error> {
        sqlx::query_as::<_, PendingVehicleEdit>(
            r#"
            UPDATE pending_vehicle_edits
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

/// Stage a vehicle edit.
#[derive(Debug, Clone)]
pub struct InsertVehicleEdit {
    pub vehicle: Uuid,
    pub submitter_identity: Option<String>,
    pub payload: VehicleEditFields,
}

impl Processor<InsertVehicleEdit> for DatabaseProcessor {
    type Output = Uuid;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertVehicleEdit")]
    async fn process(&self, insert: InsertVehicleEdit) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO pending_vehicle_edits (id, vehicle, submitter_identity, payload)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(insert.vehicle)
        .bind(insert.submitter_identity.as_deref())
        .bind(sqlx::types::Json(&insert.payload))
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}

/// List staged vehicle edits awaiting review, oldest first.
#[derive(Debug, Clone, Copy)]
pub struct ListPendingVehicleEdits;

impl Processor<ListPendingVehicleEdits> for DatabaseProcessor {
    type Output = Vec<PendingVehicleEdit>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListPendingVehicleEdits")]
    async fn process(
        &self,
        _query: ListPendingVehicleEdits,
    ) -> Result<Vec<PendingVehicleEdit>, sqlx::Error> {
        sqlx::query_as::<_, PendingVehicleEdit>(&format!(
            "{SELECT_EDIT} WHERE status = 'pending' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
    }
}
