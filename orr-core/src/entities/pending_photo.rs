use crate::entities::ReviewStatus;
use crate::framework::DatabaseProcessor;
use crate::stats::{StatusCounts, count_table};
use kanau::processor::Processor;
use uuid::Uuid;

pub const TABLE: &str = "pending_photos";

/// A staged photo submission.
///
/// The staging record is a table row like every other kind; the image
/// bytes live under the pending object namespace at `object_key`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PendingPhoto {
    pub id: Uuid,
    pub vehicle: Uuid,
    pub submitter_identity: String,
    pub status: ReviewStatus,
    pub created_at: time::PrimitiveDateTime,
    pub object_key: String,
    pub content_type: Option<String>,
}

const SELECT_PHOTO: &str = r#"
    SELECT id, vehicle, submitter_identity, status, created_at, object_key, content_type
    FROM pending_photos
"#;

impl PendingPhoto {
    /// The submitted object as a JSON value for the moderation queue.
    pub fn proposed_fields(&self) -> serde_json::Value {
        serde_json::json!({
            "object_key": self.object_key,
            "content_type": self.content_type,
        })
    }

    /// Conditional status transition; see
    /// [`PendingVehicleEdit::claim_tx`](crate::entities::pending_vehicle_edit::PendingVehicleEdit::claim_tx).
    pub async fn claim_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
        status: ReviewStatus,
    ) -> Result<Option<PendingPhoto>, sqlx::Error> {
        sqlx::query_as::<_, PendingPhoto>(
            r#"
            UPDATE pending_photos
            SET status = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING id, vehicle, submitter_identity, status, created_at,
                      object_key, content_type
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

/// Stage a photo submission.
#[derive(Debug, Clone)]
pub struct InsertPendingPhoto {
    pub vehicle: Uuid,
    pub submitter_identity: String,
    pub object_key: String,
    pub content_type: Option<String>,
}

impl Processor<InsertPendingPhoto> for DatabaseProcessor {
    type Output = Uuid;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertPendingPhoto")]
    async fn process(&self, insert: InsertPendingPhoto) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO pending_photos (id, vehicle, submitter_identity, object_key, content_type)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(insert.vehicle)
        .bind(&insert.submitter_identity)
        .bind(&insert.object_key)
        .bind(insert.content_type.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}

/// List staged photos awaiting review, oldest first.
#[derive(Debug, Clone, Copy)]
pub struct ListPendingPhotos;

impl Processor<ListPendingPhotos> for DatabaseProcessor {
    type Output = Vec<PendingPhoto>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListPendingPhotos")]
    async fn process(&self, _query: ListPendingPhotos) -> Result<Vec<PendingPhoto>, sqlx::Error> {
        sqlx::query_as::<_, PendingPhoto>(&format!(
            "{SELECT_PHOTO} WHERE status = 'pending' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
    }
}
