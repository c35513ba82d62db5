use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use orr_sdk::objects::submission::OwnerDraft;
use uuid::Uuid;

/// Canonical owner profile, keyed uniquely by the identity-provider subject.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnerProfile {
    pub id: Uuid,
    pub submitter_identity: String,
    pub display_name: String,
    pub location: Option<String>,
    pub links: sqlx::types::Json<Vec<url::Url>>,
    pub created_at: time::PrimitiveDateTime,
}

const SELECT_PROFILE: &str = r#"
    SELECT id, submitter_identity, display_name, location, links, created_at
    FROM owner_profiles
"#;

impl OwnerProfile {
    /// Profile as a JSON object for moderation diffs, keyed like
    /// [`OwnerDraft`].
    pub fn profile_fields(&self) -> serde_json::Value {
        serde_json::json!({
            "display_name": self.display_name,
            "location": self.location,
            "links": self.links.0,
        })
    }

    pub async fn get_by_identity_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        identity: &str,
    ) -> Result<Option<OwnerProfile>, sqlx::Error> {
        sqlx::query_as::<_, OwnerProfile>(&format!(
            "{SELECT_PROFILE} WHERE submitter_identity = $1"
        ))
        .bind(identity)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Insert a canonical profile from an approved draft.
    ///
    /// The unique constraint on `submitter_identity` is the authoritative
    /// "one profile per identity" guard; callers map the violation to a
    /// conflict error.
    pub async fn insert_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        identity: &str,
        draft: &OwnerDraft,
    ) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO owner_profiles (id, submitter_identity, display_name, location, links)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(identity)
        .bind(&draft.display_name)
        .bind(draft.location.as_deref())
        .bind(sqlx::types::Json(&draft.links))
        .execute(&mut **tx)
        .await?;
        Ok(id)
    }
}

/// Fetch an owner profile by submitter identity.
#[derive(Debug, Clone)]
pub struct GetOwnerProfileByIdentity {
    pub identity: String,
}

impl Processor<GetOwnerProfileByIdentity> for DatabaseProcessor {
    type Output = Option<OwnerProfile>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetOwnerProfileByIdentity")]
    async fn process(
        &self,
        query: GetOwnerProfileByIdentity,
    ) -> Result<Option<OwnerProfile>, sqlx::Error> {
        sqlx::query_as::<_, OwnerProfile>(&format!(
            "{SELECT_PROFILE} WHERE submitter_identity = $1"
        ))
        .bind(&query.identity)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Fetch an owner profile by id.
#[derive(Debug, Clone, Copy)]
pub struct GetOwnerProfileById {
    pub profile_id: Uuid,
}

impl Processor<GetOwnerProfileById> for DatabaseProcessor {
    type Output = Option<OwnerProfile>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetOwnerProfileById")]
    async fn process(
        &self,
        query: GetOwnerProfileById,
    ) -> Result<Option<OwnerProfile>, sqlx::Error> {
        sqlx::query_as::<_, OwnerProfile>(&format!("{SELECT_PROFILE} WHERE id = $1"))
            .bind(query.profile_id)
            .fetch_optional(&self.pool)
            .await
    }
}
