use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use uuid::Uuid;

/// A time-bounded record of one owner's custody of one vehicle.
/// `date_end = NULL` marks the current owner.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OwnershipInterval {
    pub id: i64,
    pub vehicle: Uuid,
    pub owner: Uuid,
    pub date_start: time::Date,
    pub date_end: Option<time::Date>,
    pub notes: Option<String>,
}

const SELECT_INTERVAL: &str = r#"
    SELECT id, vehicle, owner, date_start, date_end, notes
    FROM ownership_intervals
"#;

impl OwnershipInterval {
    /// Interval as a JSON object for moderation diffs.
    pub fn interval_fields(&self) -> serde_json::Value {
        serde_json::json!({
            "owner": self.owner,
            "date_start": self.date_start,
            "date_end": self.date_end,
            "notes": self.notes,
        })
    }

    pub async fn get_for_pair_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        vehicle: Uuid,
        owner: Uuid,
    ) -> Result<Option<OwnershipInterval>, sqlx::Error> {
        sqlx::query_as::<_, OwnershipInterval>(&format!(
            "{SELECT_INTERVAL} WHERE vehicle = $1 AND owner = $2 FOR UPDATE"
        ))
        .bind(vehicle)
        .bind(owner)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Correct the dates and notes of an existing interval in place.
    pub async fn update_dates_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: i64,
        date_start: time::Date,
        date_end: Option<time::Date>,
        notes: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE ownership_intervals
            SET date_start = $2, date_end = $3, notes = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(date_start)
        .bind(date_end)
        .bind(notes)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Re-derive `vehicles.current_owner` from the open interval.
    ///
    /// Called after an in-place correction, which may have closed or
    /// re-opened the vehicle's open interval; the pointer must always
    /// equal the open interval's owner, or NULL when none exists.
    pub async fn sync_current_owner_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        vehicle: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET current_owner = (
                SELECT owner FROM ownership_intervals
                WHERE vehicle = $1 AND date_end IS NULL
            )
            WHERE id = $1
            "#,
        )
        .bind(vehicle)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Record an ownership handover for `vehicle` to `new_owner`.
    ///
    /// This is the only place that writes either half of the duplicated
    /// current-owner state. In one transaction it:
    /// 1. closes the open interval, if any, with `date_end = date_start`
    ///    of the incoming interval (continuity);
    /// 2. inserts the new open interval;
    /// 3. repoints `vehicles.current_owner`.
    pub async fn record_handover_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        vehicle: Uuid,
        new_owner: Uuid,
        date_start: time::Date,
        notes: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE ownership_intervals
            SET date_end = $2
            WHERE vehicle = $1 AND date_end IS NULL
            "#,
        )
        .bind(vehicle)
        .bind(date_start)
        .execute(&mut **tx)
        .await?;

        let interval_id: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO ownership_intervals (vehicle, owner, date_start, date_end, notes)
            VALUES ($1, $2, $3, NULL, $4)
            RETURNING id
            "#,
        )
        .bind(vehicle)
        .bind(new_owner)
        .bind(date_start)
        .bind(notes)
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE vehicles
            SET current_owner = $2
            WHERE id = $1
            "#,
        )
        .bind(vehicle)
        .bind(new_owner)
        .execute(&mut **tx)
        .await?;

        Ok(interval_id.0)
    }
}

/// How an approved ownership claim maps onto canonical intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimPlan {
    /// The `(vehicle, owner)` interval already exists: an in-place
    /// correction of its dates and notes.
    Correct { interval_id: i64 },
    /// A genuine ownership change: close the open interval (if any),
    /// insert a new open one, repoint the current-owner pointer.
    Handover,
}

/// Decide between the correction and handover paths.
pub fn plan_claim(existing_pair: Option<&OwnershipInterval>) -> ClaimPlan {
    match existing_pair {
        Some(interval) => ClaimPlan::Correct {
            interval_id: interval.id,
        },
        None => ClaimPlan::Handover,
    }
}

/// Fetch an interval by its `(vehicle, owner)` composite key.
#[derive(Debug, Clone, Copy)]
pub struct GetIntervalForPair {
    pub vehicle_id: Uuid,
    pub owner_id: Uuid,
}

impl Processor<GetIntervalForPair> for DatabaseProcessor {
    type Output = Option<OwnershipInterval>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetIntervalForPair")]
    async fn process(
        &self,
        query: GetIntervalForPair,
    ) -> Result<Option<OwnershipInterval>, sqlx::Error> {
        sqlx::query_as::<_, OwnershipInterval>(&format!(
            "{SELECT_INTERVAL} WHERE vehicle = $1 AND owner = $2"
        ))
        .bind(query.vehicle_id)
        .bind(query.owner_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn interval(id: i64, date_end: Option<time::Date>) -> OwnershipInterval {
        OwnershipInterval {
            id,
            vehicle: Uuid::now_v7(),
            owner: Uuid::now_v7(),
            date_start: date!(2020 - 01 - 01),
            date_end,
            notes: None,
        }
    }

    #[test]
    fn existing_pair_is_corrected_in_place() {
        let pair = interval(7, Some(date!(2022 - 05 - 01)));
        assert_eq!(plan_claim(Some(&pair)), ClaimPlan::Correct { interval_id: 7 });
    }

    #[test]
    fn missing_pair_is_a_handover() {
        assert_eq!(plan_claim(None), ClaimPlan::Handover);
    }
}
