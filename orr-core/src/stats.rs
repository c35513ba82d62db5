//! Dashboard statistics over the staging tables.

use crate::entities::ReviewStatus;
use crate::entities::{
    pending_owner_profile::PendingOwnerProfile, pending_ownership_claim::PendingOwnershipClaim,
    pending_photo::PendingPhoto, pending_vehicle_edit::PendingVehicleEdit,
};
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use orr_sdk::objects::moderation::StatsResponse;

/// Per-status record counts for one staged kind, or the sum over all of
/// them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

impl StatusCounts {
    fn bump(&mut self, status: ReviewStatus, count: u64) {
        match status {
            ReviewStatus::Pending => self.pending += count,
            ReviewStatus::Approved => self.approved += count,
            ReviewStatus::Rejected => self.rejected += count,
        }
    }
}

impl std::ops::Add for StatusCounts {
    type Output = StatusCounts;
    fn add(self, rhs: StatusCounts) -> StatusCounts {
        StatusCounts {
            pending: self.pending + rhs.pending,
            approved: self.approved + rhs.approved,
            rejected: self.rejected + rhs.rejected,
        }
    }
}

impl std::iter::Sum for StatusCounts {
    fn sum<I: Iterator<Item = StatusCounts>>(iter: I) -> StatusCounts {
        iter.fold(StatusCounts::default(), std::ops::Add::add)
    }
}

impl From<StatusCounts> for StatsResponse {
    fn from(value: StatusCounts) -> Self {
        StatsResponse {
            pending: value.pending,
            approved: value.approved,
            rejected: value.rejected,
        }
    }
}

/// Group one staging table by status.
///
/// Every staged kind counts through this one query shape; `table` is one
/// of the `TABLE` constants from the pending entity modules.
pub(crate) async fn count_table(
    pool: &sqlx::PgPool,
    table: &str,
) -> Result<StatusCounts, sqlx::Error> {
    let rows: Vec<(ReviewStatus, i64)> = sqlx::query_as(&format!(
        "SELECT status, COUNT(*) FROM {table} GROUP BY status"
    ))
    .fetch_all(pool)
    .await?;

    let mut counts = StatusCounts::default();
    for (status, count) in rows {
        counts.bump(status, count.max(0) as u64);
    }
    Ok(counts)
}

/// Sum `{pending, approved, rejected}` across every staged kind.
#[derive(Debug, Clone, Copy)]
pub struct CountsByStatus;

impl Processor<CountsByStatus> for DatabaseProcessor {
    type Output = StatusCounts;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountsByStatus")]
    async fn process(&self, _query: CountsByStatus) -> Result<StatusCounts, sqlx::Error> {
        let edits = PendingVehicleEdit::count_by_status(&self.pool).await?;
        let claims = PendingOwnershipClaim::count_by_status(&self.pool).await?;
        let profiles = PendingOwnerProfile::count_by_status(&self.pool).await?;
        let photos = PendingPhoto::count_by_status(&self.pool).await?;
        Ok([edits, claims, profiles, photos].into_iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sum_across_kinds() {
        let edits = StatusCounts {
            pending: 3,
            ..Default::default()
        };
        let claims = StatusCounts {
            approved: 2,
            ..Default::default()
        };
        let profiles = StatusCounts {
            rejected: 1,
            ..Default::default()
        };
        let photos = StatusCounts::default();

        let total: StatusCounts = [edits, claims, profiles, photos].into_iter().sum();
        assert_eq!(
            total,
            StatusCounts {
                pending: 3,
                approved: 2,
                rejected: 1,
            }
        );
    }

    #[test]
    fn bump_routes_by_status() {
        let mut counts = StatusCounts::default();
        counts.bump(ReviewStatus::Pending, 4);
        counts.bump(ReviewStatus::Approved, 1);
        counts.bump(ReviewStatus::Pending, 1);
        assert_eq!(counts.pending, 5);
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.rejected, 0);
    }
}
