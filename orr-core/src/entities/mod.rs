pub mod edition;
pub mod owner_profile;
pub mod ownership_interval;
pub mod pending_owner_profile;
pub mod pending_ownership_claim;
pub mod pending_photo;
pub mod pending_vehicle_edit;
pub mod vehicle;

use orr_sdk::objects::{ChangeKind as SdkChangeKind, ReviewStatus as SdkReviewStatus};

/// Review status for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see
/// `orr_sdk::objects::ReviewStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "review_status")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    /// Terminal statuses never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ReviewStatus::Approved | ReviewStatus::Rejected)
    }
}

impl From<ReviewStatus> for SdkReviewStatus {
    fn from(value: ReviewStatus) -> Self {
        match value {
            ReviewStatus::Pending => SdkReviewStatus::Pending,
            ReviewStatus::Approved => SdkReviewStatus::Approved,
            ReviewStatus::Rejected => SdkReviewStatus::Rejected,
        }
    }
}

impl From<SdkReviewStatus> for ReviewStatus {
    fn from(value: SdkReviewStatus) -> Self {
        match value {
            SdkReviewStatus::Pending => ReviewStatus::Pending,
            SdkReviewStatus::Approved => ReviewStatus::Approved,
            SdkReviewStatus::Rejected => ReviewStatus::Rejected,
        }
    }
}

/// Staged-change kind, one variant per staging table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    VehicleEdit,
    OwnershipClaim,
    OwnerProfile,
    Photo,
}

impl From<ChangeKind> for SdkChangeKind {
    fn from(value: ChangeKind) -> Self {
        match value {
            ChangeKind::VehicleEdit => SdkChangeKind::VehicleEdit,
            ChangeKind::OwnershipClaim => SdkChangeKind::OwnershipClaim,
            ChangeKind::OwnerProfile => SdkChangeKind::OwnerProfile,
            ChangeKind::Photo => SdkChangeKind::Photo,
        }
    }
}

impl From<SdkChangeKind> for ChangeKind {
    fn from(value: SdkChangeKind) -> Self {
        match value {
            SdkChangeKind::VehicleEdit => ChangeKind::VehicleEdit,
            SdkChangeKind::OwnershipClaim => ChangeKind::OwnershipClaim,
            SdkChangeKind::OwnerProfile => ChangeKind::OwnerProfile,
            SdkChangeKind::Photo => ChangeKind::Photo,
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&SdkChangeKind::from(*self), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!ReviewStatus::Pending.is_terminal());
        assert!(ReviewStatus::Approved.is_terminal());
        assert!(ReviewStatus::Rejected.is_terminal());
    }
}
