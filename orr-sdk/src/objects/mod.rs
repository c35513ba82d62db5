pub mod moderation;
pub mod submission;

use serde::{Deserialize, Serialize};

/// Review status of a staged change.
///
/// This is the API/DTO version. For database operations, see
/// `orr_core::entities::ReviewStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// The staged-change kinds exposed by the moderation API.
///
/// Serialized forms double as the `{kind}` path segment of the moderation
/// endpoints (`/moderation/vehicle-edits`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    #[serde(rename = "vehicle-edits")]
    VehicleEdit,
    #[serde(rename = "ownership-claims")]
    OwnershipClaim,
    #[serde(rename = "owner-profiles")]
    OwnerProfile,
    #[serde(rename = "photos")]
    Photo,
}

impl ChangeKind {
    /// All kinds, in moderation-dashboard display order.
    pub const ALL: [ChangeKind; 4] = [
        ChangeKind::VehicleEdit,
        ChangeKind::OwnershipClaim,
        ChangeKind::OwnerProfile,
        ChangeKind::Photo,
    ];
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChangeKind::VehicleEdit => "vehicle-edits",
            ChangeKind::OwnershipClaim => "ownership-claims",
            ChangeKind::OwnerProfile => "owner-profiles",
            ChangeKind::Photo => "photos",
        };
        f.write_str(s)
    }
}

/// JSON error body returned by both API surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_path_segments() {
        for kind in ChangeKind::ALL {
            let segment = serde_json::to_value(kind).unwrap();
            let back: ChangeKind = serde_json::from_value(segment).unwrap();
            assert_eq!(back, kind);
        }
        assert_eq!(
            serde_json::to_value(ChangeKind::OwnershipClaim).unwrap(),
            serde_json::json!("ownership-claims")
        );
    }
}
