//! DTOs for the submission-facing API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Proposed fact-field values for a vehicle.
///
/// Every `Some` field overwrites the canonical value on approval; `None`
/// fields are left untouched, so the serialized form only carries the keys
/// the submitter actually proposed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleEditFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<time::Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_of_entry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_dealer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sold_date: Option<time::Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_msrp: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroyed: Option<bool>,
}

impl VehicleEditFields {
    /// Whether the submission proposes anything at all.
    pub fn is_empty(&self) -> bool {
        self.vin.is_none()
            && self.sequence.is_none()
            && self.manufacture_date.is_none()
            && self.port_of_entry.is_none()
            && self.original_dealer.is_none()
            && self.sold_date.is_none()
            && self.original_msrp.is_none()
            && self.destroyed.is_none()
    }
}

/// Owner details accompanying an ownership claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerDraft {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Url>,
}

/// `POST /claims/new` — claim a vehicle that is not in the catalog yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVehicleClaimRequest {
    /// Edition label as displayed to the community, e.g.
    /// `"1991 British Racing Green"`.
    pub edition_name: String,
    pub sequence: i32,
    pub vin: String,
    pub owner: OwnerDraft,
    pub date_start: time::Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `POST /claims/existing` — claim a vehicle already in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingVehicleClaimRequest {
    pub vehicle_id: Uuid,
    pub owner: OwnerDraft,
    pub date_start: time::Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<time::Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response for accepted submissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubmissionAccepted {
    pub pending_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_fields_omit_unset_keys() {
        let fields = VehicleEditFields {
            port_of_entry: Some("Jacksonville".to_owned()),
            ..Default::default()
        };
        let value = serde_json::to_value(&fields).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["port_of_entry"], "Jacksonville");
    }

    #[test]
    fn empty_edit_detected() {
        assert!(VehicleEditFields::default().is_empty());
        let fields = VehicleEditFields {
            destroyed: Some(true),
            ..Default::default()
        };
        assert!(!fields.is_empty());
    }
}
