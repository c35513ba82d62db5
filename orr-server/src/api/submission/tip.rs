use axum::extract::Multipart;
use axum::{Json, http::StatusCode, response::IntoResponse};
use kanau::processor::Processor;
use orr_core::entities::ChangeKind;
use orr_core::entities::pending_vehicle_edit::InsertVehicleEdit;
use orr_core::entities::vehicle::GetVehicleById;
use orr_core::framework::DatabaseProcessor;
use orr_sdk::objects::submission::{SubmissionAccepted, VehicleEditFields};
use uuid::Uuid;

use super::{SubmissionApiError, notify_operators};
use crate::state::AppState;

/// `POST /tips` — stage an anonymous fact-field tip for a vehicle.
///
/// Multipart form with a `vehicle` field (uuid) and any subset of the
/// fact-field names as text fields. No authentication: tips arrive from
/// people who spotted a car at an auction, not from registered owners.
pub(super) async fn submit_tip(
    state: axum::extract::State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, SubmissionApiError> {
    let mut vehicle_id: Option<Uuid> = None;
    let mut fields = VehicleEditFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SubmissionApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| SubmissionApiError::Validation(format!("unreadable field {name}: {e}")))?;
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        if name == "vehicle" {
            vehicle_id = Some(
                value
                    .parse()
                    .map_err(|_| SubmissionApiError::Validation("vehicle must be a uuid".into()))?,
            );
        } else {
            apply_tip_field(&mut fields, &name, value)
                .map_err(SubmissionApiError::Validation)?;
        }
    }

    let vehicle_id = vehicle_id
        .ok_or_else(|| SubmissionApiError::Validation("missing vehicle field".into()))?;
    if fields.is_empty() {
        return Err(SubmissionApiError::Validation(
            "tip proposes no fields".into(),
        ));
    }

    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    processor
        .process(GetVehicleById { vehicle_id })
        .await
        .map_err(SubmissionApiError::Database)?
        .ok_or(SubmissionApiError::NotFound("vehicle"))?;

    let pending_id = processor
        .process(InsertVehicleEdit {
            vehicle: vehicle_id,
            submitter_identity: None,
            payload: fields,
        })
        .await
        .map_err(SubmissionApiError::Database)?;

    notify_operators(&state, ChangeKind::VehicleEdit, pending_id).await;

    Ok((StatusCode::CREATED, Json(SubmissionAccepted { pending_id })))
}

/// Parse one multipart text field into the edit payload.
fn apply_tip_field(fields: &mut VehicleEditFields, name: &str, value: &str) -> Result<(), String> {
    match name {
        "vin" => fields.vin = Some(value.to_owned()),
        "sequence" => {
            fields.sequence =
                Some(value.parse().map_err(|_| format!("sequence is not a number: {value}"))?);
        }
        "manufacture_date" => fields.manufacture_date = Some(parse_date(name, value)?),
        "port_of_entry" => fields.port_of_entry = Some(value.to_owned()),
        "original_dealer" => fields.original_dealer = Some(value.to_owned()),
        "sold_date" => fields.sold_date = Some(parse_date(name, value)?),
        "original_msrp" => {
            fields.original_msrp =
                Some(value.parse().map_err(|_| format!("original_msrp is not a number: {value}"))?);
        }
        "destroyed" => {
            fields.destroyed =
                Some(value.parse().map_err(|_| format!("destroyed is not a boolean: {value}"))?);
        }
        other => return Err(format!("unknown field: {other}")),
    }
    Ok(())
}

fn parse_date(name: &str, value: &str) -> Result<time::Date, String> {
    serde_json::from_value(serde_json::Value::String(value.to_owned()))
        .map_err(|_| format!("{name} is not a YYYY-MM-DD date: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn fields_parse_into_typed_payload() {
        let mut fields = VehicleEditFields::default();
        apply_tip_field(&mut fields, "sequence", "182").unwrap();
        apply_tip_field(&mut fields, "sold_date", "1991-05-20").unwrap();
        apply_tip_field(&mut fields, "original_msrp", "19249.00").unwrap();
        apply_tip_field(&mut fields, "destroyed", "false").unwrap();

        assert_eq!(fields.sequence, Some(182));
        assert_eq!(fields.sold_date, Some(date!(1991 - 05 - 20)));
        assert_eq!(fields.original_msrp, Some("19249.00".parse().unwrap()));
        assert_eq!(fields.destroyed, Some(false));
    }

    #[test]
    fn unknown_and_malformed_fields_rejected() {
        let mut fields = VehicleEditFields::default();
        assert!(apply_tip_field(&mut fields, "color", "green").is_err());
        assert!(apply_tip_field(&mut fields, "sequence", "abc").is_err());
        assert!(apply_tip_field(&mut fields, "sold_date", "05/20/1991").is_err());
    }
}
