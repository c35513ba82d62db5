use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use orr_sdk::objects::submission::VehicleEditFields;
use uuid::Uuid;

/// Canonical vehicle record.
///
/// `current_owner` duplicates the owner of the open ownership interval for
/// read speed. Both writes happen only inside
/// [`OwnershipInterval::record_handover_tx`](crate::entities::ownership_interval::OwnershipInterval::record_handover_tx),
/// never independently.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub vin: String,
    pub edition: Uuid,
    pub sequence: i32,
    pub manufacture_date: Option<time::Date>,
    pub port_of_entry: Option<String>,
    pub original_dealer: Option<String>,
    pub sold_date: Option<time::Date>,
    pub original_msrp: Option<rust_decimal::Decimal>,
    pub destroyed: bool,
    pub current_owner: Option<Uuid>,
    pub created_at: time::PrimitiveDateTime,
}

const SELECT_VEHICLE: &str = r#"
    SELECT id, vin, edition, sequence, manufacture_date, port_of_entry,
           original_dealer, sold_date, original_msrp, destroyed,
           current_owner, created_at
    FROM vehicles
"#;

impl Vehicle {
    /// Merge proposed fact fields into this record. `Some` overwrites,
    /// `None` leaves the canonical value untouched.
    pub fn apply_edit(&mut self, fields: &VehicleEditFields) {
        if let Some(vin) = &fields.vin {
            self.vin = vin.clone();
        }
        if let Some(sequence) = fields.sequence {
            self.sequence = sequence;
        }
        if let Some(date) = fields.manufacture_date {
            self.manufacture_date = Some(date);
        }
        if let Some(port) = &fields.port_of_entry {
            self.port_of_entry = Some(port.clone());
        }
        if let Some(dealer) = &fields.original_dealer {
            self.original_dealer = Some(dealer.clone());
        }
        if let Some(date) = fields.sold_date {
            self.sold_date = Some(date);
        }
        if let Some(msrp) = fields.original_msrp {
            self.original_msrp = Some(msrp);
        }
        if let Some(destroyed) = fields.destroyed {
            self.destroyed = destroyed;
        }
    }

    /// The fact fields as a JSON object, keyed the same way as
    /// [`VehicleEditFields`], for moderation diffs.
    pub fn fact_fields(&self) -> serde_json::Value {
        serde_json::json!({
            "vin": self.vin,
            "sequence": self.sequence,
            "manufacture_date": self.manufacture_date,
            "port_of_entry": self.port_of_entry,
            "original_dealer": self.original_dealer,
            "sold_date": self.sold_date,
            "original_msrp": self.original_msrp,
            "destroyed": self.destroyed,
        })
    }

    /// Load a vehicle inside a transaction, locking the row for the rest
    /// of the transaction.
    pub async fn get_for_update_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>(&format!("{SELECT_VEHICLE} WHERE id = $1 FOR UPDATE"))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Load a vehicle by VIN inside a transaction, locking the row.
    pub async fn get_by_vin_for_update_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        vin: &str,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>(&format!("{SELECT_VEHICLE} WHERE vin = $1 FOR UPDATE"))
            .bind(vin)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write back the fact fields after a merge.
    pub async fn update_facts_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        vehicle: &Vehicle,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET vin = $2,
                sequence = $3,
                manufacture_date = $4,
                port_of_entry = $5,
                original_dealer = $6,
                sold_date = $7,
                original_msrp = $8,
                destroyed = $9
            WHERE id = $1
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.vin)
        .bind(vehicle.sequence)
        .bind(vehicle.manufacture_date)
        .bind(vehicle.port_of_entry.as_deref())
        .bind(vehicle.original_dealer.as_deref())
        .bind(vehicle.sold_date)
        .bind(vehicle.original_msrp)
        .bind(vehicle.destroyed)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Materialize a canonical vehicle row from an approved new-vehicle
    /// claim. Fact fields start empty and arrive through later edits.
    pub async fn insert_new_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        vin: &str,
        edition: Uuid,
        sequence: i32,
    ) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO vehicles (id, vin, edition, sequence)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(vin)
        .bind(edition)
        .bind(sequence)
        .execute(&mut **tx)
        .await?;
        Ok(id)
    }
}

/// Fetch a vehicle by id.
#[derive(Debug, Clone, Copy)]
pub struct GetVehicleById {
    pub vehicle_id: Uuid,
}

impl Processor<GetVehicleById> for DatabaseProcessor {
    type Output = Option<Vehicle>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetVehicleById")]
    async fn process(&self, query: GetVehicleById) -> Result<Option<Vehicle>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>(&format!("{SELECT_VEHICLE} WHERE id = $1"))
            .bind(query.vehicle_id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn sample() -> Vehicle {
        Vehicle {
            id: Uuid::now_v7(),
            vin: "JM1NA3510M1221538".to_owned(),
            edition: Uuid::now_v7(),
            sequence: 182,
            manufacture_date: Some(date!(1991 - 02 - 14)),
            port_of_entry: None,
            original_dealer: Some("Classic Mazda".to_owned()),
            sold_date: None,
            original_msrp: None,
            destroyed: false,
            current_owner: None,
            created_at: datetime!(2024-01-01 00:00:00),
        }
    }

    #[test]
    fn edit_overwrites_only_proposed_fields() {
        let mut vehicle = sample();
        let before = vehicle.clone();
        let fields = VehicleEditFields {
            port_of_entry: Some("Jacksonville".to_owned()),
            destroyed: Some(true),
            ..Default::default()
        };

        vehicle.apply_edit(&fields);

        assert_eq!(vehicle.port_of_entry.as_deref(), Some("Jacksonville"));
        assert!(vehicle.destroyed);
        // Everything not proposed is unchanged.
        assert_eq!(vehicle.vin, before.vin);
        assert_eq!(vehicle.sequence, before.sequence);
        assert_eq!(vehicle.manufacture_date, before.manufacture_date);
        assert_eq!(vehicle.original_dealer, before.original_dealer);
        assert_eq!(vehicle.sold_date, before.sold_date);
        assert_eq!(vehicle.original_msrp, before.original_msrp);
    }

    #[test]
    fn empty_edit_is_identity() {
        let mut vehicle = sample();
        let before = vehicle.clone();
        vehicle.apply_edit(&VehicleEditFields::default());
        assert_eq!(vehicle, before);
    }

    #[test]
    fn fact_fields_match_edit_keys() {
        let vehicle = sample();
        let facts = vehicle.fact_fields();
        let map = facts.as_object().unwrap();
        for key in [
            "vin",
            "sequence",
            "manufacture_date",
            "port_of_entry",
            "original_dealer",
            "sold_date",
            "original_msrp",
            "destroyed",
        ] {
            assert!(map.contains_key(key), "missing fact key {key}");
        }
        assert_eq!(map["manufacture_date"], "1991-02-14");
    }
}
