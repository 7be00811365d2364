//! Read-only collaborator contracts and the in-memory [`Snapshot`] that
//! implements them.
//!
//! The CRUD layer owns every record. Before a query it hands the engine a
//! snapshot: the units with their weekly hours, the appointment ledger and the
//! service catalog.
//!
//! The store does not validate its documents, so a snapshot may carry records
//! with missing or mistyped fields. Those records are dropped while parsing and
//! the rest of the snapshot stays usable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::model::{Appointment, OperatingHours, Service, Unit};
use crate::time::normalize_date;

/// Weekly operating hours per unit.
pub trait UnitDirectory {
    /// Whether the unit exists at all.
    fn contains_unit(&self, unit_id: &str) -> bool;

    /// Hours for `weekday` (0 = Sunday through 6 = Saturday), if configured.
    fn operating_hours(&self, unit_id: &str, weekday: u8) -> Option<&OperatingHours>;
}

/// Existing bookings.
pub trait AppointmentLedger {
    /// Appointments of `staff_id` on `date`.
    ///
    /// Implementations may return a superset (other dates, cancelled
    /// bookings); the engine filters status and normalized date itself.
    fn appointments_for_day(&self, staff_id: &str, date: &str) -> Vec<&Appointment>;
}

/// Service durations.
pub trait ServiceCatalog {
    fn service(&self, service_id: &str) -> Option<&Service>;
}

/// Point-in-time copy of everything the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub units: Vec<Unit>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub appointments: Vec<Appointment>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub services: Vec<Service>,
}

/// Deserialize a record list one element at a time, dropping the elements
/// that do not fit `T`.
fn skip_malformed<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                trace!(error = %err, "skipping malformed snapshot record");
                None
            }
        })
        .collect())
}

impl Snapshot {
    /// Parse a snapshot exported by the CRUD layer.
    ///
    /// Fails only when the document itself is not a snapshot object; malformed
    /// records inside it are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn unit(&self, unit_id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == unit_id)
    }
}

impl UnitDirectory for Snapshot {
    fn contains_unit(&self, unit_id: &str) -> bool {
        self.unit(unit_id).is_some()
    }

    fn operating_hours(&self, unit_id: &str, weekday: u8) -> Option<&OperatingHours> {
        self.unit(unit_id)?.operating_hours.get(&weekday)
    }
}

impl AppointmentLedger for Snapshot {
    fn appointments_for_day(&self, staff_id: &str, date: &str) -> Vec<&Appointment> {
        let date = normalize_date(date);
        self.appointments
            .iter()
            .filter(|a| a.staff_id == staff_id && normalize_date(&a.date) == date)
            .collect()
    }
}

impl ServiceCatalog for Snapshot {
    fn service(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == service_id)
    }
}

// Borrowed slices let callers that already hold separate lists skip building
// a Snapshot.

/// Returns every booking of the staff member regardless of date or status.
/// `available_slots` and `check_booking` narrow that to the requested day.
impl AppointmentLedger for [Appointment] {
    fn appointments_for_day(&self, staff_id: &str, _date: &str) -> Vec<&Appointment> {
        self.iter().filter(|a| a.staff_id == staff_id).collect()
    }
}

impl ServiceCatalog for [Service] {
    fn service(&self, service_id: &str) -> Option<&Service> {
        self.iter().find(|s| s.id == service_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_records_are_dropped() {
        let json = r#"{
            "units": [{ "id": "centro" }, { "name": "no id" }],
            "appointments": [
                { "id": "a1", "staffId": "x", "date": "2024-01-10", "time": null, "status": "active" },
                { "id": "a2", "staffId": "x", "date": "2024-01-10", "time": "10:00" },
                { "id": "a3", "staffId": "x", "date": "2024-01-10", "time": "11:00", "status": "active" }
            ],
            "services": [
                { "id": "cut", "durationMinutes": 30 },
                { "id": "odd", "durationMinutes": "45" },
                { "id": "frac", "durationMinutes": 12.5 }
            ]
        }"#;
        let snap = Snapshot::from_json(json).unwrap();

        let units: Vec<&str> = snap.units.iter().map(|u| u.id.as_str()).collect();
        let appointments: Vec<&str> = snap.appointments.iter().map(|a| a.id.as_str()).collect();
        let services: Vec<&str> = snap.services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(units, ["centro"]);
        assert_eq!(appointments, ["a3"]);
        assert_eq!(services, ["cut"]);
    }

    #[test]
    fn non_object_documents_still_fail() {
        assert!(Snapshot::from_json("3").is_err());
        assert!(Snapshot::from_json(r#"{ "appointments": 3 }"#).is_err());
        assert_eq!(Snapshot::from_json("{}").unwrap(), Snapshot::default());
    }

    #[test]
    fn slice_ledger_ignores_the_date() {
        let appointment = |id: &str, staff: &str, date: &str| Appointment {
            id: id.into(),
            staff_id: staff.into(),
            date: date.into(),
            time: "10:00".into(),
            service_id: None,
            status: "cancelled".into(),
        };
        let ledger = vec![
            appointment("a1", "x", "2024-01-10"),
            appointment("a2", "x", "2024-02-01"),
            appointment("a3", "y", "2024-01-10"),
        ];

        let found = ledger.as_slice().appointments_for_day("x", "2024-01-10");
        let ids: Vec<&str> = found.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2"]);
    }
}
