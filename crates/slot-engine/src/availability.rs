//! Bookable start times for one staff member at one unit on one day.
//!
//! This module is the entry point of the engine. It resolves the query against
//! the read-only collaborators, builds the half-hour grid for the day and
//! removes every candidate that falls in the break, lies in the past, does not
//! fit the service before closing, or collides with an active booking.
//!
//! Any missing or unreadable input produces an empty result. An ambiguous
//! state must never offer a bookable slot.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::{self, BusyInterval, OverlapRule};
use crate::directory::{AppointmentLedger, ServiceCatalog, UnitDirectory};
use crate::error::{Result, SlotError};
use crate::grid::{self, DayWindow};
use crate::time::{parse_date, weekday_index, Slot};

/// What the booking form asks for.
///
/// Empty strings are treated like absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub staff_id: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    /// Appointment being edited; it never conflicts with itself.
    #[serde(default)]
    pub exclude_appointment_id: Option<String>,
}

impl SlotQuery {
    pub fn new(date: &str, staff_id: &str, unit_id: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            staff_id: Some(staff_id.to_string()),
            unit_id: Some(unit_id.to_string()),
            service_id: None,
            exclude_appointment_id: None,
        }
    }

    pub fn with_service(mut self, service_id: &str) -> Self {
        self.service_id = Some(service_id.to_string());
        self
    }

    pub fn excluding(mut self, appointment_id: &str) -> Self {
        self.exclude_appointment_id = Some(appointment_id.to_string());
        self
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Compute the bookable start times for `query`.
///
/// `now` is the local wall-clock reading; on that calendar day only strictly
/// later start times are offered. The result is chronological and free of
/// duplicates.
pub fn available_slots<U, L, C>(
    query: &SlotQuery,
    units: &U,
    ledger: &L,
    catalog: &C,
    now: NaiveDateTime,
) -> Vec<Slot>
where
    U: UnitDirectory + ?Sized,
    L: AppointmentLedger + ?Sized,
    C: ServiceCatalog + ?Sized,
{
    let (Some(date), Some(staff_id), Some(unit_id)) = (
        present(&query.date),
        present(&query.staff_id),
        present(&query.unit_id),
    ) else {
        debug!("slot query is missing date, staff or unit");
        return Vec::new();
    };

    if !units.contains_unit(unit_id) {
        debug!(unit = unit_id, "unknown unit");
        return Vec::new();
    }

    let Ok(day) = parse_date(date) else {
        debug!(date, "unreadable date");
        return Vec::new();
    };

    let weekday = weekday_index(day);
    let Some(window) = units
        .operating_hours(unit_id, weekday)
        .and_then(DayWindow::from_hours)
    else {
        debug!(unit = unit_id, weekday, "unit closed or hours unreadable");
        return Vec::new();
    };

    let duration = match present(&query.service_id) {
        Some(service_id) => match catalog.service(service_id).and_then(|s| s.positive_duration()) {
            Some(d) => Some(d),
            None => {
                debug!(service = service_id, "service duration unknown");
                return Vec::new();
            }
        },
        None => None,
    };

    let now_minute = (now.date() == day).then(|| now.hour() * 60 + now.minute());
    let candidates = grid::candidate_slots(&window, now_minute, duration);

    let appointments = ledger.appointments_for_day(staff_id, date);
    let busy = conflict::busy_intervals(
        &appointments,
        staff_id,
        date,
        catalog,
        present(&query.exclude_appointment_id),
    );

    let slots = conflict::remove_conflicting(candidates, OverlapRule::for_duration(duration), &busy);
    debug!(
        date,
        staff = staff_id,
        unit = unit_id,
        busy = busy.len(),
        slots = slots.len(),
        "computed available slots"
    );
    slots
}

/// A proposed booking to validate against the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub date: String,
    pub staff_id: String,
    pub time: String,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub exclude_appointment_id: Option<String>,
}

/// The existing bookings a proposed booking would collide with.
///
/// Unlike [`available_slots`], this reports bad input as an error so an edit
/// form can show why a time was refused.
///
/// # Errors
/// - [`SlotError::InvalidDate`] / [`SlotError::InvalidTime`] for unreadable
///   date or time.
/// - [`SlotError::UnknownService`] when a service is named but has no usable
///   duration.
pub fn check_booking<L, C>(request: &BookingRequest, ledger: &L, catalog: &C) -> Result<Vec<BusyInterval>>
where
    L: AppointmentLedger + ?Sized,
    C: ServiceCatalog + ?Sized,
{
    parse_date(&request.date)?;
    let start: Slot = request.time.parse()?;

    let duration = match present(&request.service_id) {
        Some(id) => Some(
            catalog
                .service(id)
                .and_then(|s| s.positive_duration())
                .ok_or_else(|| SlotError::UnknownService(id.to_string()))?,
        ),
        None => None,
    };

    let appointments = ledger.appointments_for_day(&request.staff_id, &request.date);
    let busy = conflict::busy_intervals(
        &appointments,
        &request.staff_id,
        &request.date,
        catalog,
        present(&request.exclude_appointment_id),
    );
    Ok(conflict::find_conflicts(start, duration, &busy))
}
