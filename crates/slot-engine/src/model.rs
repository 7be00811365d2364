//! Records read from the console's document store.
//!
//! Field names follow the store's camelCase layout so snapshots exported by the
//! CRUD layer deserialize directly. Time and date fields stay as the raw strings
//! the store holds; the engine parses them per query and skips what it cannot
//! read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Status marker for appointments that block slots.
pub const STATUS_ACTIVE: &str = "active";

/// Duration assumed for an existing appointment whose service is unknown.
pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 30;

/// Opening hours of one unit on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    pub open: bool,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end: Option<String>,
}

impl OperatingHours {
    pub fn new(start_time: &str, end_time: &str) -> Self {
        Self {
            open: true,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            break_start: None,
            break_end: None,
        }
    }

    pub fn closed() -> Self {
        Self {
            open: false,
            start_time: String::new(),
            end_time: String::new(),
            break_start: None,
            break_end: None,
        }
    }

    pub fn with_break(mut self, break_start: &str, break_end: &str) -> Self {
        self.break_start = Some(break_start.to_string());
        self.break_end = Some(break_end.to_string());
        self
    }
}

/// A physical location with its own weekly schedule.
///
/// `operating_hours` is keyed by weekday, 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub operating_hours: BTreeMap<u8, OperatingHours>,
}

/// A booking held by the appointment ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub staff_id: String,
    /// `YYYY-MM-DD`, possibly with a time suffix.
    pub date: String,
    /// `HH:MM` start time.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    pub status: String,
}

impl Appointment {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// A bookable service from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
}

impl Service {
    /// The service duration when it is usable for scheduling (strictly positive).
    ///
    /// Durations past `u32::MAX` minutes saturate; callers add them with
    /// saturating arithmetic.
    pub fn positive_duration(&self) -> Option<u32> {
        self.duration_minutes
            .filter(|&d| d > 0)
            .map(|d| u32::try_from(d).unwrap_or(u32::MAX))
    }
}
