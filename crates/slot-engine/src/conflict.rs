//! Detect candidate start times that collide with existing bookings.
//!
//! Each active appointment of the staff member on the requested day occupies
//! `[start, start + duration)`. Adjacent bookings (one ends exactly when the
//! candidate starts) are NOT conflicts.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

use crate::directory::ServiceCatalog;
use crate::model::{Appointment, DEFAULT_APPOINTMENT_MINUTES};
use crate::time::{normalize_date, parse_hhmm, parse_strict_hhmm, Slot, MINUTES_PER_DAY};

/// Time held by one existing appointment, in minutes since midnight.
///
/// A booking that would run past midnight is cut at the end of the day, so
/// `end` is at most `24:00` and may be exactly that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyInterval {
    pub appointment_id: String,
    pub start: Slot,
    #[serde(deserialize_with = "end_of_interval")]
    pub end: Slot,
}

// `Slot` refuses `24:00`, which is a valid interval end.
fn end_of_interval<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Slot, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_hhmm(&s)
        .map(Slot::from_minute_of_day)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid interval end: {s}")))
}

impl BusyInterval {
    pub fn duration_minutes(&self) -> u32 {
        self.end.minute_of_day() - self.start.minute_of_day()
    }
}

/// How a candidate is tested against a busy interval.
///
/// With a known service duration the whole requested interval must be free.
/// Without one only the candidate's start instant is checked, so a candidate
/// that begins before a booking and would run into it is still offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapRule {
    /// `candidate < busy.end && candidate + duration > busy.start`
    Interval(u32),
    /// `busy.start <= candidate < busy.end`
    Point,
}

impl OverlapRule {
    pub fn for_duration(duration: Option<u32>) -> Self {
        match duration {
            Some(d) => OverlapRule::Interval(d),
            None => OverlapRule::Point,
        }
    }

    pub fn collides(self, candidate: Slot, busy: &BusyInterval) -> bool {
        let start = candidate.minute_of_day();
        let (busy_start, busy_end) = (busy.start.minute_of_day(), busy.end.minute_of_day());
        match self {
            OverlapRule::Interval(duration) => {
                start < busy_end && start.saturating_add(duration) > busy_start
            }
            OverlapRule::Point => busy_start <= start && start < busy_end,
        }
    }
}

/// Occupied intervals for `staff_id` on `date`.
///
/// Keeps only active appointments whose normalized date matches and whose id
/// is not `exclude_id`. Appointments whose start time is not exactly `HH:MM`
/// are skipped. Unknown or non-positive service durations count as
/// [`DEFAULT_APPOINTMENT_MINUTES`].
pub fn busy_intervals<C>(
    appointments: &[&Appointment],
    staff_id: &str,
    date: &str,
    catalog: &C,
    exclude_id: Option<&str>,
) -> Vec<BusyInterval>
where
    C: ServiceCatalog + ?Sized,
{
    let date = normalize_date(date);

    appointments
        .iter()
        .filter(|a| a.is_active())
        .filter(|a| a.staff_id == staff_id)
        .filter(|a| normalize_date(&a.date) == date)
        .filter(|a| exclude_id != Some(a.id.as_str()))
        .filter_map(|a| {
            let Some(start) = parse_strict_hhmm(&a.time) else {
                trace!(appointment = %a.id, time = %a.time, "skipping unreadable appointment time");
                return None;
            };
            let duration = a
                .service_id
                .as_deref()
                .and_then(|id| catalog.service(id))
                .and_then(|s| s.positive_duration())
                .unwrap_or(DEFAULT_APPOINTMENT_MINUTES as u32);
            let end = start.saturating_add(duration).min(MINUTES_PER_DAY);
            Some(BusyInterval {
                appointment_id: a.id.clone(),
                start: Slot::from_minute_of_day(start),
                end: Slot::from_minute_of_day(end),
            })
        })
        .collect()
}

/// Whether `candidate` avoids every busy interval under `rule`.
pub fn is_free(candidate: Slot, rule: OverlapRule, busy: &[BusyInterval]) -> bool {
    !busy.iter().any(|b| rule.collides(candidate, b))
}

/// Drop every candidate that collides with a busy interval, keeping order.
pub fn remove_conflicting(candidates: Vec<Slot>, rule: OverlapRule, busy: &[BusyInterval]) -> Vec<Slot> {
    if busy.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|&slot| is_free(slot, rule, busy))
        .collect()
}

/// The busy intervals a proposed booking at `start` would collide with.
///
/// Uses the same rules as the slot search: interval overlap when `duration`
/// is known, start-instant containment otherwise.
pub fn find_conflicts(start: Slot, duration: Option<u32>, busy: &[BusyInterval]) -> Vec<BusyInterval> {
    let rule = OverlapRule::for_duration(duration);
    busy.iter()
        .filter(|b| rule.collides(start, b))
        .cloned()
        .collect()
}
