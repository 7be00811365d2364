//! Candidate start-time grid for one opening day.
//!
//! Builds the raw 30-minute grid from the opening and closing times, then
//! narrows it by the break, by the current time and by the service duration.
//! Every filter keeps generation order, so the grid stays chronological.

use tracing::debug;

use crate::model::OperatingHours;
use crate::time::{parse_hhmm, Slot};

/// Spacing between consecutive candidates, in minutes.
pub const SLOT_STEP_MINUTES: u32 = 30;

/// A parsed opening day, all values in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub opening: u32,
    pub closing: u32,
    /// Half-open `[start, end)` break, present only when both ends parse and
    /// `start < end`.
    pub break_interval: Option<(u32, u32)>,
}

impl DayWindow {
    /// Parse a weekday's hours. `None` when the day is closed or the opening /
    /// closing times are not valid `HH:MM` values.
    pub fn from_hours(hours: &OperatingHours) -> Option<Self> {
        if !hours.open {
            return None;
        }
        let (Some(opening), Some(closing)) =
            (parse_hhmm(&hours.start_time), parse_hhmm(&hours.end_time))
        else {
            debug!(
                start = %hours.start_time,
                end = %hours.end_time,
                "unreadable operating hours"
            );
            return None;
        };

        let break_interval = match (hours.break_start.as_deref(), hours.break_end.as_deref()) {
            (Some(start), Some(end)) => match (parse_hhmm(start), parse_hhmm(end)) {
                (Some(s), Some(e)) if s < e => Some((s, e)),
                _ => None,
            },
            _ => None,
        };

        Some(Self {
            opening,
            closing,
            break_interval,
        })
    }

    /// Raw grid: every half hour from opening, strictly before closing.
    ///
    /// The first hour starts at the opening minute; later hours start at
    /// `:00`. An `08:45` opening therefore yields `08:45, 09:00, 09:30, ...`.
    pub fn raw_grid(&self) -> Vec<Slot> {
        let (open_hour, open_minute) = (self.opening / 60, self.opening % 60);
        let close_hour = self.closing / 60;

        let mut slots = Vec::new();
        for hour in open_hour..=close_hour {
            let first = if hour == open_hour { open_minute } else { 0 };
            for minute in (first..60).step_by(SLOT_STEP_MINUTES as usize) {
                let minute_of_day = hour * 60 + minute;
                if minute_of_day < self.closing {
                    slots.push(Slot::from_minute_of_day(minute_of_day));
                }
            }
        }
        slots
    }

    /// Whether `slot` starts inside the break.
    pub fn in_break(&self, slot: Slot) -> bool {
        self.break_interval
            .is_some_and(|(start, end)| (start..end).contains(&slot.minute_of_day()))
    }

    /// Whether a booking of `duration` minutes starting at `slot` ends by closing.
    pub fn fits(&self, slot: Slot, duration: u32) -> bool {
        slot.minute_of_day()
            .checked_add(duration)
            .is_some_and(|end| end <= self.closing)
    }
}

/// Grid after break exclusion, past-time exclusion and duration fit.
///
/// `now_minute` is set only when the requested date is today; candidates at
/// or before it are dropped. `duration` is the requested service length.
pub fn candidate_slots(window: &DayWindow, now_minute: Option<u32>, duration: Option<u32>) -> Vec<Slot> {
    window
        .raw_grid()
        .into_iter()
        .filter(|&slot| !window.in_break(slot))
        .filter(|&slot| now_minute.is_none_or(|now| slot.minute_of_day() > now))
        .filter(|&slot| duration.is_none_or(|d| window.fits(slot, d)))
        .collect()
}
