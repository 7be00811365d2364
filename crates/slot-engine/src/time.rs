//! Wall-clock primitives: `HH:MM` minute-of-day values, date normalization and
//! the [`Slot`] type.
//!
//! Everything here works in local wall time. A day is `0..=1440` minutes; a
//! closing time of `24:00` is accepted as the end of the day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SlotError};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse an `HH:MM` (or `H:MM`) string into minutes since midnight.
///
/// Returns `None` for anything that is not one or two digits, a colon and
/// exactly two digits, or that lies past `24:00`.
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let (hours, minutes) = s.trim().split_once(':')?;
    if !is_digits(hours, 1..=2) || !is_digits(minutes, 2..=2) {
        return None;
    }
    let h: u32 = hours.parse().ok()?;
    let m: u32 = minutes.parse().ok()?;
    if m >= 60 {
        return None;
    }
    let total = h * 60 + m;
    (total <= MINUTES_PER_DAY).then_some(total)
}

/// Parse a stored appointment time, which must be exactly `HH:MM`.
///
/// Unlike [`parse_hhmm`] this rejects one-digit hours, surrounding whitespace
/// and `24:00`; a booking cannot start at the end of the day.
pub fn parse_strict_hhmm(s: &str) -> Option<u32> {
    let (hours, minutes) = s.split_once(':')?;
    if !is_digits(hours, 2..=2) || !is_digits(minutes, 2..=2) {
        return None;
    }
    parse_hhmm(s).filter(|&m| m < MINUTES_PER_DAY)
}

fn is_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Strip any time component from a date value.
///
/// `"2024-01-10T13:00:00.000Z"` and `"2024-01-10 13:00"` both become
/// `"2024-01-10"`. Both the requested date and every appointment date go
/// through this before they are compared.
pub fn normalize_date(s: &str) -> &str {
    let s = s.trim();
    match s.find(['T', ' ']) {
        Some(idx) => &s[..idx],
        None => s,
    }
}

/// Parse a (possibly datetime-suffixed) date value into a calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let date = normalize_date(s);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| SlotError::InvalidDate(s.to_string()))
}

/// Weekday index of a date: 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always < 7
    date.weekday().num_days_from_sunday() as u8
}

/// A bookable appointment start time, stored as minutes since midnight.
///
/// Displays, serializes and parses as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(u32);

impl Slot {
    pub fn from_minute_of_day(minute: u32) -> Self {
        Slot(minute)
    }

    pub fn minute_of_day(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for Slot {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hhmm(s)
            .filter(|&m| m < MINUTES_PER_DAY)
            .map(Slot)
            .ok_or_else(|| SlotError::InvalidTime(s.to_string()))
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
