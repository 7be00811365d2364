//! Error types for slot-engine boundary parsing.
//!
//! The availability computation itself never fails. These errors come from
//! reading snapshots, clock readings and slot strings handed in from outside.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown service or service without a duration: {0}")]
    UnknownService(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;
