//! # slot-engine
//!
//! Deterministic appointment slot availability for a barbershop console.
//!
//! Given a unit's weekly operating hours, a staff member's existing
//! appointments and the requested service's duration, the engine computes the
//! bookable half-hour start times for one day. It is a pure function of
//! read-only snapshots supplied by the surrounding CRUD layer, with the current
//! time injected by the caller.
//!
//! ## Modules
//!
//! - [`availability`] -- the slot query and the end-to-end computation
//! - [`grid`] -- half-hour grid, break, past-time and duration filters
//! - [`conflict`] -- busy intervals from the ledger and overlap rules
//! - [`directory`] -- collaborator traits and the in-memory [`Snapshot`]
//! - [`model`] -- units, operating hours, appointments, services
//! - [`time`] -- `HH:MM` parsing, date normalization, [`Slot`]
//! - [`clock`] -- injected wall-clock sources
//! - [`memo`] -- recompute-on-change cache
//! - [`error`] -- Error types

pub mod availability;
pub mod clock;
pub mod conflict;
pub mod directory;
pub mod error;
pub mod grid;
pub mod memo;
pub mod model;
pub mod time;

pub use availability::{available_slots, check_booking, BookingRequest, SlotQuery};
pub use clock::{parse_local_datetime, Clock, FixedClock, SystemClock, ZonedClock};
pub use conflict::{BusyInterval, OverlapRule};
pub use directory::{AppointmentLedger, ServiceCatalog, Snapshot, UnitDirectory};
pub use error::SlotError;
pub use memo::SlotMemo;
pub use model::{Appointment, OperatingHours, Service, Unit};
pub use time::Slot;
