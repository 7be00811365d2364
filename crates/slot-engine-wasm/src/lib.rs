//! WASM bindings for slot-engine.
//!
//! Exposes the available-slots computation and the booking check to the
//! browser console via `wasm-bindgen`. All complex types are passed as JSON
//! strings in the document store's camelCase layout.
//!
//! The caller supplies the local clock reading (`new Date()` formatted as
//! `YYYY-MM-DDTHH:MM:SS` in the browser's local time), so results never depend
//! on the runtime's notion of the current time.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use slot_engine::{parse_local_datetime, BookingRequest, SlotQuery, Snapshot};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON-level implementations (plain `String` errors, testable off-wasm)
// ---------------------------------------------------------------------------

fn parse_snapshot(json: &str) -> Result<Snapshot, String> {
    Snapshot::from_json(json).map_err(|e| format!("Invalid snapshot JSON: {}", e))
}

fn available_slots_json(snapshot_json: &str, query_json: &str, now: &str) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let query: SlotQuery =
        serde_json::from_str(query_json).map_err(|e| format!("Invalid query JSON: {}", e))?;
    let now = parse_local_datetime(now).map_err(|e| e.to_string())?;

    let slots = slot_engine::available_slots(&query, &snapshot, &snapshot, &snapshot, now);

    serde_json::to_string(&slots).map_err(|e| format!("Serialization error: {}", e))
}

fn check_booking_json(snapshot_json: &str, request_json: &str) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let request: BookingRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid booking JSON: {}", e))?;

    let conflicts =
        slot_engine::check_booking(&request, &snapshot, &snapshot).map_err(|e| e.to_string())?;

    serde_json::to_string(&conflicts).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute bookable start times.
///
/// - `snapshot_json` -- `{units, appointments, services}` snapshot
/// - `query_json` -- `{date, staffId, unitId, serviceId?, excludeAppointmentId?}`
/// - `now` -- local clock reading, e.g. `"2024-01-10T09:15:00"`
///
/// Returns a JSON array of `"HH:MM"` strings. Missing or unusable query
/// fields yield `[]`, not an error.
#[wasm_bindgen(js_name = "availableSlots")]
pub fn available_slots(snapshot_json: &str, query_json: &str, now: &str) -> Result<String, JsValue> {
    available_slots_json(snapshot_json, query_json, now).map_err(|e| JsValue::from_str(&e))
}

/// List the existing appointments a proposed booking would collide with.
///
/// `request_json` is `{date, staffId, time, serviceId?, excludeAppointmentId?}`.
/// Returns a JSON array of `{appointmentId, start, end}` objects; an empty
/// array means the booking is free.
#[wasm_bindgen(js_name = "checkBooking")]
pub fn check_booking(snapshot_json: &str, request_json: &str) -> Result<String, JsValue> {
    check_booking_json(snapshot_json, request_json).map_err(|e| JsValue::from_str(&e))
}
