//! Recompute-on-change cache for the booking form.
//!
//! The form re-asks for slots whenever it re-renders. [`SlotMemo`] keeps the
//! last inputs and result and only re-runs [`available_slots`] when something
//! the result depends on changed.

use chrono::{NaiveDateTime, Timelike};

use crate::availability::{available_slots, SlotQuery};
use crate::directory::Snapshot;
use crate::time::Slot;

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    query: SlotQuery,
    snapshot: Snapshot,
    /// Clock reading truncated to the minute; past-slot exclusion has minute
    /// resolution.
    now: NaiveDateTime,
}

/// Caches the most recent slot computation.
#[derive(Debug, Default)]
pub struct SlotMemo {
    last: Option<(MemoKey, Vec<Slot>)>,
    computations: u64,
}

impl SlotMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots for `query`, recomputed only if the query, the snapshot or the
    /// clock minute differ from the previous call.
    pub fn slots(&mut self, query: &SlotQuery, snapshot: &Snapshot, now: NaiveDateTime) -> &[Slot] {
        let now = truncate_to_minute(now);
        let fresh = match &self.last {
            Some((key, _)) => key.query != *query || key.now != now || key.snapshot != *snapshot,
            None => true,
        };

        if fresh {
            let slots = available_slots(query, snapshot, snapshot, snapshot, now);
            self.computations += 1;
            self.last = Some((
                MemoKey {
                    query: query.clone(),
                    snapshot: snapshot.clone(),
                    now,
                },
                slots,
            ));
        }

        match &self.last {
            Some((_, slots)) => slots,
            None => &[],
        }
    }

    /// How many times the engine actually ran.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Drop the cached result.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_local_datetime;
    use crate::model::{Appointment, OperatingHours, Service, Unit};

    fn snapshot() -> Snapshot {
        let mut unit = Unit {
            id: "centro".into(),
            name: None,
            operating_hours: Default::default(),
        };
        unit.operating_hours.insert(3, OperatingHours::new("08:00", "10:00"));
        Snapshot {
            units: vec![unit],
            appointments: vec![],
            services: vec![Service {
                id: "cut".into(),
                name: None,
                duration_minutes: Some(30),
            }],
        }
    }

    fn now() -> NaiveDateTime {
        parse_local_datetime("2024-01-01T12:00").unwrap()
    }

    #[test]
    fn unchanged_inputs_reuse_result() {
        let snapshot = snapshot();
        let query = SlotQuery::new("2024-01-10", "ana", "centro").with_service("cut");
        let mut memo = SlotMemo::new();

        let first = memo.slots(&query, &snapshot, now()).to_vec();
        let second = memo.slots(&query, &snapshot, now()).to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        assert_eq!(memo.computations(), 1);

        // Seconds within the same minute do not invalidate.
        let later = now().with_second(42).unwrap();
        memo.slots(&query, &snapshot, later);
        assert_eq!(memo.computations(), 1);
    }

    #[test]
    fn any_input_change_recomputes() {
        let mut snapshot = snapshot();
        let query = SlotQuery::new("2024-01-10", "ana", "centro");
        let mut memo = SlotMemo::new();

        memo.slots(&query, &snapshot, now());
        memo.slots(&query.clone().with_service("cut"), &snapshot, now());
        assert_eq!(memo.computations(), 2);

        snapshot.appointments.push(Appointment {
            id: "a1".into(),
            staff_id: "ana".into(),
            date: "2024-01-10".into(),
            time: "08:00".into(),
            service_id: None,
            status: "active".into(),
        });
        let slots = memo.slots(&query, &snapshot, now()).to_vec();
        assert_eq!(memo.computations(), 3);
        assert_eq!(slots.first().map(Slot::to_string).as_deref(), Some("08:30"));

        memo.clear();
        memo.slots(&query, &snapshot, now());
        assert_eq!(memo.computations(), 4);
    }
}
