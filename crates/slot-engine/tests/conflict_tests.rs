//! Tests for busy-interval construction and the two overlap rules.

use slot_engine::conflict::{busy_intervals, find_conflicts, is_free, remove_conflicting, BusyInterval, OverlapRule};
use slot_engine::{Appointment, Service, Slot};

fn at(time: &str) -> Slot {
    time.parse().unwrap()
}

fn busy(id: &str, start: &str, end: &str) -> BusyInterval {
    BusyInterval {
        appointment_id: id.to_string(),
        start: at(start),
        end: at(end),
    }
}

fn appointment(id: &str, date: &str, time: &str, service: Option<&str>, status: &str) -> Appointment {
    Appointment {
        id: id.to_string(),
        staff_id: "x".to_string(),
        date: date.to_string(),
        time: time.to_string(),
        service_id: service.map(str::to_string),
        status: status.to_string(),
    }
}

fn catalog() -> Vec<Service> {
    vec![
        Service {
            id: "beard".into(),
            name: Some("Beard trim".into()),
            duration_minutes: Some(20),
        },
        Service {
            id: "broken".into(),
            name: None,
            duration_minutes: Some(-5),
        },
    ]
}

#[test]
fn interval_rule_detects_partial_overlap() {
    let b = busy("a", "10:00", "10:30");
    let rule = OverlapRule::Interval(30);

    assert!(rule.collides(at("09:45"), &b));
    assert!(rule.collides(at("10:00"), &b));
    assert!(rule.collides(at("10:15"), &b));
}

#[test]
fn adjacent_intervals_do_not_collide() {
    let b = busy("a", "10:00", "10:30");
    let rule = OverlapRule::Interval(30);

    assert!(!rule.collides(at("09:30"), &b), "ends exactly at busy start");
    assert!(!rule.collides(at("10:30"), &b), "starts exactly at busy end");
}

#[test]
fn point_rule_only_checks_the_start_instant() {
    let b = busy("a", "10:00", "11:00");

    assert!(OverlapRule::Point.collides(at("10:00"), &b));
    assert!(OverlapRule::Point.collides(at("10:30"), &b));
    assert!(!OverlapRule::Point.collides(at("09:30"), &b));
    assert!(!OverlapRule::Point.collides(at("11:00"), &b));
}

#[test]
fn rule_follows_known_duration() {
    assert_eq!(OverlapRule::for_duration(Some(45)), OverlapRule::Interval(45));
    assert_eq!(OverlapRule::for_duration(None), OverlapRule::Point);
}

#[test]
fn busy_intervals_filter_and_resolve_durations() {
    let appointments = vec![
        appointment("a1", "2024-01-10", "09:00", Some("beard"), "active"),
        appointment("a2", "2024-01-10T00:00:00Z", "10:00", Some("broken"), "active"),
        appointment("a3", "2024-01-10", "11:00", None, "cancelled"),
        appointment("a4", "2024-01-11", "12:00", None, "active"),
        appointment("a5", "2024-01-10", "1300", None, "active"),
        appointment("a6", "2024-01-10", "14:00", None, "active"),
    ];
    let refs: Vec<&Appointment> = appointments.iter().collect();

    let intervals = busy_intervals(&refs, "x", "2024-01-10", catalog().as_slice(), Some("a6"));

    assert_eq!(
        intervals,
        vec![busy("a1", "09:00", "09:20"), busy("a2", "10:00", "10:30")]
    );
}

#[test]
fn busy_intervals_ignore_other_staff() {
    let mut other = appointment("a1", "2024-01-10", "09:00", None, "active");
    other.staff_id = "y".into();
    let refs = vec![&other];

    assert!(busy_intervals(&refs, "x", "2024-01-10", catalog().as_slice(), None).is_empty());
}

#[test]
fn remove_conflicting_keeps_order() {
    let candidates: Vec<Slot> = ["09:00", "09:30", "10:00", "10:30", "11:00"]
        .iter()
        .map(|t| at(t))
        .collect();
    let busy = vec![busy("a", "09:30", "10:00")];

    let kept = remove_conflicting(candidates, OverlapRule::Interval(30), &busy);
    let rendered: Vec<String> = kept.iter().map(Slot::to_string).collect();

    assert_eq!(rendered, ["09:00", "10:00", "10:30", "11:00"]);
    assert!(is_free(at("10:00"), OverlapRule::Interval(30), &busy));
}

#[test]
fn find_conflicts_lists_every_collision() {
    let busy = vec![
        busy("a", "09:00", "09:30"),
        busy("b", "09:30", "10:00"),
        busy("c", "11:00", "11:30"),
    ];

    let hits = find_conflicts(at("09:15"), Some(30), &busy);
    let ids: Vec<&str> = hits.iter().map(|b| b.appointment_id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);

    let hits = find_conflicts(at("09:15"), None, &busy);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].appointment_id, "a");
}

#[test]
fn appointment_times_must_be_exact_hhmm() {
    let appointments = vec![
        appointment("loose", "2024-01-10", "9:00", None, "active"),
        appointment("padded", "2024-01-10", " 10:00", None, "active"),
        appointment("midnight", "2024-01-10", "24:00", None, "active"),
        appointment("ok", "2024-01-10", "11:00", None, "active"),
    ];
    let refs: Vec<&Appointment> = appointments.iter().collect();

    let intervals = busy_intervals(&refs, "x", "2024-01-10", catalog().as_slice(), None);

    assert_eq!(intervals, vec![busy("ok", "11:00", "11:30")]);
}

#[test]
fn huge_durations_saturate_instead_of_overflowing() {
    let services = vec![Service {
        id: "marathon".into(),
        name: None,
        duration_minutes: Some(4_294_967_195),
    }];
    let late = appointment("late", "2024-01-10", "23:00", Some("marathon"), "active");
    let refs = vec![&late];

    let intervals = busy_intervals(&refs, "x", "2024-01-10", services.as_slice(), None);

    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].end.minute_of_day(), 24 * 60);
    assert_eq!(intervals[0].duration_minutes(), 60);

    let b = busy("a", "10:00", "10:30");
    assert!(OverlapRule::Interval(u32::MAX).collides(at("09:00"), &b));
    assert!(!OverlapRule::Interval(u32::MAX).collides(at("10:30"), &b));
}

#[test]
fn interval_ending_at_midnight_round_trips() {
    let services = vec![Service {
        id: "long".into(),
        name: None,
        duration_minutes: Some(60),
    }];
    let late = appointment("late", "2024-01-10", "23:30", Some("long"), "active");
    let refs = vec![&late];

    let intervals = busy_intervals(&refs, "x", "2024-01-10", services.as_slice(), None);
    let json = serde_json::to_string(&intervals[0]).unwrap();

    assert_eq!(json, r#"{"appointmentId":"late","start":"23:30","end":"24:00"}"#);
    let back: BusyInterval = serde_json::from_str(&json).unwrap();
    assert_eq!(back, intervals[0]);
}
