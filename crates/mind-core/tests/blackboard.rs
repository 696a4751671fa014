use std::cell::RefCell;
use std::rc::Rc;

use mind_core::{BbKey, Blackboard, BlackboardEvent, ManualClock};

const HEALTH: BbKey<u32> = BbKey::new("health");

fn board() -> (ManualClock, Blackboard) {
    let clock = ManualClock::new();
    let bb = Blackboard::with_clock(clock.shared());
    (clock, bb)
}

fn record_events(bb: &mut Blackboard) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    bb.subscribe(move |event| {
        let tag = match event {
            BlackboardEvent::Changed { .. } => "changed",
            BlackboardEvent::Removed { .. } => "removed",
            BlackboardEvent::Expired { .. } => "expired",
        };
        sink.borrow_mut().push(format!("{tag}:{}", event.key()));
    });
    log
}

#[test]
fn blackboard_set_get_remove_roundtrip() {
    let (_clock, mut bb) = board();
    assert!(!bb.has(HEALTH));

    bb.set(HEALTH, 123u32);
    bb.set("name", "scout".to_string());

    assert_eq!(bb.get::<u32>(HEALTH).copied(), Some(123));
    assert_eq!(HEALTH.get(&mut bb).copied(), Some(123));
    assert_eq!(bb.get::<String>("name").map(|s| s.as_str()), Some("scout"));

    assert!(bb.remove(HEALTH));
    assert!(!bb.remove(HEALTH));
    assert_eq!(bb.get::<u32>(HEALTH), None);
}

#[test]
fn blackboard_type_mismatch_yields_default() {
    let (_clock, mut bb) = board();
    bb.set("ammo", 1u32);

    assert_eq!(bb.get::<i32>("ammo"), None);
    assert_eq!(bb.get_or::<i32>("ammo", -7), -7);
    assert!(!bb.has_typed::<i32>("ammo"));
    assert!(bb.has_typed::<u32>("ammo"));
    // Mismatched reads leave the entry alone.
    assert_eq!(bb.try_get::<u32>("ammo"), Some(1));
}

#[test]
fn ttl_entry_expires_once_time_passes() {
    let (clock, mut bb) = board();
    bb.set_with_ttl("alert", true, 2.0);

    assert!(bb.has("alert"));
    assert_eq!(bb.remaining_ttl("alert"), Some(2.0));

    clock.advance(1.5);
    assert!(bb.has("alert"));

    clock.advance(0.6);
    assert!(!bb.has("alert"));
    assert!(!bb.get_or("alert", false));
}

#[test]
fn lazy_expiry_notifies_exactly_once() {
    let (clock, mut bb) = board();
    bb.set_with_ttl("target", 5u64, 1.0);
    let log = record_events(&mut bb);

    clock.advance(1.0);
    assert_eq!(bb.get::<u64>("target"), None);
    assert!(!bb.has("target"));
    assert_eq!(bb.cleanup_expired(), 0);

    assert_eq!(*log.borrow(), vec!["expired:target".to_string()]);
}

#[test]
fn cleanup_expired_sweeps_all_stale_entries() {
    let (clock, mut bb) = board();
    bb.set_with_ttl("a", 1u8, 1.0);
    bb.set_with_ttl("b", 2u8, 3.0);
    bb.set("c", 3u8);
    let log = record_events(&mut bb);

    clock.advance(2.0);
    assert_eq!(bb.cleanup_expired(), 1);
    assert_eq!(bb.keys(), vec!["b".to_string(), "c".to_string()]);

    clock.advance(2.0);
    assert_eq!(bb.len(), 1);
    assert_eq!(
        *log.borrow(),
        vec!["expired:a".to_string(), "expired:b".to_string()]
    );
}

#[test]
fn set_always_notifies_even_for_identical_values() {
    let (_clock, mut bb) = board();
    let log = record_events(&mut bb);

    bb.set("x", 1i32);
    bb.set("x", 1i32);
    bb.remove("x");

    assert_eq!(
        *log.borrow(),
        vec![
            "changed:x".to_string(),
            "changed:x".to_string(),
            "removed:x".to_string()
        ]
    );
}

#[test]
fn set_replaces_ttl_with_permanent_value() {
    let (clock, mut bb) = board();
    bb.set_with_ttl("flag", 1u8, 1.0);
    bb.set("flag", 2u8);

    clock.advance(10.0);
    assert_eq!(bb.try_get::<u8>("flag"), Some(2));
    assert_eq!(bb.remaining_ttl("flag"), None);
}

#[test]
fn non_positive_ttl_is_already_expired() {
    let (_clock, mut bb) = board();
    bb.set_with_ttl("gone", 1u8, 0.0);
    bb.set_with_ttl("nan", 1u8, f64::NAN);
    bb.set_with_ttl("forever", 1u8, f64::INFINITY);

    assert!(!bb.has("gone"));
    assert!(!bb.has("nan"));
    assert!(bb.has("forever"));
}

#[test]
fn unsubscribe_stops_notifications() {
    let (_clock, mut bb) = board();
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    let id = bb.subscribe(move |_| *c.borrow_mut() += 1);

    bb.set("k", ());
    assert!(bb.unsubscribe(id));
    assert!(!bb.unsubscribe(id));
    bb.set("k", ());

    assert_eq!(*count.borrow(), 1);
}

#[test]
fn clear_is_silent() {
    let (_clock, mut bb) = board();
    bb.set("a", 1u8);
    let log = record_events(&mut bb);

    bb.clear();
    assert!(bb.is_empty());
    assert!(log.borrow().is_empty());
}

#[test]
fn get_mut_updates_in_place() {
    let (_clock, mut bb) = board();
    bb.set("hits", vec![1u32]);
    if let Some(hits) = bb.get_mut::<Vec<u32>>("hits") {
        hits.push(2);
    }
    assert_eq!(bb.try_get::<Vec<u32>>("hits"), Some(vec![1, 2]));
}
