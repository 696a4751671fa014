mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{recorder, Harness, TestWorld};
use mind_bt::{ActionLeaf, BehaviorTree, Node, Selector, Sequence, Status, TickError};
use mind_core::{Brain, ExecContext, ManualClock, TickContext};

fn flaky_leaf(explode: Rc<Cell<bool>>) -> Node<TestWorld> {
    Node::new(
        "flaky",
        ActionLeaf::new(move |ctx: &mut ExecContext<'_, TestWorld>| {
            ctx.world.log.push("flaky".into());
            if explode.get() {
                panic!("sensor offline");
            }
            Status::Running
        }),
    )
}

#[test]
fn panicking_leaf_fails_one_tick_then_tree_recovers() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut h = Harness::new();
    let explode = Rc::new(Cell::new(true));
    let (after, _) = recorder("after", Status::Success);
    let mut tree = BehaviorTree::new(Node::new(
        "root",
        Sequence::new(vec![flaky_leaf(explode.clone()), after]),
    ));

    assert_eq!(h.with_ctx(|ctx| tree.tick(ctx)), Status::Failure);
    assert_eq!(tree.panic_count(), 1);
    assert!(!tree.root().is_running());
    assert_eq!(h.world.count("tick:after"), 0);

    explode.set(false);
    assert_eq!(h.with_ctx(|ctx| tree.tick(ctx)), Status::Running);
    assert_eq!(tree.last_status(), Status::Running);
}

#[test]
fn try_tick_reports_the_panic_message() {
    let mut h = Harness::new();
    let mut tree = BehaviorTree::new(Node::new(
        "brain",
        Selector::new(vec![flaky_leaf(Rc::new(Cell::new(true)))]),
    ));

    let err = h.with_ctx(|ctx| tree.try_tick(ctx)).unwrap_err();
    assert_eq!(
        err,
        TickError::Panicked {
            tree: "brain".into(),
            message: "sensor offline".into(),
        }
    );
    assert!(err.to_string().contains("sensor offline"));
}

#[test]
fn panics_are_traced() {
    let mut h = Harness::new();
    mind_tools::install_log(&mut h.blackboard);
    let mut tree = BehaviorTree::new(flaky_leaf(Rc::new(Cell::new(true))));

    h.with_ctx(|ctx| tree.tick(ctx));
    h.with_ctx(|ctx| tree.tick(ctx));

    let log = mind_tools::take_log(&mut h.blackboard).unwrap();
    assert_eq!(log.count("bt.panic"), 2);
}

#[test]
fn brain_sweeps_expired_entries_before_ticking() {
    let clock = ManualClock::new();
    let (leaf, _) = recorder("leaf", Status::Running);
    let tree = BehaviorTree::new(Node::new("root", Sequence::new(vec![leaf])));
    let mut brain = Brain::with_clock(7u64, clock.shared(), Box::new(tree));
    let mut world = TestWorld::default();

    let expired = Rc::new(Cell::new(0));
    let seen = expired.clone();
    brain.blackboard.subscribe(move |event| {
        if matches!(event, mind_core::BlackboardEvent::Expired { .. }) {
            seen.set(seen.get() + 1);
        }
    });
    brain.blackboard.set_with_ttl("noise", 1u8, 0.5);

    brain.tick(&TickContext::new(0, 0.1), &mut world);
    assert_eq!(expired.get(), 0);

    clock.advance(0.5);
    brain.tick(&TickContext::new(1, 0.1), &mut world);
    assert_eq!(expired.get(), 1);
    assert_eq!(brain.last_status(), Some(Status::Running));
}

#[test]
fn decimated_brain_skips_ticks() {
    let (leaf, _) = recorder("leaf", Status::Running);
    let tree = BehaviorTree::new(leaf);
    let mut brain = Brain::with_clock(1u64, ManualClock::new().shared(), Box::new(tree));
    brain.config.think_every_ticks = 2;
    let mut world = TestWorld::default();

    for tick in 0..4 {
        brain.tick(&TickContext::new(tick, 0.1), &mut world);
    }
    assert_eq!(world.count("tick:leaf"), 2);
}

#[test]
fn snapshot_mirrors_tree_shape() {
    let mut h = Harness::new();
    let (a, _) = recorder("a", Status::Failure);
    let (b, _) = recorder("b", Status::Running);
    let mut tree = BehaviorTree::new(Node::new("root", Selector::new(vec![a, b])));
    h.with_ctx(|ctx| tree.tick(ctx));

    let snap = tree.snapshot();
    assert_eq!(snap.kind, "Selector");
    assert_eq!(snap.children.len(), 2);
    assert_eq!(snap.children[0].status, Status::Failure);
    assert_eq!(snap.children[1].status, Status::Running);
    assert_eq!(snap.running_path(), vec!["root", "b"]);
}

#[cfg(feature = "serde")]
#[test]
fn snapshot_serializes_to_json() {
    let mut h = Harness::new();
    let (a, _) = recorder("a", Status::Success);
    let mut tree = BehaviorTree::new(Node::new("root", Sequence::new(vec![a])));
    h.with_ctx(|ctx| tree.tick(ctx));

    let json = serde_json::to_value(tree.snapshot()).unwrap();
    assert_eq!(json["status"], "Success");
    assert_eq!(json["children"][0]["name"], "a");
}
