#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use mind_bt::{ActionLeaf, Node, Status};
use mind_core::{
    Blackboard, CriticalityController, ExecContext, ManualClock, TickContext, WorldMut, WorldView,
};
use mind_utility::{Consideration, ResponseCurve, UtilityAction};

#[derive(Debug, Default)]
pub struct World {
    pub log: Vec<String>,
    pub hunger: f32,
}

impl World {
    pub fn count(&self, entry: &str) -> usize {
        self.log.iter().filter(|e| *e == entry).count()
    }
}

impl WorldView for World {
    type Agent = u64;
}

impl WorldMut for World {}

/// Leaf that logs `name` on every tick and returns the status held by the returned handle.
pub fn scripted(name: &'static str, status: Status) -> (Node<World>, Rc<Cell<Status>>) {
    let handle = Rc::new(Cell::new(status));
    let dial = handle.clone();
    let node = Node::new(
        name,
        ActionLeaf::new(move |ctx: &mut ExecContext<'_, World>| {
            ctx.world.log.push(name.to_owned());
            dial.get()
        })
        .on_exit(move |ctx: &mut ExecContext<'_, World>| {
            ctx.world.log.push(format!("exit:{name}"));
        }),
    );
    (node, handle)
}

/// Utility action whose subtree always succeeds immediately.
pub fn instant(name: &'static str, base_score: f32) -> UtilityAction<World> {
    let (node, _) = scripted(name, Status::Success);
    UtilityAction::new(name, node, base_score)
}

/// Consideration that counts how often it is evaluated.
pub fn counting(calls: Rc<Cell<u32>>, value: f32) -> Consideration<World> {
    Consideration::new(
        "counting",
        move |_ctx: &mut ExecContext<'_, World>| {
            calls.set(calls.get() + 1);
            value
        },
        ResponseCurve::IDENTITY,
    )
}

pub struct Harness {
    pub clock: ManualClock,
    pub world: World,
    pub blackboard: Blackboard,
    pub criticality: CriticalityController,
    pub tick: u64,
    pub seed: u64,
}

impl Harness {
    pub fn new() -> Self {
        let clock = ManualClock::new();
        Self {
            blackboard: Blackboard::with_clock(clock.shared()),
            clock,
            world: World::default(),
            criticality: CriticalityController::default(),
            tick: 0,
            seed: 0,
        }
    }

    pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut ExecContext<'_, World>) -> R) -> R {
        let tick = TickContext::new(self.tick, 0.1).with_seed(self.seed);
        self.tick += 1;
        let mut ctx = ExecContext::new(
            &tick,
            1,
            &mut self.world,
            &mut self.blackboard,
            &mut self.criticality,
        );
        f(&mut ctx)
    }

    pub fn execute(&mut self, node: &mut Node<World>) -> Status {
        self.with_ctx(|ctx| node.execute(ctx))
    }

    pub fn abort(&mut self, node: &mut Node<World>) {
        self.with_ctx(|ctx| node.abort(ctx))
    }
}
