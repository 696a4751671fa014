#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use mind_bt::{BtNode, Node, Status};
use mind_core::{
    Blackboard, CriticalityController, ExecContext, ManualClock, TickContext, WorldMut, WorldView,
};

#[derive(Debug, Default)]
pub struct TestWorld {
    pub log: Vec<String>,
}

impl TestWorld {
    pub fn count(&self, entry: &str) -> usize {
        self.log.iter().filter(|e| *e == entry).count()
    }
}

impl WorldView for TestWorld {
    type Agent = u64;
}

impl WorldMut for TestWorld {}

/// Leaf that logs every lifecycle call and returns whatever status the test dials in.
pub struct Recorder {
    name: &'static str,
    status: Rc<Cell<Status>>,
}

impl BtNode<TestWorld> for Recorder {
    fn kind(&self) -> &'static str {
        "Recorder"
    }

    fn on_enter(&mut self, ctx: &mut ExecContext<'_, TestWorld>) {
        ctx.world.log.push(format!("enter:{}", self.name));
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, TestWorld>) -> Status {
        ctx.world.log.push(format!("tick:{}", self.name));
        self.status.get()
    }

    fn on_exit(&mut self, ctx: &mut ExecContext<'_, TestWorld>) {
        ctx.world.log.push(format!("exit:{}", self.name));
    }

    fn on_abort(&mut self, ctx: &mut ExecContext<'_, TestWorld>) {
        ctx.world.log.push(format!("abort:{}", self.name));
    }
}

pub fn recorder(name: &'static str, status: Status) -> (Node<TestWorld>, Rc<Cell<Status>>) {
    let handle = Rc::new(Cell::new(status));
    let node = Node::new(
        name,
        Recorder {
            name,
            status: handle.clone(),
        },
    );
    (node, handle)
}

pub struct Harness {
    pub clock: ManualClock,
    pub world: TestWorld,
    pub blackboard: Blackboard,
    pub criticality: CriticalityController,
    pub tick: u64,
}

impl Harness {
    pub fn new() -> Self {
        let clock = ManualClock::new();
        Self {
            blackboard: Blackboard::with_clock(clock.shared()),
            clock,
            world: TestWorld::default(),
            criticality: CriticalityController::default(),
            tick: 0,
        }
    }

    pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut ExecContext<'_, TestWorld>) -> R) -> R {
        let tick = TickContext::new(self.tick, 0.1);
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

    pub fn execute(&mut self, node: &mut Node<TestWorld>) -> Status {
        self.with_ctx(|ctx| node.execute(ctx))
    }

    pub fn abort(&mut self, node: &mut Node<TestWorld>) {
        self.with_ctx(|ctx| node.abort(ctx))
    }
}

impl Harness {
    pub fn clock_now(&self) -> f64 {
        use mind_core::Clock;
        self.clock.now()
    }
}
