use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use mind_core::{ExecContext, Policy, Status, WorldMut};
use mind_tools::{emit as trace_emit, TraceEvent};

use crate::error::TickError;
use crate::node::{Node, NodeSnapshot};

/// Root of one entity's behavior tree and its tick boundary.
///
/// A panic anywhere below the root is caught here, logged, and reported as `Failure` for that tick
/// only; the tree is hard-reset so the next tick starts a fresh run.
pub struct BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    root: Node<W>,
    last: Status,
    panics: u64,
}

impl<W> BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    pub fn new(root: Node<W>) -> Self {
        Self {
            root,
            last: Status::Failure,
            panics: 0,
        }
    }

    pub fn root(&self) -> &Node<W> {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node<W> {
        &mut self.root
    }

    pub fn last_status(&self) -> Status {
        self.last
    }

    /// Ticks that ended in a caught panic.
    pub fn panic_count(&self) -> u64 {
        self.panics
    }

    pub fn try_tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Result<Status, TickError> {
        let root = &mut self.root;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| root.execute(ctx)));

        match outcome {
            Ok(status) => {
                self.last = status;
                Ok(status)
            }
            Err(payload) => {
                self.root.reset();
                self.last = Status::Failure;
                self.panics = self.panics.saturating_add(1);
                trace_emit(
                    ctx.blackboard,
                    TraceEvent::new(ctx.tick.tick, "bt.panic").with_a(self.panics),
                );
                Err(TickError::Panicked {
                    tree: self.root.name().to_owned(),
                    message: panic_message(payload.as_ref()),
                })
            }
        }
    }

    /// Tick the tree, converting a panic into `Failure`.
    pub fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        match self.try_tick(ctx) {
            Ok(status) => status,
            Err(err) => {
                tracing::error!(error = %err, tick = ctx.tick.tick, "behavior tree tick failed");
                Status::Failure
            }
        }
    }

    /// Interrupt whatever is running, running exit hooks.
    pub fn abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.root.abort(ctx);
    }

    pub fn reset(&mut self) {
        self.root.reset();
        self.last = Status::Failure;
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        self.root.snapshot()
    }
}

impl<W> Policy<W> for BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        BehaviorTree::tick(self, ctx)
    }

    fn reset(&mut self) {
        BehaviorTree::reset(self);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
