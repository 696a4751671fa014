use mind_core::{ExecContext, Status, WorldMut};
use mind_tools::{emit as trace_emit, TraceEvent};

use crate::node::{BtNode, Node};

/// Ordered children plus the index of the one left `Running` last tick.
///
/// Shared by [`Selector`] and [`Sequence`]: both walk children in construction order, stop at the
/// first child whose status differs from `pass`, and abort a previously running child that is no
/// longer the one deciding the result.
struct Children<W>
where
    W: WorldMut + 'static,
{
    nodes: Vec<Node<W>>,
    running: Option<usize>,
}

impl<W> Children<W>
where
    W: WorldMut + 'static,
{
    fn new(nodes: Vec<Node<W>>) -> Self {
        Self {
            nodes,
            running: None,
        }
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>, pass: Status, all_passed: Status) -> Status {
        for i in 0..self.nodes.len() {
            let status = self.nodes[i].execute(ctx);
            if status == pass {
                continue;
            }

            self.abort_superseded(i, ctx);
            self.running = (status == Status::Running).then_some(i);
            return status;
        }

        self.running = None;
        all_passed
    }

    fn abort_superseded(&mut self, decided_by: usize, ctx: &mut ExecContext<'_, W>) {
        let Some(prev) = self.running else {
            return;
        };
        if prev == decided_by || !self.nodes[prev].is_running() {
            return;
        }

        tracing::debug!(
            superseded = self.nodes[prev].name(),
            by = self.nodes[decided_by].name(),
            "aborting superseded branch"
        );
        self.nodes[prev].abort(ctx);
        trace_emit(
            ctx.blackboard,
            TraceEvent::new(ctx.tick.tick, "bt.abort")
                .with_a(prev as u64)
                .with_b(decided_by as u64),
        );
    }

    fn abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        if let Some(prev) = self.running.take() {
            self.nodes[prev].abort(ctx);
        }
    }

    fn reset(&mut self) {
        self.running = None;
        for node in self.nodes.iter_mut() {
            node.reset();
        }
    }
}

/// Logical OR: the first child that does not fail decides the result.
///
/// An empty selector fails.
pub struct Selector<W>
where
    W: WorldMut + 'static,
{
    children: Children<W>,
}

impl<W> Selector<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Node<W>>) -> Self {
        Self {
            children: Children::new(children),
        }
    }

    /// Index of the child left running by the last tick.
    pub fn running_child(&self) -> Option<usize> {
        self.children.running
    }
}

impl<W> BtNode<W> for Selector<W>
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "Selector"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        self.children.tick(ctx, Status::Failure, Status::Failure)
    }

    fn on_abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.children.abort(ctx);
    }

    fn reset(&mut self) {
        self.children.reset();
    }

    fn children(&self) -> Vec<&Node<W>> {
        self.children.nodes.iter().collect()
    }

    fn children_mut(&mut self) -> Vec<&mut Node<W>> {
        self.children.nodes.iter_mut().collect()
    }
}

/// Logical AND: the first child that does not succeed decides the result.
///
/// An empty sequence succeeds.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    children: Children<W>,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Node<W>>) -> Self {
        Self {
            children: Children::new(children),
        }
    }

    pub fn running_child(&self) -> Option<usize> {
        self.children.running
    }
}

impl<W> BtNode<W> for Sequence<W>
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "Sequence"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        self.children.tick(ctx, Status::Success, Status::Success)
    }

    fn on_abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.children.abort(ctx);
    }

    fn reset(&mut self) {
        self.children.reset();
    }

    fn children(&self) -> Vec<&Node<W>> {
        self.children.nodes.iter().collect()
    }

    fn children_mut(&mut self) -> Vec<&mut Node<W>> {
        self.children.nodes.iter_mut().collect()
    }
}
