use std::any::Any;
use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use mind_core::{ExecContext, Status, WorldMut};

/// Lets [`Node::downcast_ref`] reach the concrete node kind behind a `dyn BtNode`.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Logic of one node kind. Lifecycle bookkeeping lives in [`Node`]; implementors only describe
/// what happens at each phase.
pub trait BtNode<W>: AsAny + 'static
where
    W: WorldMut + 'static,
{
    /// Short label used in snapshots and logs.
    fn kind(&self) -> &'static str {
        "Custom"
    }

    fn on_enter(&mut self, _ctx: &mut ExecContext<'_, W>) {}

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status;

    fn on_exit(&mut self, _ctx: &mut ExecContext<'_, W>) {}

    /// Interrupted while running, right before `on_exit`. Nodes with children abort the running
    /// ones here.
    fn on_abort(&mut self, _ctx: &mut ExecContext<'_, W>) {}

    /// Hard reset: drop per-run state and reset children, without exit hooks.
    fn reset(&mut self) {}

    fn children(&self) -> Vec<&Node<W>> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut Node<W>> {
        Vec::new()
    }
}

/// An execution node: a named [`BtNode`] plus its run state.
pub struct Node<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    last_status: Status,
    running: bool,
    behavior: Box<dyn BtNode<W>>,
}

impl<W> Node<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<Cow<'static, str>>, behavior: impl BtNode<W>) -> Self {
        Self::boxed(name, Box::new(behavior))
    }

    pub fn boxed(name: impl Into<Cow<'static, str>>, behavior: Box<dyn BtNode<W>>) -> Self {
        Self {
            name: name.into(),
            last_status: Status::Failure,
            running: false,
            behavior,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &'static str {
        self.behavior.kind()
    }

    pub fn last_status(&self) -> Status {
        self.last_status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one tick: enter if this is the start of a run, tick, and exit on a terminal status.
    pub fn execute(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        if !self.running {
            self.behavior.on_enter(ctx);
            self.running = true;
        }

        let status = self.behavior.tick(ctx);
        self.last_status = status;

        if status.is_terminal() {
            self.running = false;
            self.behavior.on_exit(ctx);
        }
        status
    }

    /// Interrupt a running node (and its running descendants), running exit hooks. No-op when idle.
    pub fn abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        if !self.running {
            return;
        }
        tracing::debug!(node = %self.name, kind = self.kind(), "aborting node");
        self.behavior.on_abort(ctx);
        self.running = false;
        self.behavior.on_exit(ctx);
    }

    /// Forget all run state, recursively, without exit hooks.
    pub fn reset(&mut self) {
        self.running = false;
        self.last_status = Status::Failure;
        self.behavior.reset();
    }

    pub fn behavior(&self) -> &dyn BtNode<W> {
        &*self.behavior
    }

    pub fn children(&self) -> Vec<&Node<W>> {
        self.behavior.children()
    }

    pub fn downcast_ref<T: BtNode<W>>(&self) -> Option<&T> {
        AsAny::as_any(&*self.behavior).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: BtNode<W>>(&mut self) -> Option<&mut T> {
        AsAny::as_any_mut(&mut *self.behavior).downcast_mut::<T>()
    }

    /// Depth-first search for a node by name, starting with `self`.
    pub fn find(&self, name: &str) -> Option<&Node<W>> {
        if self.name == name {
            return Some(self);
        }
        self.behavior
            .children()
            .into_iter()
            .find_map(|child| child.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Node<W>> {
        if self.name == name {
            return Some(self);
        }
        self.behavior
            .children_mut()
            .into_iter()
            .find_map(|child| child.find_mut(name))
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            name: self.name.to_string(),
            kind: self.kind().to_string(),
            status: self.last_status,
            running: self.running,
            children: self.children().into_iter().map(Node::snapshot).collect(),
        }
    }
}

impl<W> std::fmt::Debug for Node<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("last_status", &self.last_status)
            .field("running", &self.running)
            .finish()
    }
}

/// Read-only copy of a tree's run state, for debug tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeSnapshot {
    pub name: String,
    pub kind: String,
    pub status: Status,
    pub running: bool,
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Names of the nodes currently running, root first.
    pub fn running_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(self);
        while let Some(node) = current.filter(|n| n.running) {
            path.push(node.name.as_str());
            current = node.children.iter().find(|c| c.running);
        }
        path
    }
}
