use mind_core::{ExecContext, Status, WorldMut};

use crate::node::{BtNode, Node};

/// Single optional child shared by the decorators. A decorator built without a child degrades
/// to `Failure` and logs once.
struct Slot<W>
where
    W: WorldMut + 'static,
{
    child: Option<Node<W>>,
    warned: bool,
}

impl<W> Slot<W>
where
    W: WorldMut + 'static,
{
    fn new(child: Option<Node<W>>) -> Self {
        Self {
            child,
            warned: false,
        }
    }

    fn get(&mut self, decorator: &'static str) -> Option<&mut Node<W>> {
        if self.child.is_none() && !self.warned {
            self.warned = true;
            tracing::warn!(decorator, "decorator has no child; failing");
        }
        self.child.as_mut()
    }

    fn abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        if let Some(child) = self.child.as_mut() {
            child.abort(ctx);
        }
    }

    fn reset(&mut self) {
        if let Some(child) = self.child.as_mut() {
            child.reset();
        }
    }

    fn children(&self) -> Vec<&Node<W>> {
        self.child.iter().collect()
    }

    fn children_mut(&mut self) -> Vec<&mut Node<W>> {
        self.child.iter_mut().collect()
    }
}

/// Swaps `Success` and `Failure`; `Running` passes through.
pub struct Inverter<W>
where
    W: WorldMut + 'static,
{
    slot: Slot<W>,
}

impl<W> Inverter<W>
where
    W: WorldMut + 'static,
{
    pub fn new(child: Node<W>) -> Self {
        Self::from_option(Some(child))
    }

    pub fn from_option(child: Option<Node<W>>) -> Self {
        Self {
            slot: Slot::new(child),
        }
    }
}

impl<W> BtNode<W> for Inverter<W>
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "Inverter"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        match self.slot.get("Inverter") {
            Some(child) => child.execute(ctx).invert(),
            None => Status::Failure,
        }
    }

    fn on_abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.slot.abort(ctx);
    }

    fn reset(&mut self) {
        self.slot.reset();
    }

    fn children(&self) -> Vec<&Node<W>> {
        self.slot.children()
    }

    fn children_mut(&mut self) -> Vec<&mut Node<W>> {
        self.slot.children_mut()
    }
}

/// Runs its child repeatedly.
///
/// Each child success bumps a counter and restarts the child on the next tick, so the child's
/// last status stays visible in between. The repeater stays `Running` until
/// the counter reaches `times`, then succeeds. A negative `times` repeats forever and `0` succeeds
/// without ticking. Any child failure fails the repeater immediately.
pub struct Repeater<W>
where
    W: WorldMut + 'static,
{
    slot: Slot<W>,
    times: i32,
    completed: u32,
    restart: bool,
}

impl<W> Repeater<W>
where
    W: WorldMut + 'static,
{
    pub fn new(child: Node<W>, times: i32) -> Self {
        Self::from_option(Some(child), times)
    }

    pub fn forever(child: Node<W>) -> Self {
        Self::new(child, -1)
    }

    pub fn from_option(child: Option<Node<W>>, times: i32) -> Self {
        Self {
            slot: Slot::new(child),
            times,
            completed: 0,
            restart: false,
        }
    }

    /// Successful child runs in the current repeater run.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    fn is_done(&self) -> bool {
        u32::try_from(self.times).is_ok_and(|times| self.completed >= times)
    }
}

impl<W> BtNode<W> for Repeater<W>
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "Repeater"
    }

    fn on_enter(&mut self, _ctx: &mut ExecContext<'_, W>) {
        self.completed = 0;
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        if self.is_done() {
            return Status::Success;
        }
        let Some(child) = self.slot.get("Repeater") else {
            return Status::Failure;
        };
        if std::mem::take(&mut self.restart) {
            child.reset();
        }

        match child.execute(ctx) {
            Status::Running => Status::Running,
            Status::Failure => Status::Failure,
            Status::Success => {
                self.completed = self.completed.saturating_add(1);
                self.restart = true;
                if self.is_done() {
                    Status::Success
                } else {
                    Status::Running
                }
            }
        }
    }

    fn on_abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.slot.abort(ctx);
    }

    fn reset(&mut self) {
        self.completed = 0;
        self.restart = false;
        self.slot.reset();
    }

    fn children(&self) -> Vec<&Node<W>> {
        self.slot.children()
    }

    fn children_mut(&mut self) -> Vec<&mut Node<W>> {
        self.slot.children_mut()
    }
}

/// Blocks its child for `duration_seconds` after each success.
///
/// While cooling down the node fails without ticking the child. Only a child success starts the
/// timer. The timer survives [`Node::reset`]; use [`Cooldown::clear`] to drop it.
pub struct Cooldown<W>
where
    W: WorldMut + 'static,
{
    slot: Slot<W>,
    duration_seconds: f64,
    last_success: Option<f64>,
}

impl<W> Cooldown<W>
where
    W: WorldMut + 'static,
{
    pub fn new(child: Node<W>, duration_seconds: f64) -> Self {
        Self::from_option(Some(child), duration_seconds)
    }

    pub fn from_option(child: Option<Node<W>>, duration_seconds: f64) -> Self {
        Self {
            slot: Slot::new(child),
            duration_seconds: duration_seconds.max(0.0),
            last_success: None,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn is_on_cooldown(&self, now: f64) -> bool {
        self.remaining_cooldown(now) > 0.0
    }

    /// Seconds left before the child may run again; `0.0` when ready.
    pub fn remaining_cooldown(&self, now: f64) -> f64 {
        match self.last_success {
            Some(at) => (self.duration_seconds - (now - at)).max(0.0),
            None => 0.0,
        }
    }

    pub fn clear(&mut self) {
        self.last_success = None;
    }
}

impl<W> BtNode<W> for Cooldown<W>
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "Cooldown"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        let now = ctx.now();
        if self.is_on_cooldown(now) {
            return Status::Failure;
        }
        let Some(child) = self.slot.get("Cooldown") else {
            return Status::Failure;
        };

        let status = child.execute(ctx);
        if status == Status::Success {
            self.last_success = Some(now);
        }
        status
    }

    fn on_abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.slot.abort(ctx);
    }

    fn reset(&mut self) {
        self.slot.reset();
    }

    fn children(&self) -> Vec<&Node<W>> {
        self.slot.children()
    }

    fn children_mut(&mut self) -> Vec<&mut Node<W>> {
        self.slot.children_mut()
    }
}
