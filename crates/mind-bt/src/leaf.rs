use std::marker::PhantomData;

use mind_core::{
    claim_locomotion, locomotion_generation, Action, ExecContext, Locomotion, MoveProgress, Status,
    WorldMut,
};

use crate::node::BtNode;

/// Predicate leaf. Never returns `Running`.
pub struct Condition<W, F> {
    cond: F,
    _world: PhantomData<fn() -> W>,
}

impl<W, F> Condition<W, F>
where
    W: WorldMut + 'static,
    F: FnMut(&mut ExecContext<'_, W>) -> bool + 'static,
{
    pub fn new(cond: F) -> Self {
        Self {
            cond,
            _world: PhantomData,
        }
    }
}

impl<W, F> BtNode<W> for Condition<W, F>
where
    W: WorldMut + 'static,
    F: FnMut(&mut ExecContext<'_, W>) -> bool + 'static,
{
    fn kind(&self) -> &'static str {
        "Condition"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        (self.cond)(ctx).into()
    }
}

/// Succeeds while the blackboard holds a live entry for `key`, of any type.
#[derive(Debug, Clone)]
pub struct CheckBlackboard {
    key: String,
}

impl CheckBlackboard {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl<W> BtNode<W> for CheckBlackboard
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "CheckBlackboard"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        ctx.blackboard.has(&self.key).into()
    }
}

/// Succeeds when `key` holds a `T` that satisfies `predicate`. Entries of another type fail.
pub struct CheckBlackboardValue<T, P> {
    key: String,
    predicate: P,
    _value: PhantomData<fn() -> T>,
}

impl<T, P> CheckBlackboardValue<T, P>
where
    T: 'static,
    P: FnMut(&T) -> bool + 'static,
{
    pub fn new(key: impl Into<String>, predicate: P) -> Self {
        Self {
            key: key.into(),
            predicate,
            _value: PhantomData,
        }
    }
}

impl<T, P, W> BtNode<W> for CheckBlackboardValue<T, P>
where
    T: 'static,
    P: FnMut(&T) -> bool + 'static,
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "CheckBlackboardValue"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        let predicate = &mut self.predicate;
        ctx.blackboard
            .get::<T>(&self.key)
            .is_some_and(|value| predicate(value))
            .into()
    }
}

type Hook<W> = Box<dyn FnMut(&mut ExecContext<'_, W>)>;

/// Closure-backed action leaf with optional enter/exit hooks.
pub struct ActionLeaf<W, F>
where
    W: WorldMut + 'static,
{
    tick_fn: F,
    enter_fn: Option<Hook<W>>,
    exit_fn: Option<Hook<W>>,
}

impl<W, F> ActionLeaf<W, F>
where
    W: WorldMut + 'static,
    F: FnMut(&mut ExecContext<'_, W>) -> Status + 'static,
{
    pub fn new(tick_fn: F) -> Self {
        Self {
            tick_fn,
            enter_fn: None,
            exit_fn: None,
        }
    }

    pub fn on_enter(mut self, hook: impl FnMut(&mut ExecContext<'_, W>) + 'static) -> Self {
        self.enter_fn = Some(Box::new(hook));
        self
    }

    pub fn on_exit(mut self, hook: impl FnMut(&mut ExecContext<'_, W>) + 'static) -> Self {
        self.exit_fn = Some(Box::new(hook));
        self
    }
}

impl<W, F> BtNode<W> for ActionLeaf<W, F>
where
    W: WorldMut + 'static,
    F: FnMut(&mut ExecContext<'_, W>) -> Status + 'static,
{
    fn kind(&self) -> &'static str {
        "Action"
    }

    fn on_enter(&mut self, ctx: &mut ExecContext<'_, W>) {
        if let Some(hook) = self.enter_fn.as_mut() {
            hook(ctx);
        }
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        (self.tick_fn)(ctx)
    }

    fn on_exit(&mut self, ctx: &mut ExecContext<'_, W>) {
        if let Some(hook) = self.exit_fn.as_mut() {
            hook(ctx);
        }
    }
}

/// Drives a [`mind_core::Action`]: `start` on enter, `cancel` when aborted.
pub struct RunAction<W>
where
    W: WorldMut + 'static,
{
    action: Box<dyn Action<W>>,
}

impl<W> RunAction<W>
where
    W: WorldMut + 'static,
{
    pub fn new(action: impl Action<W>) -> Self {
        Self {
            action: Box::new(action),
        }
    }
}

impl<W> BtNode<W> for RunAction<W>
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "RunAction"
    }

    fn on_enter(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.action.start(ctx);
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        self.action.tick(ctx)
    }

    fn on_abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.action.cancel(ctx);
    }
}

/// Writes a value into the blackboard, optionally with a TTL, and succeeds.
#[derive(Debug, Clone)]
pub struct SetBlackboard<T> {
    key: String,
    value: T,
    ttl_seconds: Option<f64>,
}

impl<T> SetBlackboard<T>
where
    T: Clone + 'static,
{
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value,
            ttl_seconds: None,
        }
    }

    pub fn with_ttl(mut self, ttl_seconds: f64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }
}

impl<T, W> BtNode<W> for SetBlackboard<T>
where
    T: Clone + 'static,
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "SetBlackboard"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        let value = self.value.clone();
        match self.ttl_seconds {
            Some(ttl) => ctx.blackboard.set_with_ttl(&self.key, value, ttl),
            None => ctx.blackboard.set(&self.key, value),
        }
        Status::Success
    }
}

/// Deletes a blackboard key. Succeeds whether or not the key existed.
#[derive(Debug, Clone)]
pub struct RemoveBlackboard {
    key: String,
}

impl RemoveBlackboard {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl<W> BtNode<W> for RemoveBlackboard
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "RemoveBlackboard"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        ctx.blackboard.remove(&self.key);
        Status::Success
    }
}

/// `Running` until `duration_seconds` have passed on the entity clock since entry.
#[derive(Debug, Clone)]
pub struct Wait {
    duration_seconds: f64,
    started_at: Option<f64>,
}

impl Wait {
    pub fn new(duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            started_at: None,
        }
    }
}

impl<W> BtNode<W> for Wait
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "Wait"
    }

    fn on_enter(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.started_at = Some(ctx.now());
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        let now = ctx.now();
        let started = *self.started_at.get_or_insert(now);
        if now - started >= self.duration_seconds {
            Status::Success
        } else {
            Status::Running
        }
    }

    fn on_exit(&mut self, _ctx: &mut ExecContext<'_, W>) {
        self.started_at = None;
    }

    fn reset(&mut self) {
        self.started_at = None;
    }
}

/// Moves the agent toward the target stored under `target_key`, via the world's
/// [`Locomotion`] collaborator.
///
/// Fails when the target is missing, the mover reports [`MoveProgress::Blocked`], or the optional
/// timeout runs out. Movement is stopped whenever the node ends without arriving, unless another
/// node has issued a locomotion command since (see [`mind_core::LOCOMOTION_GENERATION`]).
pub struct MoveTo<W>
where
    W: Locomotion + 'static,
{
    target_key: String,
    timeout_seconds: Option<f64>,
    started_at: Option<f64>,
    issued: Option<u64>,
    _world: PhantomData<fn() -> W>,
}

impl<W> MoveTo<W>
where
    W: Locomotion + 'static,
{
    pub fn new(target_key: impl Into<String>) -> Self {
        Self {
            target_key: target_key.into(),
            timeout_seconds: None,
            started_at: None,
            issued: None,
            _world: PhantomData,
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: f64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    fn timed_out(&self, now: f64) -> bool {
        match (self.timeout_seconds, self.started_at) {
            (Some(limit), Some(started)) => now - started >= limit,
            _ => false,
        }
    }

    /// Stop the agent if the last locomotion command was ours.
    fn release(&mut self, ctx: &mut ExecContext<'_, W>) {
        let Some(issued) = self.issued.take() else {
            return;
        };
        if issued == locomotion_generation(ctx.blackboard) {
            ctx.world.stop(ctx.agent);
        } else {
            tracing::debug!(key = %self.target_key, "movement taken over; not stopping");
        }
    }
}

impl<W> BtNode<W> for MoveTo<W>
where
    W: Locomotion + 'static,
{
    fn kind(&self) -> &'static str {
        "MoveTo"
    }

    fn on_enter(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.started_at = Some(ctx.now());
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        let Some(target) = ctx.blackboard.try_get::<W::Target>(&self.target_key) else {
            self.release(ctx);
            return Status::Failure;
        };

        if self.timed_out(ctx.now()) {
            tracing::debug!(key = %self.target_key, "move timed out");
            self.release(ctx);
            return Status::Failure;
        }

        self.issued = Some(claim_locomotion(ctx.blackboard));
        match ctx.world.move_toward(ctx.agent, &target, ctx.tick.dt_seconds) {
            MoveProgress::Moving => Status::Running,
            MoveProgress::Arrived => {
                self.issued = None;
                Status::Success
            }
            MoveProgress::Blocked => {
                self.release(ctx);
                Status::Failure
            }
        }
    }

    fn on_exit(&mut self, _ctx: &mut ExecContext<'_, W>) {
        self.started_at = None;
        self.issued = None;
    }

    fn on_abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        self.release(ctx);
    }

    fn reset(&mut self) {
        self.started_at = None;
        self.issued = None;
    }
}
