use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    AgentId, Blackboard, CriticalityController, ExecContext, MonotonicClock, Policy, SharedClock,
    Status, TickContext, WorldMut,
};

/// Thinking cadence of one brain.
///
/// A brain thinks on ticks where `tick + think_offset_ticks` is a multiple of
/// `think_every_ticks`, so large crowds can be staggered over several frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BrainConfig {
    /// Think once every this many ticks. `0` is treated as `1`.
    pub think_every_ticks: u32,
    /// Phase shift applied to the tick index before the cadence check.
    pub think_offset_ticks: u32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            think_every_ticks: 1,
            think_offset_ticks: 0,
        }
    }
}

impl BrainConfig {
    /// Spread agents that think every N ticks across frames by their id.
    pub fn deterministic(agent: impl AgentId, think_every_ticks: u32) -> Self {
        let every = think_every_ticks.max(1);
        // The remainder is below `every`, so it always fits.
        let offset = u32::try_from(agent.stable_id() % u64::from(every)).unwrap_or(0);
        Self {
            think_every_ticks: every,
            think_offset_ticks: offset,
        }
    }

    /// Whether a brain with this cadence thinks on `tick`.
    pub fn should_think(&self, tick: u64) -> bool {
        let every = u64::from(self.think_every_ticks.max(1));
        tick.wrapping_add(u64::from(self.think_offset_ticks)) % every == 0
    }
}

/// All per-entity decision state: blackboard, criticality controller and the policy driving them.
pub struct Brain<W>
where
    W: WorldMut + 'static,
{
    pub agent: W::Agent,
    pub config: BrainConfig,
    pub blackboard: Blackboard,
    pub criticality: CriticalityController,
    pub policy: Box<dyn Policy<W>>,
    last_status: Option<Status>,
}

impl<W> Brain<W>
where
    W: WorldMut + 'static,
{
    pub fn new(agent: W::Agent, policy: Box<dyn Policy<W>>) -> Self {
        Self::with_clock(agent, Rc::new(MonotonicClock::new()), policy)
    }

    /// Brain whose blackboard TTLs and timed nodes read `clock`.
    pub fn with_clock(agent: W::Agent, clock: SharedClock, policy: Box<dyn Policy<W>>) -> Self {
        Self {
            agent,
            config: BrainConfig::default(),
            blackboard: Blackboard::with_clock(clock),
            criticality: CriticalityController::default(),
            policy,
            last_status: None,
        }
    }

    pub fn with_config(mut self, config: BrainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_criticality(mut self, criticality: CriticalityController) -> Self {
        self.criticality = criticality;
        self
    }

    /// Status returned by the policy on the most recent thinking tick.
    pub fn last_status(&self) -> Option<Status> {
        self.last_status
    }

    /// Sweep expired blackboard entries, then tick the policy. Returns `None` on ticks skipped by
    /// [`BrainConfig::should_think`].
    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> Option<Status> {
        if !self.config.should_think(ctx.tick) {
            return None;
        }

        self.blackboard.cleanup_expired();
        let mut exec = ExecContext::new(
            ctx,
            self.agent,
            world,
            &mut self.blackboard,
            &mut self.criticality,
        );
        let status = self.policy.tick(&mut exec);
        self.last_status = Some(status);
        Some(status)
    }
}

/// Tick a crowd of brains against one shared world.
///
/// Brains are sorted by [`AgentId::stable_id`] first, so every agent sees the world mutations of
/// lower ids within the same frame regardless of how the caller stores them. Returns how many
/// brains actually thought this tick.
pub fn tick_brains<W>(ctx: &TickContext, world: &mut W, brains: &mut [Brain<W>]) -> usize
where
    W: WorldMut + 'static,
{
    brains.sort_by_key(|b| b.agent.stable_id());
    brains
        .iter_mut()
        .filter_map(|brain| brain.tick(ctx, world))
        .count()
}
