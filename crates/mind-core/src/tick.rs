use crate::{AgentId, SplitMix64};

/// Per-frame data supplied by the host driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Logical frame index.
    pub tick: u64,
    pub dt_seconds: f32,
    /// World seed; combine with an agent id via [`TickContext::rng_for_agent`].
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self {
            tick,
            dt_seconds,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        SplitMix64::for_agent(self.seed, agent.stable_id(), stream)
    }
}
