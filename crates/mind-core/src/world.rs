use core::fmt::Debug;

use crate::{BbKey, Blackboard};

/// Stable identifier for an agent.
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`)
/// - a stable numeric ID (`stable_id`) for seeding and logs
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Read-only view of the host engine.
///
/// The decision core does not prescribe which queries a world exposes; collaborators such as
/// locomotion are modelled as extension traits.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink into the host engine.
pub trait WorldMut: WorldView {}

/// Progress reported by the host's movement system for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveProgress {
    Moving,
    Arrived,
    /// The target cannot be reached (no path, agent missing, ...).
    Blocked,
}

/// External movement collaborator (path following, steering, rotation).
pub trait Locomotion: WorldMut {
    type Target: Clone + 'static;

    /// Advance the agent toward `target` by `dt_seconds`.
    fn move_toward(
        &mut self,
        agent: Self::Agent,
        target: &Self::Target,
        dt_seconds: f32,
    ) -> MoveProgress;

    fn stop(&mut self, agent: Self::Agent);
}

/// Counter bumped on the entity's blackboard each time a node issues a [`Locomotion`] command.
///
/// A movement node that is interrupted compares the counter with the value it last wrote and
/// only stops the agent if no other node has moved it since.
pub const LOCOMOTION_GENERATION: BbKey<u64> = BbKey::new("mind.locomotion.generation");

/// Latest locomotion generation; `0` before any command.
pub fn locomotion_generation(blackboard: &mut Blackboard) -> u64 {
    blackboard.get::<u64>(LOCOMOTION_GENERATION).copied().unwrap_or(0)
}

/// Claim the next locomotion generation. Call right before issuing a movement command.
pub fn claim_locomotion(blackboard: &mut Blackboard) -> u64 {
    if let Some(generation) = blackboard.get_mut::<u64>(LOCOMOTION_GENERATION) {
        *generation = generation.wrapping_add(1);
        return *generation;
    }
    blackboard.set(LOCOMOTION_GENERATION, 1u64);
    1
}
