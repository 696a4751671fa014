use crate::{Blackboard, CriticalityController, TickContext, WorldMut};

/// Everything one entity's decision logic may touch during a single tick.
///
/// Built fresh by the driver each frame and passed by `&mut` down the tree; nothing in the
/// decision core reaches for process-wide state.
pub struct ExecContext<'a, W>
where
    W: WorldMut + 'static,
{
    pub tick: &'a TickContext,
    pub agent: W::Agent,
    pub world: &'a mut W,
    pub blackboard: &'a mut Blackboard,
    pub criticality: &'a mut CriticalityController,
}

impl<'a, W> ExecContext<'a, W>
where
    W: WorldMut + 'static,
{
    pub fn new(
        tick: &'a TickContext,
        agent: W::Agent,
        world: &'a mut W,
        blackboard: &'a mut Blackboard,
        criticality: &'a mut CriticalityController,
    ) -> Self {
        Self {
            tick,
            agent,
            world,
            blackboard,
            criticality,
        }
    }

    /// Current time on the entity clock (the blackboard's time source).
    pub fn now(&self) -> f64 {
        self.blackboard.now()
    }

    pub fn dt_seconds(&self) -> f32 {
        self.tick.dt_seconds
    }
}
