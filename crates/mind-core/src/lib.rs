//! Deterministic, engine-agnostic decision primitives shared by every `mind-*` crate.
//!
//! Everything here is owned per entity: one [`Blackboard`], one [`CriticalityController`] and one
//! time source per agent, threaded through an explicit [`ExecContext`] instead of globals.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod blackboard;
pub mod brain;
pub mod clock;
pub mod context;
pub mod criticality;
pub mod error;
pub mod policy;
pub mod rng;
pub mod tick;
pub mod world;

pub use action::{Action, Status};
pub use blackboard::{BbKey, Blackboard, BlackboardEvent, SubscriptionId};
pub use brain::{tick_brains, Brain, BrainConfig};
pub use clock::{Clock, ManualClock, MonotonicClock, SharedClock};
pub use context::ExecContext;
pub use criticality::{CriticalityConfig, CriticalityController};
pub use error::ConfigError;
pub use policy::Policy;
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::{
    claim_locomotion, locomotion_generation, AgentId, Locomotion, MoveProgress, WorldMut,
    WorldView, LOCOMOTION_GENERATION,
};
