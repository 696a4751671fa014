//! Behavior tree runtime built on `mind-core`.
//!
//! Every node is wrapped in a [`Node`], which owns the enter/tick/exit lifecycle: `on_enter` runs
//! once at the start of a run, `tick` runs every frame, and `on_exit` runs exactly once when the
//! run ends (terminal status or [`Node::abort`]). Control flow is reactive: composites re-check
//! earlier children every tick and abort a running branch that has been superseded.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod composite;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod node;
pub mod tree;

pub use composite::{Selector, Sequence};
pub use decorator::{Cooldown, Inverter, Repeater};
pub use error::TickError;
pub use leaf::{
    ActionLeaf, CheckBlackboard, CheckBlackboardValue, Condition, MoveTo, RemoveBlackboard,
    RunAction, SetBlackboard, Wait,
};
pub use mind_core::Status;
pub use node::{AsAny, BtNode, Node, NodeSnapshot};
pub use tree::BehaviorTree;
