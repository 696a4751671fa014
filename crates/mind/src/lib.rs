//! Umbrella crate that re-exports the `mind-*` building blocks.
//!
//! - [`core`]: blackboard, clocks, criticality controller, execution context, entity driver.
//! - [`bt`]: behavior tree nodes with an enter/tick/exit lifecycle.
//! - [`utility`]: considerations, response curves and the softmax utility selector.
//! - [`tools`]: deterministic trace events for debugging decisions.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use mind_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use mind_tools as tools;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use mind_bt as bt;

#[cfg(feature = "utility")]
#[cfg_attr(docsrs, doc(cfg(feature = "utility")))]
pub use mind_utility as utility;
