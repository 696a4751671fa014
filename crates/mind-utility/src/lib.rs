//! Utility AI selection for `mind-bt` trees.
//!
//! A [`UtilitySelector`] is a behavior tree node that owns a set of [`UtilityAction`]s. Each action
//! scores itself as `base_score × ∏ considerations`, the selector turns the scores into a
//! temperature-weighted [`softmax`] distribution, samples one action with a seedable RNG and then
//! stays committed to it until its subtree finishes. Finished choices feed the entity's
//! [`mind_core::CriticalityController`], which adapts the temperature for the next round.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod consideration;
pub mod curve;
pub mod selector;
pub mod softmax;

pub use action::UtilityAction;
pub use consideration::Consideration;
pub use curve::ResponseCurve;
pub use selector::{UtilityActionSnapshot, UtilitySelector, UtilitySelectorConfig, UtilitySnapshot};
pub use softmax::softmax;
