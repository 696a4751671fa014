use std::borrow::Cow;

use mind_bt::Node;
use mind_core::{ExecContext, WorldMut};

use crate::Consideration;

/// A candidate behavior for a [`crate::UtilitySelector`]: a subtree plus the score that decides
/// how likely it is to be picked.
pub struct UtilityAction<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    node: Node<W>,
    base_score: f32,
    considerations: Vec<Consideration<W>>,
}

impl<W> UtilityAction<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<Cow<'static, str>>, node: Node<W>, base_score: f32) -> Self {
        Self {
            name: name.into(),
            node,
            base_score,
            considerations: Vec::new(),
        }
    }

    pub fn with_consideration(mut self, consideration: Consideration<W>) -> Self {
        self.considerations.push(consideration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    pub fn node(&self) -> &Node<W> {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut Node<W> {
        &mut self.node
    }

    pub fn considerations(&self) -> &[Consideration<W>] {
        &self.considerations
    }

    /// `base_score` times every consideration. A zero factor vetoes the action and skips the
    /// remaining considerations; a non-finite result scores `0`.
    pub fn score(&mut self, ctx: &mut ExecContext<'_, W>) -> f32 {
        let mut score = self.base_score;
        for consideration in self.considerations.iter_mut() {
            if score == 0.0 || !score.is_finite() {
                break;
            }
            score *= consideration.evaluate(ctx);
        }

        if score.is_finite() {
            score
        } else {
            0.0
        }
    }
}

impl<W> std::fmt::Debug for UtilityAction<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtilityAction")
            .field("name", &self.name)
            .field("base_score", &self.base_score)
            .field("considerations", &self.considerations)
            .field("node", &self.node)
            .finish()
    }
}
