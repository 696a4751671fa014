#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use mind_bt::{BtNode, Node};
use mind_core::rng::mix64;
use mind_core::{BbKey, DeterministicRng, ExecContext, SplitMix64, Status, WorldMut};
use mind_tools::{emit as trace_emit, TraceEvent};

use crate::{softmax, UtilityAction};

/// Per-entity count of unseeded draws made during the current tick.
const DRAWS: BbKey<DrawCounter> = BbKey::new("mind.utility.draws");

#[derive(Debug, Clone, Copy)]
struct DrawCounter {
    tick: u64,
    next: u64,
}

/// Index of this draw among the entity's unseeded draws in the current tick.
fn next_draw<W: WorldMut + 'static>(ctx: &mut ExecContext<'_, W>) -> u64 {
    let tick = ctx.tick.tick;
    if let Some(counter) = ctx.blackboard.get_mut::<DrawCounter>(DRAWS) {
        if counter.tick != tick {
            *counter = DrawCounter { tick, next: 0 };
        }
        let draw = counter.next;
        counter.next = counter.next.wrapping_add(1);
        return draw;
    }
    ctx.blackboard.set(DRAWS, DrawCounter { tick, next: 1 });
    0
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UtilitySelectorConfig {
    /// Actions scoring at or below this are never sampled. Scores at or below zero are always
    /// excluded.
    pub min_score: f32,
}

impl Default for UtilitySelectorConfig {
    fn default() -> Self {
        Self { min_score: 0.0 }
    }
}

/// Behavior tree node that samples one of its [`UtilityAction`]s by softmax over their scores.
///
/// Once an action is picked the selector is committed to it: while its subtree keeps returning
/// `Running`, only that subtree is ticked and nothing is rescored. When the subtree finishes, its
/// index is recorded in the entity's criticality controller and the controller is updated, so the
/// next round samples at the adapted temperature.
///
/// Without an explicit RNG the draw comes from a stream derived from the tick seed, the agent id,
/// the tick index and the order of the draw within the tick. Sibling selectors in one tree thus
/// sample independently while replays stay deterministic.
pub struct UtilitySelector<W>
where
    W: WorldMut + 'static,
{
    actions: Vec<UtilityAction<W>>,
    config: UtilitySelectorConfig,
    rng: Option<Box<dyn DeterministicRng>>,
    current: Option<usize>,
    last_scores: Vec<f32>,
    last_probabilities: Vec<f32>,
    last_temperature: f32,
}

impl<W> UtilitySelector<W>
where
    W: WorldMut + 'static,
{
    pub fn new(actions: Vec<UtilityAction<W>>) -> Self {
        Self {
            actions,
            config: UtilitySelectorConfig::default(),
            rng: None,
            current: None,
            last_scores: Vec::new(),
            last_probabilities: Vec::new(),
            last_temperature: 1.0,
        }
    }

    pub fn with_config(mut self, config: UtilitySelectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(SplitMix64::new(seed))
    }

    pub fn with_rng(mut self, rng: impl DeterministicRng + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn with_action(mut self, action: UtilityAction<W>) -> Self {
        self.add_action(action);
        self
    }

    pub fn config(&self) -> UtilitySelectorConfig {
        self.config
    }

    pub fn add_action(&mut self, action: UtilityAction<W>) {
        self.actions.push(action);
        self.clear_cache();
    }

    /// Remove the first action called `name`.
    ///
    /// Removing the committed action drops it without exit hooks; abort the selector first if
    /// they must run.
    pub fn remove_action(&mut self, name: &str) -> Option<UtilityAction<W>> {
        let idx = self.position(name)?;
        self.current = match self.current {
            Some(c) if c == idx => None,
            Some(c) if c > idx => Some(c - 1),
            other => other,
        };
        self.clear_cache();
        Some(self.actions.remove(idx))
    }

    pub fn get_action(&self, name: &str) -> Option<&UtilityAction<W>> {
        self.actions.iter().find(|a| a.name() == name)
    }

    pub fn get_action_mut(&mut self, name: &str) -> Option<&mut UtilityAction<W>> {
        self.actions.iter_mut().find(|a| a.name() == name)
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn actions(&self) -> &[UtilityAction<W>] {
        &self.actions
    }

    /// The committed action, if one is running.
    pub fn current_action(&self) -> Option<&UtilityAction<W>> {
        self.current.and_then(|idx| self.actions.get(idx))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Scores from the last selection round, in action order.
    pub fn last_scores(&self) -> &[f32] {
        &self.last_scores
    }

    /// Sampling distribution from the last selection round, in action order.
    pub fn last_probabilities(&self) -> &[f32] {
        &self.last_probabilities
    }

    /// Temperature used by the last selection round.
    pub fn last_temperature(&self) -> f32 {
        self.last_temperature
    }

    pub fn snapshot(&self) -> UtilitySnapshot {
        let actions = self
            .actions
            .iter()
            .enumerate()
            .map(|(i, action)| {
                let score = self.last_scores.get(i).copied();
                let probability = self.last_probabilities.get(i).copied().unwrap_or(0.0);
                UtilityActionSnapshot {
                    name: action.name().to_owned(),
                    score: score.unwrap_or(0.0),
                    probability,
                    // Eligibility is decided on the score; softmax can underflow to zero.
                    eligible: score.is_some_and(|s| self.passes_min_score(s)),
                    committed: self.current == Some(i),
                }
            })
            .collect();

        UtilitySnapshot {
            current: self.current_action().map(|a| a.name().to_owned()),
            temperature: self.last_temperature,
            actions,
        }
    }

    fn passes_min_score(&self, score: f32) -> bool {
        score.is_finite() && score > 0.0 && score > self.config.min_score
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.name() == name)
    }

    fn clear_cache(&mut self) {
        self.last_scores.clear();
        self.last_probabilities.clear();
    }

    fn select(&mut self, ctx: &mut ExecContext<'_, W>) -> Option<usize> {
        self.last_scores = self
            .actions
            .iter_mut()
            .map(|action| action.score(ctx))
            .collect();

        let masked: Vec<f32> = self
            .last_scores
            .iter()
            .map(|&s| if self.passes_min_score(s) { s } else { 0.0 })
            .collect();

        self.last_temperature = ctx.criticality.temperature();
        self.last_probabilities = softmax(&masked, self.last_temperature);

        let picked = match self.rng.as_mut() {
            Some(rng) => rng.pick_weighted(&self.last_probabilities),
            None => {
                let stream = mix64(ctx.tick.tick) ^ next_draw(ctx);
                ctx.tick
                    .rng_for_agent(ctx.agent, stream)
                    .pick_weighted(&self.last_probabilities)
            }
        };

        match picked {
            Some(idx) => {
                tracing::debug!(
                    action = self.actions[idx].name(),
                    score = self.last_scores[idx],
                    probability = self.last_probabilities[idx],
                    temperature = self.last_temperature,
                    "utility action selected"
                );
                trace_emit(
                    ctx.blackboard,
                    TraceEvent::new(ctx.tick.tick, "utility.select").with_a(idx as u64),
                );
            }
            None => {
                tracing::debug!(actions = self.actions.len(), "no eligible utility action");
            }
        }
        picked
    }

    fn finish(&mut self, idx: usize, status: Status, ctx: &mut ExecContext<'_, W>) {
        self.current = None;
        ctx.criticality.record_action(idx as i64);
        ctx.criticality.update();
        trace_emit(
            ctx.blackboard,
            TraceEvent::new(ctx.tick.tick, "utility.done")
                .with_a(idx as u64)
                .with_b(u64::from(status.is_success())),
        );
    }
}

impl<W> BtNode<W> for UtilitySelector<W>
where
    W: WorldMut + 'static,
{
    fn kind(&self) -> &'static str {
        "UtilitySelector"
    }

    fn tick(&mut self, ctx: &mut ExecContext<'_, W>) -> Status {
        let committed = self
            .current
            .filter(|&idx| self.actions.get(idx).is_some_and(|a| a.node().is_running()));

        let idx = match committed {
            Some(idx) => idx,
            None => {
                self.current = None;
                match self.select(ctx) {
                    Some(idx) => idx,
                    None => return Status::Failure,
                }
            }
        };

        let status = self.actions[idx].node_mut().execute(ctx);
        if status.is_terminal() {
            self.finish(idx, status, ctx);
        } else {
            self.current = Some(idx);
        }
        status
    }

    /// Aborts the committed action without recording it as a choice.
    fn on_abort(&mut self, ctx: &mut ExecContext<'_, W>) {
        if let Some(idx) = self.current.take() {
            if let Some(action) = self.actions.get_mut(idx) {
                action.node_mut().abort(ctx);
            }
        }
    }

    fn reset(&mut self) {
        self.current = None;
        self.clear_cache();
        for action in self.actions.iter_mut() {
            action.node_mut().reset();
        }
    }

    fn children(&self) -> Vec<&Node<W>> {
        self.actions.iter().map(UtilityAction::node).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut Node<W>> {
        self.actions.iter_mut().map(UtilityAction::node_mut).collect()
    }
}

/// Read-only view of a selector's last round, for debug tooling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtilitySnapshot {
    pub current: Option<String>,
    pub temperature: f32,
    pub actions: Vec<UtilityActionSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtilityActionSnapshot {
    pub name: String,
    pub score: f32,
    pub probability: f32,
    pub eligible: bool,
    pub committed: bool,
}

impl UtilitySnapshot {
    /// Highest-probability action of the last round.
    pub fn most_likely(&self) -> Option<&UtilityActionSnapshot> {
        self.actions
            .iter()
            .filter(|a| a.eligible)
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
    }
}
