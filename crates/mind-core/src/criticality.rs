//! Adaptive exploration control.
//!
//! The controller keeps a rolling window of the action ids an entity chose, measures how varied
//! that window is (Shannon entropy, natural log), and nudges a softmax temperature toward a target
//! entropy: repetitive behaviour heats the temperature up, varied behaviour cools it down.

use std::collections::{BTreeMap, VecDeque};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BASELINE_TEMPERATURE: f32 = 1.0;
const BASELINE_INERTIA: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CriticalityConfig {
    /// Number of recent choices kept; older ones are evicted first.
    pub history_size: usize,
    pub min_temperature: f32,
    pub max_temperature: f32,
    /// Entropy (nats) the controller steers toward.
    pub target_entropy: f32,
    /// Temperature change per nat of entropy error, applied on each `update`.
    pub adjust_rate: f32,
}

impl Default for CriticalityConfig {
    fn default() -> Self {
        Self {
            history_size: 20,
            min_temperature: 0.1,
            max_temperature: 5.0,
            target_entropy: 1.0,
            adjust_rate: 0.5,
        }
    }
}

impl CriticalityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_size == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        let (min, max) = (self.min_temperature, self.max_temperature);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::TemperatureBounds { min, max });
        }
        for (field, value) in [
            ("target_entropy", self.target_entropy),
            ("adjust_rate", self.adjust_rate),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }

    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    pub fn with_temperature_bounds(mut self, min: f32, max: f32) -> Self {
        self.min_temperature = min;
        self.max_temperature = max;
        self
    }

    pub fn with_target_entropy(mut self, target_entropy: f32) -> Self {
        self.target_entropy = target_entropy;
        self
    }

    pub fn with_adjust_rate(mut self, adjust_rate: f32) -> Self {
        self.adjust_rate = adjust_rate;
        self
    }
}

#[derive(Debug, Clone)]
pub struct CriticalityController {
    config: CriticalityConfig,
    history: VecDeque<usize>,
    temperature: f32,
    entropy: f32,
    inertia: f32,
}

impl Default for CriticalityController {
    fn default() -> Self {
        Self::from_valid(CriticalityConfig::default())
    }
}

impl CriticalityController {
    pub fn new(config: CriticalityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: CriticalityConfig) -> Self {
        let mut controller = Self {
            config,
            history: VecDeque::with_capacity(config.history_size),
            temperature: BASELINE_TEMPERATURE,
            entropy: 0.0,
            inertia: BASELINE_INERTIA,
        };
        controller.reset();
        controller
    }

    pub fn config(&self) -> &CriticalityConfig {
        &self.config
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn entropy(&self) -> f32 {
        self.entropy
    }

    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    pub fn history_size(&self) -> usize {
        self.config.history_size
    }

    pub fn min_temperature(&self) -> f32 {
        self.config.min_temperature
    }

    pub fn max_temperature(&self) -> f32 {
        self.config.max_temperature
    }

    /// Recorded ids, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.history.iter().copied()
    }

    /// Append a chosen action id. Negative ids (e.g. "nothing chosen") are ignored.
    pub fn record_action(&mut self, id: i64) {
        let Ok(id) = usize::try_from(id) else {
            return;
        };
        while self.history.len() >= self.config.history_size {
            self.history.pop_front();
        }
        self.history.push_back(id);
    }

    /// Recompute entropy and inertia from the window, then adapt the temperature.
    pub fn update(&mut self) {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for id in self.history.iter().copied() {
            *counts.entry(id).or_default() += 1;
        }

        let total = self.history.len() as f32;
        let entropy = if total > 0.0 {
            counts
                .values()
                .map(|&c| {
                    let p = c as f32 / total;
                    -p * p.ln()
                })
                .sum::<f32>()
                .max(0.0)
        } else {
            0.0
        };

        let distinct = counts.len();
        self.entropy = entropy;
        self.inertia = if distinct > 1 {
            (1.0 - entropy / (distinct as f32).ln()).clamp(0.0, 1.0)
        } else {
            BASELINE_INERTIA
        };

        let error = self.config.target_entropy - entropy;
        let previous = self.temperature;
        self.temperature = self.clamp_temperature(previous + self.config.adjust_rate * error);

        tracing::debug!(
            entropy,
            inertia = self.inertia,
            from = previous,
            to = self.temperature,
            "criticality temperature updated"
        );
    }

    /// Set the temperature directly (clamped), bypassing entropy feedback.
    pub fn set_temperature(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        self.temperature = self.clamp_temperature(value);
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.temperature = self.clamp_temperature(BASELINE_TEMPERATURE);
        self.entropy = 0.0;
        self.inertia = BASELINE_INERTIA;
    }

    fn clamp_temperature(&self, value: f32) -> f32 {
        value.clamp(self.config.min_temperature, self.config.max_temperature)
    }
}
