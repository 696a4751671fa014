#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maps a normalized input in `[0, 1]` to a utility in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResponseCurve {
    /// `slope * x + intercept`.
    Linear { slope: f32, intercept: f32 },
    /// `x ^ exponent`. Exponents above 1 punish mid-range inputs, below 1 reward them.
    Power { exponent: f32 },
    /// S-curve centred on `midpoint`.
    Logistic { steepness: f32, midpoint: f32 },
    /// `1 - x`.
    Inverse,
    /// `1` at or above `threshold`, else `0`.
    Step { threshold: f32 },
    /// Ignores the input.
    Constant(f32),
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ResponseCurve {
    pub const IDENTITY: Self = Self::Linear {
        slope: 1.0,
        intercept: 0.0,
    };

    pub fn evaluate(&self, input: f32) -> f32 {
        let x = clamp_unit(input);
        let y = match *self {
            Self::Linear { slope, intercept } => slope * x + intercept,
            Self::Power { exponent } => x.powf(exponent),
            Self::Logistic {
                steepness,
                midpoint,
            } => 1.0 / (1.0 + (-steepness * (x - midpoint)).exp()),
            Self::Inverse => 1.0 - x,
            Self::Step { threshold } => {
                if x >= threshold {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Constant(v) => v,
        };
        clamp_unit(y)
    }
}

/// Clamp to `[0, 1]`, mapping NaN to `0`.
pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
