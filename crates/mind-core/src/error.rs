use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("history size must be at least 1")]
    EmptyHistory,

    #[error("temperature bounds must satisfy 0 < min <= max (got min={min}, max={max})")]
    TemperatureBounds { min: f32, max: f32 },

    #[error("{field} must be finite and non-negative (got {value})")]
    Negative { field: &'static str, value: f32 },
}
