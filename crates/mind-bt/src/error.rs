use thiserror::Error;

/// Failure captured at the per-entity tick boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickError {
    #[error("node panicked during tick of tree `{tree}`: {message}")]
    Panicked { tree: String, message: String },
}
