use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// Structurally invalid caller input (wrong unit length, too-short transcript).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("embedding provider error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("invalid scoring configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}

impl ScoringError {
    /// Returns `true` when the caller sent something that can never be scored.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ScoringError::InvalidInput { .. })
    }
}
