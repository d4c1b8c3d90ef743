use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to load classifier: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    Tokenization { reason: String },

    #[error("classifier inference failed: {reason}")]
    Inference { reason: String },

    /// The LLM provider call failed or returned nothing usable.
    #[error("classification provider error: {reason}")]
    Provider { reason: String },

    #[error("classification provider timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The provider answered, but not with a label from the closed set.
    #[error("unrecognized label in provider answer: {answer:?}")]
    UnrecognizedLabel { answer: String },
}

impl ClassifyError {
    /// Returns `true` for failures worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClassifyError::Provider { .. } | ClassifyError::Timeout { .. }
        )
    }
}

impl From<candle_core::Error> for ClassifyError {
    fn from(err: candle_core::Error) -> Self {
        ClassifyError::Inference {
            reason: err.to_string(),
        }
    }
}

impl From<EmbeddingError> for ClassifyError {
    fn from(err: EmbeddingError) -> Self {
        ClassifyError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
