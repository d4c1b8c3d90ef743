use std::path::PathBuf;

use crate::config::optional_path_from_env;
use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN};
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct EmbedderConfig {
    /// Model directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    /// `None` selects the deterministic stub.
    pub model_path: Option<PathBuf>,
    /// Max tokens considered per sentence.
    pub max_seq_len: usize,
    /// Output dimension of the stub; a loaded model reports its own hidden size.
    pub embedding_dim: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl EmbedderConfig {
    /// Env var used to locate the model directory.
    pub const ENV_MODEL_PATH: &'static str = "SIERRA_EMBEDDING_MODEL_PATH";

    /// Config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    /// Config for the hashed-token stub (no model files).
    pub fn stub() -> Self {
        Self::default()
    }

    /// Loads the model path from the environment (unset means stub).
    pub fn from_env() -> Self {
        Self {
            model_path: optional_path_from_env(Self::ENV_MODEL_PATH),
            ..Default::default()
        }
    }

    pub fn is_stub(&self) -> bool {
        self.model_path.is_none()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be positive".to_string(),
            });
        }

        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be positive".to_string(),
            });
        }

        if let Some(ref path) = self.model_path {
            if path.as_os_str().is_empty() {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "model_path cannot be empty when provided".to_string(),
                });
            }
            if !path.exists() {
                return Err(EmbeddingError::ModelNotFound { path: path.clone() });
            }
        }

        Ok(())
    }
}
