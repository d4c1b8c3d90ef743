//! Sierra library crate (used by the server and integration tests).
//!
//! Feedback for investigative-interview training:
//!
//! - [`ContinuityScorer`] scores how well each interviewer question follows from
//!   the conversation so far, live (one turn unit) or for a whole stage
//!   (sliding-window mean with context-switch flags).
//! - [`ClassificationOrchestrator`] labels questions by type and interview stage,
//!   with a trained classifier first and an LLM fallback.
//! - [`gateway`] exposes both over HTTP.
//!
//! Model-free stand-ins (hashed-token embedder, keyword classifiers, mock LLM)
//! let the whole pipeline run without weights or network access.

pub mod classify;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod scoring;

pub use classify::{
    ClassificationOrchestrator, ClassificationResult, ClassificationSource, ClassifyError,
    EscalationPolicy, InterviewStage, LabelSet, QuestionType, QuestionTypeClassifier,
    StageClassifier,
};
pub use config::{Config, ConfigError};
pub use embedding::{EmbedderConfig, EmbeddingError, SentenceEmbedder, TextEmbedder};
pub use gateway::{HandlerState, create_router_with_state};
pub use scoring::{
    ClampMode, ContinuityBranch, ContinuityScorer, ScoringConfig, ScoringError,
    TranscriptAssessment, UnitScore, WindowScore,
};
