//! Cross-cutting, shared constants.
//!
//! The scoring constants are the defaults for [`ScoringConfig`](crate::scoring::ScoringConfig);
//! deployments override them through `SIERRA_*` environment variables.

/// Raw cosine similarity treated as "acceptable" continuity; ratios are taken against it.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.85;

/// Below this question-to-question score the answer-to-question comparison is used instead.
pub const DEFAULT_LOW_CONTINUITY_TRIGGER: f32 = 0.2;

/// Windows scoring below this are reported as context switches.
pub const DEFAULT_CONTEXT_SWITCH_THRESHOLD: f32 = 0.3;

/// Output dimension of all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Token limit applied to every sentence before embedding.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Token limit for the BERT sequence classifiers.
pub const CLASSIFIER_MAX_SEQ_LEN: usize = 512;

/// Model used by the LLM fallback classifiers.
pub const DEFAULT_LLM_MODEL: &str = "mistral-large-latest";

/// Per-attempt timeout for fallback classifier calls.
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 10_000;

/// Extra attempts after the first failed fallback call.
pub const DEFAULT_LLM_RETRIES: u32 = 1;

/// Confidence reported for heuristic (stub) primary classifications.
pub const HEURISTIC_CONFIDENCE: f32 = 0.5;

/// Number of consecutive transcript entries in one scoring window.
pub const WINDOW_SIZE: usize = 3;

pub const SIERRA_STATUS_HEADER: &str = "X-Sierra-Status";
pub const SIERRA_STATUS_HEALTHY: &str = "healthy";
pub const SIERRA_STATUS_READY: &str = "ready";
pub const SIERRA_STATUS_ERROR: &str = "error";
pub const SIERRA_STATUS_SCORED: &str = "scored";
pub const SIERRA_STATUS_CLASSIFIED: &str = "classified";
pub const SIERRA_STATUS_DEGRADED: &str = "degraded";
