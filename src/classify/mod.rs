//! Question-type and interview-stage classification.
//!
//! Each label set is served by a [`ClassificationOrchestrator`]: a local
//! [`PrimaryClassifier`] answers with a confidence, and a [`FallbackClassifier`]
//! (an LLM via `genai`) is consulted when the caller asks for it, when the
//! primary fails, or when its confidence is under the [`EscalationPolicy`]
//! threshold. Fallback calls are bounded by a timeout and retried; when
//! everything fails the orchestrator returns a degraded sentinel instead of
//! an error.

pub mod error;
pub mod fallback;
pub mod labels;
pub mod orchestrator;
pub mod primary;
pub mod types;


pub use error::ClassifyError;
pub use fallback::{FallbackClassifier, LlmClassifier};
pub use labels::{InterviewStage, LabelSet, QuestionType};
pub use orchestrator::{ClassificationOrchestrator, EscalationPolicy};
pub use primary::{BertLabelClassifier, HeuristicClassifier, PrimaryClassifier, load_primary};
pub use types::{ClassificationResult, ClassificationSource, Prediction};

/// Question-type orchestrator.
pub type QuestionTypeClassifier = ClassificationOrchestrator<QuestionType>;

/// Interview-stage orchestrator.
pub type StageClassifier = ClassificationOrchestrator<InterviewStage>;
