use std::sync::Arc;

use crate::classify::{QuestionTypeClassifier, StageClassifier};
use crate::scoring::ContinuityScorer;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct HandlerState {
    pub scorer: Arc<ContinuityScorer>,

    pub question_types: QuestionTypeClassifier,

    pub stages: StageClassifier,
}

impl HandlerState {
    pub fn new(
        scorer: Arc<ContinuityScorer>,
        question_types: QuestionTypeClassifier,
        stages: StageClassifier,
    ) -> Self {
        Self {
            scorer,
            question_types,
            stages,
        }
    }
}
