use serde::Serialize;

use super::error::ScoringError;

/// One scoring unit taken from a transcript.
///
/// `T` is whatever represents an entry: text while validating requests, embedding
/// slices while scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnUnit<T> {
    /// `(Q1, A, Q2)`: does the later question follow from the earlier one (or the answer)?
    Triple {
        earlier_question: T,
        answer: T,
        later_question: T,
    },
    /// `(Q, A)`: only used when the whole transcript has two entries.
    Pair { question: T, answer: T },
}

impl<T> TurnUnit<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> TurnUnit<U> {
        match self {
            TurnUnit::Triple {
                earlier_question,
                answer,
                later_question,
            } => TurnUnit::Triple {
                earlier_question: f(earlier_question),
                answer: f(answer),
                later_question: f(later_question),
            },
            TurnUnit::Pair { question, answer } => TurnUnit::Pair {
                question: f(question),
                answer: f(answer),
            },
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            TurnUnit::Triple { .. } => 3,
            TurnUnit::Pair { .. } => 2,
        }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, TurnUnit::Pair { .. })
    }
}

impl<'a> TurnUnit<&'a str> {
    /// Builds a unit from exactly 2 or 3 entries.
    pub fn from_slice<S: AsRef<str>>(turns: &'a [S]) -> Result<Self, ScoringError> {
        match turns {
            [q1, a, q2] => Ok(TurnUnit::Triple {
                earlier_question: q1.as_ref(),
                answer: a.as_ref(),
                later_question: q2.as_ref(),
            }),
            [q, a] => Ok(TurnUnit::Pair {
                question: q.as_ref(),
                answer: a.as_ref(),
            }),
            other => Err(ScoringError::InvalidInput {
                reason: format!(
                    "a turn unit must hold 2 or 3 entries, got {}",
                    other.len()
                ),
            }),
        }
    }
}

/// Which comparison produced a unit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuityBranch {
    /// Earlier question vs later question.
    QuestionToQuestion,
    /// Answer vs later question, after the question-to-question score was too low.
    AnswerToQuestion,
    /// Question vs answer for a two-entry transcript.
    QuestionToAnswer,
}

impl ContinuityBranch {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContinuityBranch::QuestionToQuestion => "question_to_question",
            ContinuityBranch::AnswerToQuestion => "answer_to_question",
            ContinuityBranch::QuestionToAnswer => "question_to_answer",
        }
    }
}

impl std::fmt::Display for ContinuityBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
