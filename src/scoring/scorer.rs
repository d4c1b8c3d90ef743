use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::embedding::TextEmbedder;

use super::config::ScoringConfig;
use super::error::ScoringError;
use super::similarity::{cosine_similarity, rescale};
use super::types::{TranscriptAssessment, UnitScore, WindowScore};
use super::unit::{ContinuityBranch, TurnUnit};
use super::window::{ScoreAccumulator, check_transcript_len, turn_windows};

/// Interview-continuity scorer.
///
/// Holds only the read-only embedder and its tuning, so one instance can score
/// any number of sessions concurrently.
pub struct ContinuityScorer {
    embedder: Arc<dyn TextEmbedder>,
    config: ScoringConfig,
}

impl std::fmt::Debug for ContinuityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinuityScorer")
            .field("embedding_dim", &self.embedder.embedding_dim())
            .field("embedder_stub", &self.embedder.is_stub())
            .field("config", &self.config)
            .finish()
    }
}

impl ContinuityScorer {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        config: ScoringConfig,
    ) -> Result<Self, ScoringError> {
        config.validate()?;

        info!(
            clamp_mode = %config.clamp_mode,
            similarity_threshold = config.similarity_threshold,
            low_continuity_trigger = config.low_continuity_trigger,
            embedder_stub = embedder.is_stub(),
            "Continuity scorer ready"
        );

        Ok(Self { embedder, config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<dyn TextEmbedder> {
        &self.embedder
    }

    /// Rescaled similarity of two independently embedded texts.
    pub fn similarity(&self, text_a: &str, text_b: &str) -> Result<f32, ScoringError> {
        let a = self.embedder.embed(text_a)?;
        let b = self.embedder.embed(text_b)?;
        self.rescaled(&a, &b)
    }

    /// Scores a `(Q1, A, Q2)` or `(Q, A)` slice and returns the bare score.
    pub fn score_triple<S: AsRef<str>>(&self, turns: &[S]) -> Result<f32, ScoringError> {
        Ok(self.score_live(turns)?.score)
    }

    /// Live feedback: scores exactly one unit without a transcript scan.
    pub fn score_live<S: AsRef<str>>(&self, turns: &[S]) -> Result<UnitScore, ScoringError> {
        let unit = TurnUnit::from_slice(turns)?;
        self.score_unit(unit)
    }

    pub fn score_unit(&self, unit: TurnUnit<&str>) -> Result<UnitScore, ScoringError> {
        let embedded = match unit {
            TurnUnit::Triple {
                earlier_question,
                answer,
                later_question,
            } => self.embedder.embed_batch(&[earlier_question, answer, later_question])?,
            TurnUnit::Pair { question, answer } => self.embedder.embed_batch(&[question, answer])?,
        };

        let vectors: TurnUnit<&[f32]> = match embedded.as_slice() {
            [q1, a, q2] => TurnUnit::Triple {
                earlier_question: q1,
                answer: a,
                later_question: q2,
            },
            [q, a] => TurnUnit::Pair {
                question: q,
                answer: a,
            },
            other => {
                return Err(ScoringError::ComputationFailed {
                    reason: format!(
                        "embedder returned {} vectors for {} texts",
                        other.len(),
                        unit.arity()
                    ),
                });
            }
        };

        let scored = self.continuity(vectors)?;
        debug!(score = scored.score, branch = %scored.branch, "Scored turn unit");
        Ok(scored)
    }

    /// End-of-stage score: mean continuity across the whole transcript.
    pub fn score_transcript<S: AsRef<str>>(&self, transcript: &[S]) -> Result<f32, ScoringError> {
        Ok(self.assess_transcript(transcript)?.mean)
    }

    /// Scores every window and flags context switches.
    pub fn assess_transcript<S: AsRef<str>>(
        &self,
        transcript: &[S],
    ) -> Result<TranscriptAssessment, ScoringError> {
        check_transcript_len(transcript.len())?;

        let embeddings = self.embed_transcript(transcript)?;

        let windows = turn_windows(&embeddings)?
            .map(|window| {
                let scored = self.continuity(window.unit.map(Vec::as_slice))?;
                let context_switch = self.is_context_switch(scored.score);

                debug!(
                    window = window.end_index,
                    score = scored.score,
                    branch = %scored.branch,
                    context_switch,
                    "Scored transcript window"
                );

                Ok(WindowScore {
                    end_index: window.end_index,
                    score: scored.score,
                    branch: scored.branch,
                    context_switch,
                })
            })
            .collect::<Result<Vec<_>, ScoringError>>()?;

        let mean = windows
            .iter()
            .map(|w| w.score)
            .collect::<ScoreAccumulator>()
            .mean();

        let assessment = TranscriptAssessment { mean, windows };

        info!(
            entries = transcript.len(),
            windows = assessment.window_count(),
            context_switches = assessment.context_switch_count(),
            mean = assessment.mean,
            "Transcript assessed"
        );

        Ok(assessment)
    }

    /// `true` when `score` is low enough to count as an abrupt topic jump.
    pub fn is_context_switch(&self, score: f32) -> bool {
        score < self.config.context_switch_threshold
    }

    /// Embeds each distinct entry once; the result is aligned with `transcript`.
    fn embed_transcript<S: AsRef<str>>(
        &self,
        transcript: &[S],
    ) -> Result<Vec<Vec<f32>>, ScoringError> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut distinct: Vec<&str> = Vec::new();
        let positions: Vec<usize> = transcript
            .iter()
            .map(|entry| {
                let text = entry.as_ref();
                *slots.entry(text).or_insert_with(|| {
                    distinct.push(text);
                    distinct.len() - 1
                })
            })
            .collect();

        let vectors = self.embedder.embed_batch(&distinct)?;
        if vectors.len() != distinct.len() {
            return Err(ScoringError::ComputationFailed {
                reason: format!(
                    "embedder returned {} vectors for {} texts",
                    vectors.len(),
                    distinct.len()
                ),
            });
        }

        Ok(positions.into_iter().map(|i| vectors[i].clone()).collect())
    }

    fn continuity(&self, unit: TurnUnit<&[f32]>) -> Result<UnitScore, ScoringError> {
        match unit {
            TurnUnit::Triple {
                earlier_question,
                answer,
                later_question,
            } => {
                let primary = self.rescaled(earlier_question, later_question)?;
                if primary >= self.config.low_continuity_trigger {
                    return Ok(UnitScore {
                        score: primary,
                        branch: ContinuityBranch::QuestionToQuestion,
                    });
                }

                let grounded = self.rescaled(answer, later_question)?;
                debug!(
                    primary,
                    grounded, "Low question continuity, judged against the answer"
                );
                Ok(UnitScore {
                    score: grounded,
                    branch: ContinuityBranch::AnswerToQuestion,
                })
            }
            TurnUnit::Pair { question, answer } => Ok(UnitScore {
                score: self.rescaled(question, answer)?,
                branch: ContinuityBranch::QuestionToAnswer,
            }),
        }
    }

    fn rescaled(&self, a: &[f32], b: &[f32]) -> Result<f32, ScoringError> {
        if a.len() != b.len() {
            return Err(ScoringError::ComputationFailed {
                reason: format!("embedding lengths differ: {} vs {}", a.len(), b.len()),
            });
        }

        Ok(rescale(
            cosine_similarity(a, b),
            self.config.similarity_threshold,
            self.config.clamp_mode,
        ))
    }
}
