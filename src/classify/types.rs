use serde::Serialize;

use super::labels::LabelSet;

/// Output of a primary (trained) classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction<L> {
    pub label: L,
    /// Probability of `label`, in `[0, 1]`.
    pub confidence: f32,
}

/// Which tier produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Primary,
    Fallback,
    /// Neither tier answered; the label is a sentinel.
    Degraded,
}

impl ClassificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationSource::Primary => "primary",
            ClassificationSource::Fallback => "fallback",
            ClassificationSource::Degraded => "degraded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult<L> {
    pub label: L,
    /// `None` when the fallback model answered (it exposes no calibrated confidence).
    pub confidence: Option<f32>,
    pub source: ClassificationSource,
}

impl<L: LabelSet> ClassificationResult<L> {
    pub fn primary(prediction: Prediction<L>) -> Self {
        Self {
            label: prediction.label,
            confidence: Some(prediction.confidence),
            source: ClassificationSource::Primary,
        }
    }

    pub fn fallback(label: L) -> Self {
        Self {
            label,
            confidence: None,
            source: ClassificationSource::Fallback,
        }
    }

    /// Sentinel result with zero confidence.
    pub fn degraded() -> Self {
        Self {
            label: L::degraded(),
            confidence: Some(0.0),
            source: ClassificationSource::Degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.source == ClassificationSource::Degraded
    }
}
