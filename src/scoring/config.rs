use std::fmt;
use std::str::FromStr;

use crate::config::{ConfigError, parse_from_env, unit_interval_from_env};
use crate::constants::{
    DEFAULT_CONTEXT_SWITCH_THRESHOLD, DEFAULT_LOW_CONTINUITY_TRIGGER, DEFAULT_SIMILARITY_THRESHOLD,
};

use super::error::ScoringError;

/// How the cosine/threshold ratio is bounded.
///
/// Earlier deployments computed `max(1, cosine / threshold)`, which reports every
/// pair under the threshold as exactly `1.0` and every pair above it as more than
/// `1.0`. [`ClampMode::Corrected`] bounds the ratio into `[0, 1]` instead, so a
/// higher cosine always means a higher score. Switching modes changes every
/// reported score, so stored results from one mode are not comparable with the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClampMode {
    /// `max(1, ratio)`, bit-for-bit with the earlier deployments.
    Literal,
    /// `clamp(ratio, 0, 1)`.
    #[default]
    Corrected,
}

impl ClampMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClampMode::Literal => "literal",
            ClampMode::Corrected => "corrected",
        }
    }
}

impl fmt::Display for ClampMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClampMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(ClampMode::Literal),
            "corrected" => Ok(ClampMode::Corrected),
            other => Err(format!(
                "unknown clamp mode '{other}' (expected 'literal' or 'corrected')"
            )),
        }
    }
}

/// Tuning for [`ContinuityScorer`](super::ContinuityScorer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Cosine similarity that maps to a score of `1.0`. Must be in `(0, 1]`.
    pub similarity_threshold: f32,
    /// Ratio bounding behavior.
    pub clamp_mode: ClampMode,
    /// Question-to-question scores below this fall back to answer-to-question.
    pub low_continuity_trigger: f32,
    /// Window scores below this are flagged as context switches.
    pub context_switch_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            clamp_mode: ClampMode::default(),
            low_continuity_trigger: DEFAULT_LOW_CONTINUITY_TRIGGER,
            context_switch_threshold: DEFAULT_CONTEXT_SWITCH_THRESHOLD,
        }
    }
}

impl ScoringConfig {
    pub const ENV_SIMILARITY_THRESHOLD: &'static str = "SIERRA_SIMILARITY_THRESHOLD";
    pub const ENV_CLAMP_MODE: &'static str = "SIERRA_CLAMP_MODE";
    pub const ENV_LOW_CONTINUITY_TRIGGER: &'static str = "SIERRA_LOW_CONTINUITY_TRIGGER";
    pub const ENV_CONTEXT_SWITCH_THRESHOLD: &'static str = "SIERRA_CONTEXT_SWITCH_THRESHOLD";

    /// Same defaults, with the earlier `max(1, ratio)` behavior.
    pub fn literal() -> Self {
        Self {
            clamp_mode: ClampMode::Literal,
            ..Default::default()
        }
    }

    pub fn with_clamp_mode(mut self, clamp_mode: ClampMode) -> Self {
        self.clamp_mode = clamp_mode;
        self
    }

    pub fn with_context_switch_threshold(mut self, threshold: f32) -> Self {
        self.context_switch_threshold = threshold;
        self
    }

    /// Loads overrides from `SIERRA_*` variables on top of defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let similarity_threshold = unit_interval_from_env(
            Self::ENV_SIMILARITY_THRESHOLD,
            defaults.similarity_threshold,
        )?;
        let clamp_mode =
            parse_from_env::<ClampMode>(Self::ENV_CLAMP_MODE)?.unwrap_or(defaults.clamp_mode);
        let low_continuity_trigger = unit_interval_from_env(
            Self::ENV_LOW_CONTINUITY_TRIGGER,
            defaults.low_continuity_trigger,
        )?;
        let context_switch_threshold = unit_interval_from_env(
            Self::ENV_CONTEXT_SWITCH_THRESHOLD,
            defaults.context_switch_threshold,
        )?;

        Ok(Self {
            similarity_threshold,
            clamp_mode,
            low_continuity_trigger,
            context_switch_threshold,
        })
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(ScoringError::InvalidConfig {
                reason: format!(
                    "similarity_threshold must be in (0.0, 1.0], got {}",
                    self.similarity_threshold
                ),
            });
        }

        for (name, value) in [
            ("low_continuity_trigger", self.low_continuity_trigger),
            ("context_switch_threshold", self.context_switch_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoringError::InvalidConfig {
                    reason: format!("{name} must be between 0.0 and 1.0, got {value}"),
                });
            }
        }

        Ok(())
    }

    /// Highest score [`similarity`](super::ContinuityScorer::similarity) can return
    /// under this configuration (reached by identical texts).
    pub fn max_score(&self) -> f32 {
        super::similarity::rescale(1.0, self.similarity_threshold, self.clamp_mode)
    }
}
