use serde::Serialize;

use super::unit::ContinuityBranch;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Score of one turn unit.
pub struct UnitScore {
    /// Rescaled similarity.
    pub score: f32,
    /// Comparison that produced `score`.
    pub branch: ContinuityBranch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Score of one transcript window.
pub struct WindowScore {
    /// Transcript index of the window's last entry.
    pub end_index: usize,
    pub score: f32,
    pub branch: ContinuityBranch,
    /// `score` fell below the context-switch threshold.
    pub context_switch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Aggregate result for a transcript.
pub struct TranscriptAssessment {
    /// Arithmetic mean of all window scores.
    pub mean: f32,
    /// Per-window scores in transcript order.
    pub windows: Vec<WindowScore>,
}

impl TranscriptAssessment {
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Windows flagged as abrupt topic jumps.
    pub fn context_switches(&self) -> impl Iterator<Item = &WindowScore> {
        self.windows.iter().filter(|w| w.context_switch)
    }

    pub fn context_switch_count(&self) -> usize {
        self.context_switches().count()
    }
}

impl std::fmt::Display for TranscriptAssessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mean {:.4} over {} windows ({} context switches)",
            self.mean,
            self.window_count(),
            self.context_switch_count()
        )
    }
}
