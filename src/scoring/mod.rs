//! Interview-continuity scoring.
//!
//! A transcript is the flattened `Q, A, Q, A, ...` history of one interview.
//! [`ContinuityScorer`] embeds entries through a [`TextEmbedder`](crate::embedding::TextEmbedder)
//! and scores them in units:
//!
//! - `(Q1, A, Q2)`: similarity of `Q1` and `Q2`; when that falls below the
//!   low-continuity trigger, similarity of `A` and `Q2` instead.
//! - `(Q, A)`: similarity of the two, only for two-entry transcripts.
//!
//! Similarities are cosine similarities divided by the similarity threshold and
//! bounded per [`ClampMode`].
//!
//! Transcript scoring slides the unit over every window (see [`window`]) and
//! averages. [`ContinuityScorer::score_live`] scores a single unit for per-turn
//! feedback. Scaling to a 0-10 grade happens at the HTTP boundary.

pub mod config;
pub mod error;
pub mod scorer;
pub mod similarity;
pub mod types;
pub mod unit;
pub mod window;


pub use config::{ClampMode, ScoringConfig};
pub use error::ScoringError;
pub use scorer::ContinuityScorer;
pub use similarity::{cosine_similarity, rescale};
pub use types::{TranscriptAssessment, UnitScore, WindowScore};
pub use unit::{ContinuityBranch, TurnUnit};
pub use window::{ScoreAccumulator, TurnWindows, Window, turn_windows};
