//! Window production and reduction, kept apart so each can be tested alone.
//!
//! [`TurnWindows`] slides a size-3 window with stride 1 over a transcript,
//! ending at every index from 2 through the last entry inclusive (a length-6
//! transcript yields 4 windows). A two-entry transcript yields one
//! [`TurnUnit::Pair`]. [`ScoreAccumulator`] is a plain sum/count, so windows may
//! be reduced in any order.

use super::error::ScoringError;
use super::unit::TurnUnit;
use crate::constants::WINDOW_SIZE;

/// A unit plus the transcript index of its last entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window<T> {
    pub end_index: usize,
    pub unit: TurnUnit<T>,
}

/// Restartable (via `Clone`), finite iterator over the scoring windows of a transcript.
#[derive(Debug, Clone)]
pub struct TurnWindows<'a, T> {
    items: &'a [T],
    next_end: usize,
}

/// Windows over `items`; fails when fewer than two entries are present.
pub fn turn_windows<T>(items: &[T]) -> Result<TurnWindows<'_, T>, ScoringError> {
    check_transcript_len(items.len())?;

    Ok(TurnWindows {
        items,
        next_end: items.len().min(WINDOW_SIZE) - 1,
    })
}

/// A transcript needs two entries for a pair, three for the sliding path.
pub fn check_transcript_len(len: usize) -> Result<(), ScoringError> {
    if len < 2 {
        return Err(ScoringError::InvalidInput {
            reason: format!("a transcript must hold at least 2 entries, got {len}"),
        });
    }
    Ok(())
}

impl<'a, T> Iterator for TurnWindows<'a, T> {
    type Item = Window<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.next_end;
        if end >= self.items.len() {
            return None;
        }
        self.next_end += 1;

        let unit = if self.items.len() < WINDOW_SIZE {
            TurnUnit::Pair {
                question: &self.items[end - 1],
                answer: &self.items[end],
            }
        } else {
            TurnUnit::Triple {
                earlier_question: &self.items[end - 2],
                answer: &self.items[end - 1],
                later_question: &self.items[end],
            }
        };

        Some(Window {
            end_index: end,
            unit,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len().saturating_sub(self.next_end);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for TurnWindows<'_, T> {}

/// Running sum/count of window scores.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAccumulator {
    sum: f64,
    count: usize,
}

impl ScoreAccumulator {
    pub fn push(&mut self, score: f32) {
        self.sum += f64::from(score);
        self.count += 1;
    }

    pub fn merge(mut self, other: ScoreAccumulator) -> Self {
        self.sum += other.sum;
        self.count += other.count;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, or `0.0` when nothing was pushed.
    pub fn mean(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum / self.count as f64) as f32
    }
}

impl Extend<f32> for ScoreAccumulator {
    fn extend<I: IntoIterator<Item = f32>>(&mut self, iter: I) {
        for score in iter {
            self.push(score);
        }
    }
}

impl FromIterator<f32> for ScoreAccumulator {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        let mut acc = ScoreAccumulator::default();
        acc.extend(iter);
        acc
    }
}
