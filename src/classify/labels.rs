//! Closed label sets for question type and interview stage.

use std::fmt;

use serde::Serialize;

/// A fixed, closed set of classification labels.
pub trait LabelSet:
    Copy + Eq + fmt::Debug + fmt::Display + Serialize + Send + Sync + 'static
{
    /// Short name of the set, used in logs.
    const KIND: &'static str;

    /// Every label, in class-index order where a trained model exists.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Lowercase phrases that identify this label in free text.
    fn aliases(&self) -> &'static [&'static str];

    /// Label for a trained classifier's output index.
    fn from_class_index(index: usize) -> Option<Self>;

    /// Label returned when no classifier produced an answer.
    fn degraded() -> Self;

    /// Prompt asking an LLM to classify `text`.
    fn prompt(text: &str) -> String;

    /// Keyword rules standing in for a model.
    fn heuristic(text: &str) -> Self;

    /// Finds the label an LLM answered with.
    ///
    /// Matching is case- and punctuation-insensitive on whole words; when
    /// several labels appear, the one mentioned first wins.
    fn parse_llm(answer: &str) -> Option<Self> {
        let haystack = format!(" {} ", normalize_words(answer));

        Self::ALL
            .iter()
            .filter_map(|label| {
                label
                    .aliases()
                    .iter()
                    .filter_map(|alias| haystack.find(&format!(" {alias} ")))
                    .min()
                    .map(|position| (position, *label))
            })
            .min_by_key(|(position, _)| *position)
            .map(|(_, label)| label)
    }
}

/// Lowercases and turns every run of non-alphanumerics into one space.
fn normalize_words(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QuestionType {
    #[serde(rename = "Open-ended")]
    OpenEnded,
    #[serde(rename = "Directive")]
    Directive,
    #[serde(rename = "Option-Posing")]
    OptionPosing,
    #[serde(rename = "Suggestive")]
    Suggestive,
    #[serde(rename = "None of the above")]
    NoneOfTheAbove,
}

const SUGGESTIVE_CUES: [&str; 8] = [
    "didn't he",
    "didn't she",
    "didn't they",
    "isn't it",
    "wasn't it",
    "don't you",
    ", right?",
    "surely",
];

const OPEN_PROMPTS: [&str; 6] = [
    "tell me",
    "describe",
    "explain",
    "what happened",
    "walk me through",
    "what else",
];

const YES_NO_OPENERS: [&str; 14] = [
    "did", "do", "does", "is", "are", "was", "were", "can", "could", "have", "has", "had",
    "will", "would",
];

const WH_OPENERS: [&str; 7] = ["who", "what", "when", "where", "which", "how", "why"];

impl LabelSet for QuestionType {
    const KIND: &'static str = "question_type";

    const ALL: &'static [Self] = &[
        QuestionType::NoneOfTheAbove,
        QuestionType::OpenEnded,
        QuestionType::Directive,
        QuestionType::OptionPosing,
        QuestionType::Suggestive,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            QuestionType::OpenEnded => "Open-ended",
            QuestionType::Directive => "Directive",
            QuestionType::OptionPosing => "Option-Posing",
            QuestionType::Suggestive => "Suggestive",
            QuestionType::NoneOfTheAbove => "None of the above",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            QuestionType::OpenEnded => &["open ended", "openended"],
            QuestionType::Directive => &["directive"],
            QuestionType::OptionPosing => &["option posing", "optionposing", "multiple choice"],
            QuestionType::Suggestive => &["suggestive", "leading"],
            QuestionType::NoneOfTheAbove => &["none of the above", "none"],
        }
    }

    fn from_class_index(index: usize) -> Option<Self> {
        Some(match index {
            1 => QuestionType::OpenEnded,
            2 => QuestionType::Directive,
            3 => QuestionType::OptionPosing,
            4 => QuestionType::Suggestive,
            _ => QuestionType::NoneOfTheAbove,
        })
    }

    fn degraded() -> Self {
        QuestionType::NoneOfTheAbove
    }

    fn prompt(text: &str) -> String {
        format!(
            r#"Categorise the question "{text}" into one of the categories.
Open-ended (A question that encourages an open answer and cannot be answered by yes or no. Sometimes starts with who, what, when, where, or how such as in 'What happened?')
Directive (A 'Who, What, When, Where, or How' question on a specific topic; it suggests a short, specific answer.)
Option-Posing (A multiple choice question, including yes/no questions, where the answer is part of the question but is not implied.)
Suggestive (Questions with presuppositions, implied correct answers, or information that the interviewee did not reveal themselves.)
None of the above (A statement or question that does not fit into the categories.)
Respond with only the category."#
        )
    }

    fn heuristic(text: &str) -> Self {
        let lowered = text.trim().to_lowercase();
        let first_word = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .find(|w| !w.is_empty())
            .unwrap_or("");

        if SUGGESTIVE_CUES.iter().any(|cue| lowered.contains(cue)) {
            QuestionType::Suggestive
        } else if OPEN_PROMPTS.iter().any(|p| lowered.starts_with(p)) {
            QuestionType::OpenEnded
        } else if lowered.contains(" or ") || YES_NO_OPENERS.contains(&first_word) {
            QuestionType::OptionPosing
        } else if WH_OPENERS.contains(&first_word) {
            QuestionType::Directive
        } else {
            QuestionType::NoneOfTheAbove
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InterviewStage {
    Introduction,
    Investigative,
    Closing,
}

const CLOSING_CUES: [&str; 8] = [
    "anything else",
    "thank you",
    "thanks for",
    "goodbye",
    "we are done",
    "we're done",
    "before we finish",
    "questions for me",
];

const INTRODUCTION_CUES: [&str; 9] = [
    "how are you",
    "how old are you",
    "nice to meet",
    "favorite",
    "favourite",
    "what do you like",
    "about yourself",
    "tell the truth",
    "my name is",
];

impl LabelSet for InterviewStage {
    const KIND: &'static str = "stage";

    const ALL: &'static [Self] = &[
        InterviewStage::Introduction,
        InterviewStage::Investigative,
        InterviewStage::Closing,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            InterviewStage::Introduction => "Introduction",
            InterviewStage::Investigative => "Investigative",
            InterviewStage::Closing => "Closing",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            InterviewStage::Introduction => &["introduction", "intro", "rapport"],
            InterviewStage::Investigative => &["investigative", "investigation"],
            InterviewStage::Closing => &["closing", "closure"],
        }
    }

    fn from_class_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    fn degraded() -> Self {
        InterviewStage::Investigative
    }

    fn prompt(text: &str) -> String {
        format!(
            r#"You receive questions from a police interview and classify them into one of the following stages:

1. Introduction (Rapport building, asking general questions not related to the event and establishing the interview process.)
2. Investigative (Asking questions about the event that took place.)
3. Closing (Exiting the interview.)

Respond with only the stage.

Classify "{text}""#
        )
    }

    fn heuristic(text: &str) -> Self {
        let lowered = text.to_lowercase();

        if CLOSING_CUES.iter().any(|cue| lowered.contains(cue)) {
            InterviewStage::Closing
        } else if INTRODUCTION_CUES.iter().any(|cue| lowered.contains(cue)) {
            InterviewStage::Introduction
        } else {
            InterviewStage::Investigative
        }
    }
}

impl fmt::Display for InterviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
