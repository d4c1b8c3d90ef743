//! Scoring scenarios through the public API with the hashed-token embedder.

mod common;

use sierra::scoring::{ClampMode, ContinuityBranch, ScoringConfig};

use common::stub_scorer;

const NAME_AGE: [&str; 3] = ["What is your name?", "My name is John.", "What is your age?"];

#[test]
fn test_name_age_transcript_is_bounded_and_deterministic() {
    let scorer = stub_scorer(ScoringConfig::default());

    let first = scorer.score_transcript(&NAME_AGE).unwrap();
    let second = scorer.score_transcript(&NAME_AGE).unwrap();

    assert_eq!(first, second);
    assert!((0.0..=1.0).contains(&first));
    assert_eq!(scorer.assess_transcript(&NAME_AGE).unwrap().window_count(), 1);
}

#[test]
fn test_live_and_stage_agree_on_single_window() {
    let scorer = stub_scorer(ScoringConfig::default());

    let live = scorer.score_live(&NAME_AGE).unwrap();
    let stage = scorer.assess_transcript(&NAME_AGE).unwrap();

    assert_eq!(live.score, stage.mean);
    assert_eq!(live.branch, stage.windows[0].branch);
}

#[test]
fn test_identical_questions_use_primary_branch_in_both_modes() {
    let transcript = ["What is your name?"; 3];

    for mode in [ClampMode::Corrected, ClampMode::Literal] {
        let scorer = stub_scorer(ScoringConfig::default().with_clamp_mode(mode));
        let scored = scorer.score_live(&transcript).unwrap();

        assert_eq!(scored.branch, ContinuityBranch::QuestionToQuestion);
        assert!((scored.score - scorer.config().max_score()).abs() < 1e-5);
    }
}

#[test]
fn test_unrelated_question_is_flagged() {
    let scorer = stub_scorer(ScoringConfig::default());
    let transcript = [
        "Where did you go after school?",
        "I went to the park.",
        "Toyota Corrolla?",
    ];

    let assessment = scorer.assess_transcript(&transcript).unwrap();

    assert_eq!(assessment.windows[0].branch, ContinuityBranch::AnswerToQuestion);
    assert!(assessment.windows[0].context_switch);
    assert_eq!(assessment.context_switch_count(), 1);
}

#[test]
fn test_short_transcripts() {
    let scorer = stub_scorer(ScoringConfig::default());
    let empty: [&str; 0] = [];

    assert!(scorer.score_transcript(&empty).unwrap_err().is_invalid_input());
    assert!(scorer.score_transcript(&["Hello?"]).unwrap_err().is_invalid_input());

    let pair = ["Where do you live?", "I live in Oslo."];
    assert_eq!(
        scorer.score_transcript(&pair).unwrap(),
        scorer.score_triple(&pair).unwrap()
    );
}
