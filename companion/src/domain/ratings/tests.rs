//! Regression coverage for rating scores and aggregation.

use chrono::Utc;
use rstest::rstest;

use super::*;

fn scores(effectiveness: u8, clarity: u8, time_value: u8) -> DimensionScores {
    DimensionScores::new(effectiveness, clarity, time_value).expect("valid scores")
}

#[rstest]
#[case(5, 5, 5, 5.0)]
#[case(1, 1, 1, 1.0)]
#[case(5, 4, 3, 4.1)]
#[case(3, 5, 2, 3.3)]
#[case(4, 2, 5, 3.7)]
#[case(2, 3, 4, 2.9)]
fn overall_is_weighted_sum(
    #[case] effectiveness: u8,
    #[case] clarity: u8,
    #[case] time_value: u8,
    #[case] expected: f64,
) {
    assert_eq!(scores(effectiveness, clarity, time_value).overall(), expected);
}

#[rstest]
#[case(0)]
#[case(6)]
#[case(u8::MAX)]
fn scores_outside_range_are_rejected(#[case] value: u8) {
    assert_eq!(
        DimensionScore::new(value),
        Err(RatingValidationError::ScoreOutOfRange { value })
    );
}

#[rstest]
fn weights_sum_to_one() {
    let total = RATING_WEIGHTS.effectiveness + RATING_WEIGHTS.clarity + RATING_WEIGHTS.time_value;
    assert!((total - 1.0).abs() < f64::EPSILON);
}

#[rstest]
fn score_deserialisation_validates_range() {
    let result: Result<DimensionScore, _> = serde_json::from_str("9");
    assert!(result.is_err());
    let ok: DimensionScore = serde_json::from_str("4").expect("valid score");
    assert_eq!(ok.get(), 4);
}

#[rstest]
fn aggregating_nothing_yields_empty_stats() {
    let stats = RatingStats::aggregate(&[]);
    assert_eq!(stats, RatingStats::empty());
    assert_eq!(stats.total, 0);
    assert_eq!(stats.average_overall, 0.0);
    assert!(stats.distribution.is_empty());
    assert_eq!(stats.bucket_percentage(5), 0.0);
}

#[rstest]
fn extremes_average_to_exactly_three() {
    let stats = RatingStats::aggregate(&[scores(5, 5, 5), scores(1, 1, 1)]);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.average_overall, 3.0);
    assert_eq!(stats.average_effectiveness, 3.0);
    assert_eq!(stats.distribution.get(&5), Some(&1));
    assert_eq!(stats.distribution.get(&1), Some(&1));
    assert_eq!(stats.bucket_percentage(5), 50.0);
}

#[rstest]
fn distribution_rounds_overall_to_nearest_star() {
    // 4.1 -> 4, 3.7 -> 4, 2.9 -> 3, 3.3 -> 3
    let stats = RatingStats::aggregate(&[
        scores(5, 4, 3),
        scores(4, 2, 5),
        scores(2, 3, 4),
        scores(3, 5, 2),
    ]);
    assert_eq!(stats.distribution.get(&4), Some(&2));
    assert_eq!(stats.distribution.get(&3), Some(&2));
    assert_eq!(stats.distribution.len(), 2);
    assert_eq!(stats.average_overall, 3.5);
}

#[rstest]
fn quick_summary_handles_empty_input() {
    let summary = QuickRatingSummary::from_scores(Vec::new());
    assert_eq!(summary.count, 0);
    assert_eq!(summary.average, 0.0);
}

#[rstest]
fn quick_summary_averages_stars() {
    let stars = [4, 5, 5]
        .into_iter()
        .map(|value| DimensionScore::new(value).expect("valid"));
    let summary = QuickRatingSummary::from_scores(stars);
    assert_eq!(summary.count, 3);
    assert_eq!(summary.average, 4.67);
}

#[rstest]
fn draft_comment_is_trimmed_and_blank_dropped() {
    let prompt = PromptRef::new("ch3-structured-brief", PromptKind::Book).expect("valid prompt");
    let draft = RatingDraft {
        prompt: prompt.clone(),
        effectiveness: 4,
        clarity: 4,
        time_value: 4,
        comment: Some("   ".to_owned()),
    };
    let rating = PromptRating::from_draft(UserId::random(), draft, Utc::now()).expect("valid");
    assert!(rating.comment.is_none());
    assert_eq!(rating.overall(), 4.0);

    let long = RatingDraft {
        prompt,
        effectiveness: 4,
        clarity: 4,
        time_value: 4,
        comment: Some("x".repeat(RATING_COMMENT_MAX + 1)),
    };
    assert_eq!(
        PromptRating::from_draft(UserId::random(), long, Utc::now()),
        Err(RatingValidationError::CommentTooLong {
            max: RATING_COMMENT_MAX
        })
    );
}

#[rstest]
#[case("book", PromptKind::Book)]
#[case("library", PromptKind::Library)]
#[case("custom", PromptKind::Custom)]
fn prompt_kind_parses_wire_names(#[case] raw: &str, #[case] expected: PromptKind) {
    assert_eq!(raw.parse::<PromptKind>(), Ok(expected));
    assert_eq!(expected.to_string(), raw);
}

#[rstest]
fn blank_prompt_id_is_rejected() {
    assert_eq!(
        PromptRef::new("  ", PromptKind::Library),
        Err(RatingValidationError::EmptyPromptId)
    );
}
