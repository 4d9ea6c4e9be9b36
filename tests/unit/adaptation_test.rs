//! Unit tests for adaptive targets.

use icepulse::coaching::{next_target, recommend, AdaptiveAction};

#[test]
fn test_recommendation_boundaries() {
    assert_eq!(recommend(10, 10).action, AdaptiveAction::Progress);
    assert_eq!(recommend(8, 10).action, AdaptiveAction::Maintain);
    assert_eq!(recommend(6, 10).action, AdaptiveAction::Reduce);
    assert_eq!(recommend(3, 10).action, AdaptiveAction::Modify);
}

#[test]
fn test_exact_band_edges() {
    assert_eq!(recommend(5, 10).action, AdaptiveAction::Reduce);
    assert_eq!(recommend(4, 5).action, AdaptiveAction::Maintain);
    assert_eq!(recommend(15, 10).action, AdaptiveAction::Progress);
}

#[test]
fn test_recommendation_text() {
    let rec = recommend(12, 10);
    assert_eq!(
        rec.message,
        "Great work! You completed 12 reps. Ready to increase difficulty?"
    );
    assert_eq!(rec.suggestions[0], "Increase reps by 2-3");

    let rec = recommend(8, 10);
    assert!(rec.message.starts_with("Almost there! You completed 8/10 reps."));
}

#[test]
fn test_next_target_bounds() {
    let next = next_target(10, &[10, 10, 10]);
    assert!(next >= 10 && next <= 12);
    assert_eq!(next, 12);
}

#[test]
fn test_next_target_decrease() {
    assert_eq!(next_target(10, &[5, 5]), 8);
}

#[test]
fn test_next_target_floor() {
    assert_eq!(next_target(4, &[1, 1]), 4);
    assert_eq!(next_target(3, &[0, 0, 0]), 3);
}

#[test]
fn test_next_target_increase_cap() {
    // +2 is smaller than 20% of 20
    assert_eq!(next_target(20, &[20, 21, 22]), 22);
}

#[test]
fn test_next_target_needs_enough_attempts() {
    // a strong pair is not enough evidence to raise
    assert_eq!(next_target(10, &[12, 12]), 10);
    // a single poor attempt is not enough to lower
    assert_eq!(next_target(10, &[2]), 10);
}

#[test]
fn test_next_target_in_between_maintains() {
    assert_eq!(next_target(10, &[8, 8, 9]), 10);
}
