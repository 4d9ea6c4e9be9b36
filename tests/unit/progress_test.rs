//! Unit tests for progress analytics.

use chrono::{Duration, TimeZone, Utc};

use icepulse::coaching::{analyze_improvement, improvement_summary, Trend};
use icepulse::exercises::{ExerciseDefinition, ExerciseType};
use icepulse::session::SessionResult;
use icepulse::storage::records::PerformanceRecord;

fn record(exercise_id: &str, day: i64, score: f32, minutes: u32) -> PerformanceRecord {
    let definition = ExerciseDefinition::new(exercise_id, "Drill", ExerciseType::PushUps, 10, 3);
    let result = SessionResult {
        exercise_id: exercise_id.to_string(),
        total_reps: 10,
        target_reps: 10,
        total_sets: 3,
        completed_sets: 1,
        average_confidence: score,
        verified: score >= 0.6,
        duration_ms: u64::from(minutes) * 60_000,
    };
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
    PerformanceRecord::from_session(&definition, &result)
        .recorded_at(start + Duration::days(day))
}

#[test]
fn test_needs_two_records() {
    assert!(analyze_improvement(&[record("a", 0, 0.7, 5)]).is_none());
}

#[test]
fn test_improvement_is_sorted_by_date() {
    // supplied out of order
    let history = vec![
        record("a", 3, 0.9, 4),
        record("a", 0, 0.6, 5),
        record("a", 1, 0.65, 5),
        record("a", 2, 0.8, 4),
    ];
    let improvement = analyze_improvement(&history).expect("improvement");

    assert_eq!(improvement.total_attempts, 4);
    assert!((improvement.first_score - 0.6).abs() < 1e-6);
    assert!((improvement.latest_score - 0.9).abs() < 1e-6);
    assert!((improvement.score_improvement_percent - 50.0).abs() < 1e-3);
    assert_eq!(improvement.trend, Trend::Improving);
    assert!((improvement.duration_change_percent - 20.0).abs() < 1e-3);
}

#[test]
fn test_summary_across_exercises() {
    let history = vec![
        record("a", 0, 0.6, 5),
        record("a", 1, 0.9, 5),
        record("b", 0, 0.8, 5),
        record("b", 1, 0.6, 5),
        record("c", 0, 0.7, 5),
    ];
    let summary = improvement_summary(&history);

    assert_eq!(summary.total_exercises, 3);
    assert_eq!(summary.improvements.len(), 2);
    assert_eq!(summary.improving_exercises, 1);
    assert_eq!(summary.declining_exercises, 1);
    // (+50% and -25%) / 2
    assert!((summary.overall_improvement - 12.5).abs() < 1e-3);
}
