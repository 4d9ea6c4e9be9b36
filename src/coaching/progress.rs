//! Progress analytics over stored performance records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::storage::records::PerformanceRecord;

/// Number of most recent scores the trend looks at.
const TREND_WINDOW: usize = 5;
/// Percent change between halves that counts as a trend.
const TREND_CHANGE_PERCENT: f64 = 5.0;

/// Direction of recent scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Trend over the last five scores, comparing the earlier and later halves.
/// The middle score of an odd window belongs to neither half.
pub fn trend(scores: &[f32]) -> Trend {
    let recent = &scores[scores.len().saturating_sub(TREND_WINDOW)..];
    if recent.len() < 2 {
        return Trend::Stable;
    }

    let first = &recent[..recent.len() / 2];
    let second = &recent[recent.len().div_ceil(2)..];
    let (Some(first_avg), Some(second_avg)) = (mean(first), mean(second)) else {
        return Trend::Stable;
    };
    if first_avg == 0.0 {
        return if second_avg > 0.0 { Trend::Improving } else { Trend::Stable };
    }

    let change = (second_avg - first_avg) / first_avg * 100.0;
    if change > TREND_CHANGE_PERCENT {
        Trend::Improving
    } else if change < -TREND_CHANGE_PERCENT {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Consistency percentage: 100 minus the coefficient of variation, floored at 0.
pub fn consistency(scores: &[f32]) -> u32 {
    if scores.len() < 2 {
        return 100;
    }
    let Some(avg) = mean(scores) else {
        return 100;
    };
    if avg == 0.0 {
        return 0;
    }
    let variance = scores
        .iter()
        .map(|&s| (f64::from(s) - avg).powi(2))
        .sum::<f64>()
        / scores.len() as f64;
    (100.0 - variance.sqrt() / avg * 100.0).max(0.0).round() as u32
}

/// Improvement analysis for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseImprovement {
    pub exercise_id: String,
    pub title: String,
    pub total_attempts: usize,
    pub first_score: f32,
    pub latest_score: f32,
    pub score_improvement: f32,
    pub score_improvement_percent: f32,
    pub trend: Trend,
    pub consistency: u32,
    /// Percent reduction in duration from first to latest attempt
    pub duration_change_percent: f32,
}

/// Analyze the history of one exercise. Needs at least two records.
pub fn analyze_improvement(records: &[PerformanceRecord]) -> Option<ExerciseImprovement> {
    if records.len() < 2 {
        return None;
    }

    let mut sorted: Vec<&PerformanceRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.recorded_at);
    let first = sorted.first()?;
    let latest = sorted.last()?;

    let scores: Vec<f32> = sorted.iter().map(|r| r.verification_score).collect();
    let score_improvement = latest.verification_score - first.verification_score;
    let score_improvement_percent = if first.verification_score > 0.0 {
        score_improvement / first.verification_score * 100.0
    } else {
        0.0
    };
    let duration_change_percent = if first.duration_minutes > 0 && latest.duration_minutes > 0 {
        (first.duration_minutes as f32 - latest.duration_minutes as f32)
            / first.duration_minutes as f32
            * 100.0
    } else {
        0.0
    };

    Some(ExerciseImprovement {
        exercise_id: first.exercise_id.clone(),
        title: first.title.clone(),
        total_attempts: sorted.len(),
        first_score: first.verification_score,
        latest_score: latest.verification_score,
        score_improvement,
        score_improvement_percent,
        trend: trend(&scores),
        consistency: consistency(&scores),
        duration_change_percent,
    })
}

/// Summary across every exercise in a history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSummary {
    /// Mean score improvement percent, one decimal
    pub overall_improvement: f32,
    pub total_exercises: usize,
    pub improving_exercises: usize,
    pub stable_exercises: usize,
    pub declining_exercises: usize,
    pub average_consistency: u32,
    pub improvements: Vec<ExerciseImprovement>,
}

/// Group records by exercise and summarize each one with enough history.
pub fn improvement_summary(records: &[PerformanceRecord]) -> ImprovementSummary {
    let mut by_exercise: BTreeMap<&str, Vec<PerformanceRecord>> = BTreeMap::new();
    for record in records {
        by_exercise
            .entry(record.exercise_id.as_str())
            .or_default()
            .push(record.clone());
    }

    let improvements: Vec<ExerciseImprovement> = by_exercise
        .values()
        .filter_map(|history| analyze_improvement(history))
        .collect();

    let count_trend = |t: Trend| improvements.iter().filter(|i| i.trend == t).count();
    let overall_improvement = if improvements.is_empty() {
        0.0
    } else {
        let mean = improvements
            .iter()
            .map(|i| i.score_improvement_percent)
            .sum::<f32>()
            / improvements.len() as f32;
        (mean * 10.0).round() / 10.0
    };
    let average_consistency = if improvements.is_empty() {
        0
    } else {
        let total: u32 = improvements.iter().map(|i| i.consistency).sum();
        (total as f32 / improvements.len() as f32).round() as u32
    };

    ImprovementSummary {
        overall_improvement,
        total_exercises: by_exercise.len(),
        improving_exercises: count_trend(Trend::Improving),
        stable_exercises: count_trend(Trend::Stable),
        declining_exercises: count_trend(Trend::Declining),
        average_consistency,
        improvements,
    }
}

fn mean(values: &[f32]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64)
    }
}
