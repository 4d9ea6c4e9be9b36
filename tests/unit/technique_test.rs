//! Unit tests for post-hoc technique analysis.

use icepulse::coaching::{analyze, analyze_buffer, compare_form, form_score};
use icepulse::exercises::ExerciseType;
use icepulse::pose::{Frame, Landmark};

/// Right-handed shooter at release: level hips and shoulders, arm extended.
fn release_frame() -> Frame {
    Frame::empty(0)
        .with_keypoint(Landmark::LeftShoulder, 280.0, 200.0, 0.9)
        .with_keypoint(Landmark::RightShoulder, 360.0, 205.0, 0.9)
        .with_keypoint(Landmark::RightElbow, 420.0, 205.0, 0.9)
        .with_keypoint(Landmark::RightWrist, 480.0, 208.0, 0.9)
        .with_keypoint(Landmark::LeftHip, 290.0, 340.0, 0.9)
        .with_keypoint(Landmark::RightHip, 350.0, 344.0, 0.9)
}

#[test]
fn test_shooting_release_scores() {
    let report = analyze(ExerciseType::Shooting, &release_frame());
    assert_eq!(report.balance.score, 90);
    // extension plus weight transfer bonus
    assert_eq!(report.technique.score, 95);
    assert_eq!(report.form.score, 80);
    assert_eq!(report.overall_score, 88);
    assert!(report.recommendations.is_empty());
}

#[test]
fn test_shooting_bent_arm_recommends_extension() {
    let frame = release_frame().with_keypoint(Landmark::RightWrist, 420.0, 265.0, 0.9);
    let report = analyze(ExerciseType::Shooting, &frame);
    assert_eq!(report.technique.score, 80);
    assert!(report
        .technique
        .feedback
        .contains(&"Work on full arm extension for more power".to_string()));
}

#[test]
fn test_uneven_shooter_gets_recommendations() {
    let frame = Frame::empty(0)
        .with_keypoint(Landmark::LeftShoulder, 280.0, 180.0, 0.9)
        .with_keypoint(Landmark::RightShoulder, 360.0, 260.0, 0.9)
        .with_keypoint(Landmark::RightElbow, 380.0, 280.0, 0.9)
        .with_keypoint(Landmark::RightWrist, 330.0, 300.0, 0.9)
        .with_keypoint(Landmark::LeftHip, 290.0, 320.0, 0.9)
        .with_keypoint(Landmark::RightHip, 350.0, 350.0, 0.9);
    let report = analyze(ExerciseType::Shooting, &frame);
    assert!(report.overall_score < 75);
    assert!(report
        .recommendations
        .contains(&"Focus on balance drills to improve stability".to_string()));
    assert!(report
        .recommendations
        .contains(&"Work on full arm extension for maximum shot power".to_string()));
}

#[test]
fn test_stick_handling_hand_spacing() {
    let frame = Frame::empty(0)
        .with_keypoint(Landmark::LeftWrist, 300.0, 300.0, 0.9)
        .with_keypoint(Landmark::RightWrist, 345.0, 300.0, 0.9)
        .with_keypoint(Landmark::LeftShoulder, 290.0, 150.0, 0.9)
        .with_keypoint(Landmark::RightShoulder, 350.0, 152.0, 0.9)
        .with_keypoint(Landmark::LeftHip, 300.0, 280.0, 0.9)
        .with_keypoint(Landmark::RightHip, 340.0, 281.0, 0.9);
    let report = analyze(ExerciseType::StickHandling, &frame);
    assert_eq!(report.balance.score, 85);
    assert_eq!(report.technique.score, 80);
    assert_eq!(report.form.score, 75);
    assert_eq!(report.overall_score, 80);

    let wide = frame.with_keypoint(Landmark::RightWrist, 400.0, 300.0, 0.9);
    let report = analyze(ExerciseType::StickHandling, &wide);
    assert_eq!(report.technique.score, 70);
    assert!(!report.recommendations.is_empty());
}

#[test]
fn test_strength_knee_tracking() {
    let frame = Frame::empty(0)
        .with_keypoint(Landmark::LeftHip, 300.0, 330.0, 0.9)
        .with_keypoint(Landmark::RightHip, 340.0, 330.0, 0.9)
        .with_keypoint(Landmark::LeftKnee, 340.0, 400.0, 0.9)
        .with_keypoint(Landmark::LeftAnkle, 300.0, 480.0, 0.9);
    let report = analyze(ExerciseType::Squats, &frame);
    assert_eq!(report.form.score, 65);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("knees tracking over toes")));
}

#[test]
fn test_generic_profile() {
    let frame = Frame::empty(0)
        .with_keypoint(Landmark::LeftHip, 300.0, 330.0, 0.9)
        .with_keypoint(Landmark::RightHip, 340.0, 332.0, 0.9);
    let report = analyze(ExerciseType::GenericMobility, &frame);
    assert_eq!(report.overall_score, 77);
    assert!(report.recommendations.is_empty());
}

#[test]
fn test_analyze_is_deterministic() {
    let frame = release_frame();
    assert_eq!(
        analyze(ExerciseType::Shooting, &frame),
        analyze(ExerciseType::Shooting, &frame)
    );
}

#[test]
fn test_analyze_buffer_picks_best_frame() {
    let poor = Frame::empty(0);
    let good = release_frame();
    let report = analyze_buffer(ExerciseType::Shooting, &[poor, good]).expect("report");
    assert_eq!(report.overall_score, 88);

    assert!(analyze_buffer(ExerciseType::Shooting, &[]).is_none());
}

#[test]
fn test_form_score() {
    let frame = Frame::empty(0)
        .with_keypoint(Landmark::Nose, 0.0, 0.0, 0.9)
        .with_keypoint(Landmark::LeftHip, 0.0, 0.0, 0.7)
        .with_keypoint(Landmark::RightHip, 0.0, 0.0, 0.4);
    assert!((form_score(&frame) - 80.0).abs() < 1e-3);
    assert_eq!(form_score(&Frame::empty(0)), 0.0);
}

#[test]
fn test_compare_form_notes_improvements() {
    let previous = Frame::empty(0)
        .with_keypoint(Landmark::LeftHip, 300.0, 300.0, 0.9)
        .with_keypoint(Landmark::LeftKnee, 300.0, 400.0, 0.9)
        .with_keypoint(Landmark::LeftAnkle, 300.0, 500.0, 0.9)
        .with_keypoint(Landmark::LeftShoulder, 280.0, 180.0, 0.9)
        .with_keypoint(Landmark::RightShoulder, 360.0, 200.0, 0.9);
    let current = Frame::empty(1)
        .with_keypoint(Landmark::LeftHip, 220.0, 390.0, 0.9)
        .with_keypoint(Landmark::LeftKnee, 300.0, 400.0, 0.9)
        .with_keypoint(Landmark::LeftAnkle, 300.0, 500.0, 0.9)
        .with_keypoint(Landmark::LeftShoulder, 280.0, 200.0, 0.9)
        .with_keypoint(Landmark::RightShoulder, 360.0, 203.0, 0.9);

    let comparison = compare_form(&current, &previous);
    assert_eq!(
        comparison.improvements,
        vec![
            "Deeper knee bend - better range of motion".to_string(),
            "Better shoulder alignment".to_string(),
        ]
    );
    assert!(comparison.issues.is_empty());
    assert!((comparison.overall_form_score - 90.0).abs() < 1e-3);
}
