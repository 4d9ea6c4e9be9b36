//! Unit tests for the exercise verification classifier.

use icepulse::exercises::{classify, ExerciseType, VerificationStatus};
use icepulse::pose::{Frame, Landmark};

fn standing(score: f32) -> Frame {
    Frame::empty(0)
        .with_keypoint(Landmark::Nose, 320.0, 80.0, 0.9)
        .with_keypoint(Landmark::LeftShoulder, 290.0, 150.0, 0.9)
        .with_keypoint(Landmark::RightShoulder, 350.0, 150.0, 0.9)
        .with_keypoint(Landmark::LeftHip, 300.0, 280.0, 0.9)
        .with_keypoint(Landmark::RightHip, 340.0, 280.0, 0.9)
        .with_keypoint(Landmark::LeftKnee, 300.0, 380.0, 0.9)
        .with_keypoint(Landmark::RightKnee, 340.0, 380.0, 0.9)
        .with_score(score)
}

fn squatting(score: f32) -> Frame {
    // thighs close to horizontal
    Frame::empty(0)
        .with_keypoint(Landmark::LeftHip, 300.0, 330.0, 0.9)
        .with_keypoint(Landmark::RightHip, 340.0, 330.0, 0.9)
        .with_keypoint(Landmark::LeftKnee, 220.0, 345.0, 0.9)
        .with_keypoint(Landmark::RightKnee, 420.0, 345.0, 0.9)
        .with_score(score)
}

#[test]
fn test_all_zero_frame_is_never_verified() {
    let frame = Frame::empty(0).with_score(0.99);
    for exercise in ExerciseType::ALL {
        let result = classify(&frame, exercise);
        assert!(!result.verified, "{exercise} verified an empty frame");
        assert_eq!(result.status, VerificationStatus::NotVisible);
    }
}

#[test]
fn test_stance_rule() {
    let verified = classify(&standing(0.8), ExerciseType::GenericMobility);
    assert!(verified.verified);
    assert_eq!(verified.status, VerificationStatus::Verified);

    let weak = classify(&standing(0.4), ExerciseType::GenericMobility);
    assert!(!weak.verified);
    assert_eq!(weak.status, VerificationStatus::NotPerforming);
}

#[test]
fn test_stance_requires_knees() {
    let frame = Frame::empty(0)
        .with_keypoint(Landmark::LeftHip, 300.0, 280.0, 0.9)
        .with_score(0.9);
    let result = classify(&frame, ExerciseType::GenericMobility);
    assert_eq!(result.status, VerificationStatus::NotVisible);
}

#[test]
fn test_flexion_needs_bend_and_score() {
    assert!(classify(&squatting(0.8), ExerciseType::Squats).verified);

    // score above the base threshold is not enough for flexion
    assert!(!classify(&squatting(0.55), ExerciseType::Squats).verified);

    let upright = classify(&standing(0.9), ExerciseType::Squats);
    assert!(!upright.verified);
    assert_eq!(upright.status, VerificationStatus::NotPerforming);
    assert_eq!(upright.feedback, "Please perform the exercise");
}

#[test]
fn test_limb_visibility_rule() {
    let arms = Frame::empty(0)
        .with_keypoint(Landmark::RightWrist, 400.0, 300.0, 0.8)
        .with_score(0.7);
    assert!(classify(&arms, ExerciseType::Shooting).verified);
    assert!(classify(&arms, ExerciseType::StickHandling).verified);

    // wrist confidence must exceed 0.5
    let faint = Frame::empty(0)
        .with_keypoint(Landmark::Nose, 320.0, 80.0, 0.9)
        .with_keypoint(Landmark::RightWrist, 400.0, 300.0, 0.5)
        .with_score(0.9);
    let result = classify(&faint, ExerciseType::Shooting);
    assert!(!result.verified);
    assert_eq!(result.feedback, "Please show your arms in frame");
}

#[test]
fn test_generic_rule_uses_overall_score() {
    assert!(classify(&standing(0.51), ExerciseType::Generic).verified);
    assert!(!classify(&standing(0.5), ExerciseType::Generic).verified);
}

#[test]
fn test_unknown_tag_falls_back_to_generic() {
    let exercise = ExerciseType::from_tag_or_generic("Bulgarian Split Squats");
    assert_eq!(exercise, ExerciseType::Generic);
    assert!(classify(&standing(0.9), exercise).verified);
}

#[test]
fn test_classify_is_deterministic() {
    let frame = squatting(0.8);
    assert_eq!(
        classify(&frame, ExerciseType::Squats),
        classify(&frame, ExerciseType::Squats)
    );
}

#[test]
fn test_confidence_reflects_model_score() {
    let result = classify(&standing(0.73), ExerciseType::Generic);
    assert!((result.confidence - 0.73).abs() < 1e-6);
}
