//! Unit tests for the keypoint frame adapter.

use icepulse::pose::{adapt, FrameAdapter, Landmark, RawKeypoint, RawPose};
use icepulse::storage::config::{CoordinateSpace, FrameSettings};

fn named(name: &str, x: f32, y: f32, score: f32) -> RawKeypoint {
    RawKeypoint {
        name: Some(name.to_string()),
        x,
        y,
        score: Some(score),
    }
}

#[test]
fn test_no_detection() {
    assert!(adapt(None).is_none());
    assert!(adapt(Some(&RawPose::default())).is_none());
}

#[test]
fn test_named_keypoints_land_in_their_slots() {
    let raw = RawPose {
        timestamp_ms: 42,
        keypoints: vec![
            named("rightWrist", 400.0, 300.0, 0.8),
            named("nose", 320.0, 80.0, 0.9),
            named("tail", 0.0, 0.0, 1.0),
        ],
        score: Some(0.7),
    };

    let frame = adapt(Some(&raw)).expect("frame");
    assert_eq!(frame.timestamp_ms, 42);
    assert_eq!(frame.keypoint(Landmark::RightWrist).x, 400.0);
    assert_eq!(frame.keypoint(Landmark::Nose).confidence, 0.9);
    assert_eq!(frame.keypoint(Landmark::LeftWrist).confidence, 0.0);
    assert_eq!(frame.overall_score, 0.7);
}

#[test]
fn test_unnamed_keypoints_use_index_order() {
    let keypoints = (0..17)
        .map(|i| RawKeypoint {
            name: None,
            x: i as f32,
            y: 0.0,
            score: Some(0.6),
        })
        .collect();
    let raw = RawPose {
        timestamp_ms: 0,
        keypoints,
        score: None,
    };

    let frame = adapt(Some(&raw)).expect("frame");
    assert_eq!(frame.keypoint(Landmark::LeftHip).x, 11.0);
    // no model score: mean keypoint confidence
    assert!((frame.overall_score - 0.6).abs() < 1e-6);
}

#[test]
fn test_malformed_values_become_missing() {
    let raw = RawPose {
        timestamp_ms: 0,
        keypoints: vec![
            named("nose", f32::NAN, 80.0, 0.9),
            named("left_wrist", 100.0, 100.0, 1.7),
            RawKeypoint {
                name: Some("right_wrist".to_string()),
                x: 1.0,
                y: 1.0,
                score: None,
            },
        ],
        score: Some(f32::INFINITY),
    };

    let frame = adapt(Some(&raw)).expect("frame");
    assert_eq!(frame.keypoint(Landmark::Nose).confidence, 0.0);
    assert_eq!(frame.keypoint(Landmark::LeftWrist).confidence, 1.0);
    assert_eq!(frame.keypoint(Landmark::RightWrist).confidence, 0.0);
    assert!(frame.overall_score.is_finite());
}

#[test]
fn test_normalized_coordinates_are_scaled() {
    let adapter = FrameAdapter::new(FrameSettings {
        coordinate_space: CoordinateSpace::Normalized,
        reference_width: 640,
        reference_height: 480,
    });
    let raw = RawPose {
        timestamp_ms: 0,
        keypoints: vec![named("nose", 0.5, 0.25, 0.9)],
        score: Some(0.9),
    };

    let frame = adapter.adapt(Some(&raw)).expect("frame");
    assert_eq!(frame.keypoint(Landmark::Nose).x, 320.0);
    assert_eq!(frame.keypoint(Landmark::Nose).y, 120.0);
}

#[test]
fn test_raw_pose_json_accepts_confidence_alias() {
    let json = r#"{"timestamp_ms": 5, "keypoints": [{"name": "nose", "x": 1.0, "y": 2.0, "confidence": 0.8}]}"#;
    let raw: RawPose = serde_json::from_str(json).expect("parse");
    assert_eq!(raw.keypoints[0].score, Some(0.8));
    assert!(raw.score.is_none());
}
