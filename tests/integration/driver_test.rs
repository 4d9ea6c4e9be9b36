//! Integration tests for the detector lifecycle and the async session driver.

use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver};
use icepulse::exercises::{ExerciseDefinition, ExerciseType};
use icepulse::pose::{
    DetectorState, FrameAdapter, FrameOutcome, PoseDetector, PoseError, ReplaySource,
};
use icepulse::session::{run_exercise, DriveOutcome, LiveUpdate, SessionHandle, VerificationMode};
use icepulse::storage::config::{DetectorSettings, EngineConfig};

use super::pose_source_mock::{push_up_pose, InitBehavior, ScriptedSource, Step};

fn fast_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.detector = DetectorSettings {
        fallback_window_ms: 20,
        acquire_timeout_ms: 2_000,
        max_consecutive_failures: 3,
        basic_tick_ms: 5,
    };
    config
}

fn push_ups() -> ExerciseDefinition {
    ExerciseDefinition::new("pushups-1", "Push-Ups", ExerciseType::PushUps, 10, 3)
}

fn never() -> std::future::Pending<()> {
    std::future::pending()
}

/// Wait until `count` live updates in basic mode have been published.
async fn wait_for_basic(rx: &Receiver<LiveUpdate>, count: usize) {
    let mut seen = 0;
    while seen < count {
        match rx.try_recv() {
            Ok(update) if update.mode == VerificationMode::Basic => seen += 1,
            Ok(_) => {}
            Err(_) => tokio::time::sleep(Duration::from_millis(2)).await,
        }
    }
}

#[tokio::test]
async fn test_detector_lifecycle() {
    let source = ScriptedSource::new(
        InitBehavior::Ready,
        vec![Step::Pose(push_up_pose(0, 40.0)), Step::Nobody, Step::Error],
    );
    let mut detector = PoseDetector::new(source, FrameAdapter::default(), fast_config().detector);
    assert_eq!(detector.state(), &DetectorState::Uninitialized);
    assert!(matches!(detector.next_frame().await, FrameOutcome::Failed(_)));

    detector.acquire(never()).await.expect("acquired");
    assert!(detector.is_ready());

    assert!(matches!(detector.next_frame().await, FrameOutcome::Pose(_)));
    assert_eq!(detector.next_frame().await, FrameOutcome::NoDetection);
    assert!(matches!(detector.next_frame().await, FrameOutcome::Failed(_)));
    assert_eq!(detector.next_frame().await, FrameOutcome::Ended);
}

#[tokio::test]
async fn test_detector_failure() {
    let source = ScriptedSource::new(InitBehavior::Fail, vec![]);
    let mut detector = PoseDetector::new(source, FrameAdapter::default(), fast_config().detector);

    let err = detector.acquire(never()).await.unwrap_err();
    assert!(matches!(err, PoseError::ModelUnavailable(_)));
    assert!(matches!(detector.state(), DetectorState::Failed(_)));
}

#[tokio::test]
async fn test_detector_acquire_timeout() {
    let mut settings = fast_config().detector;
    settings.acquire_timeout_ms = 20;
    let source = ScriptedSource::new(InitBehavior::Hang, vec![]);
    let mut detector = PoseDetector::new(source, FrameAdapter::default(), settings);

    let err = detector.acquire(never()).await.unwrap_err();
    assert!(matches!(err, PoseError::ModelUnavailable(_)));
}

#[tokio::test]
async fn test_detector_acquire_cancel() {
    let source = ScriptedSource::new(InitBehavior::Hang, vec![]);
    let mut detector = PoseDetector::new(source, FrameAdapter::default(), fast_config().detector);

    let cancel = tokio::time::sleep(Duration::from_millis(10));
    let err = detector.acquire(cancel).await.unwrap_err();
    assert!(matches!(err, PoseError::Cancelled));
    assert_eq!(detector.state(), &DetectorState::Uninitialized);
}

#[tokio::test]
async fn test_detector_fallback_window() {
    let source = ScriptedSource::new(InitBehavior::Ready, vec![Step::Stall]);
    let mut detector = PoseDetector::new(source, FrameAdapter::default(), fast_config().detector);
    detector.acquire(never()).await.expect("acquired");

    assert_eq!(detector.next_frame().await, FrameOutcome::TimedOut);
}

#[tokio::test]
async fn test_replay_session_to_completion() {
    let poses = vec![
        Some(push_up_pose(0, 150.0)),
        Some(push_up_pose(33, 40.0)),
        Some(push_up_pose(66, 120.0)),
        None,
        Some(push_up_pose(132, 40.0)),
        Some(push_up_pose(165, 130.0)),
    ];
    let (_handle, control) = SessionHandle::new();
    let (tx, rx) = unbounded();

    let outcome = run_exercise(
        ReplaySource::from_poses(poses),
        push_ups(),
        &fast_config(),
        control,
        Some(tx),
    )
    .await
    .expect("session");

    let DriveOutcome::Completed(result) = outcome else {
        panic!("session was cancelled");
    };
    assert_eq!(result.total_reps, 2);
    assert!((result.average_confidence - 0.8).abs() < 1e-6);
    assert!(result.verified);

    let updates: Vec<LiveUpdate> = rx.try_iter().collect();
    assert_eq!(updates.len(), 6);
    assert!(updates.windows(2).all(|w| w[1].total_reps >= w[0].total_reps));
    assert!(updates.iter().all(|u| u.mode == VerificationMode::Pose));
}

#[tokio::test]
async fn test_replay_file_round_trip() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    for (t, gap) in [(0, 40.0), (33, 120.0)] {
        writeln!(file, "{}", serde_json::to_string(&push_up_pose(t, gap)).unwrap()).unwrap();
    }
    writeln!(file, "null").unwrap();

    let source = ReplaySource::open(file.path()).expect("replay");
    assert_eq!(source.len(), 3);

    let (_handle, control) = SessionHandle::new();
    let outcome = run_exercise(source, push_ups(), &fast_config(), control, None)
        .await
        .expect("session");
    assert!(matches!(outcome, DriveOutcome::Completed(r) if r.total_reps == 1));
}

#[tokio::test]
async fn test_model_unavailable_runs_basic_mode() {
    let source = ScriptedSource::new(InitBehavior::Fail, vec![]);
    let (handle, control) = SessionHandle::new();
    let (tx, rx) = unbounded();
    let config = fast_config();

    let driver = run_exercise(source, push_ups(), &config, control, Some(tx));
    let controller = async {
        wait_for_basic(&rx, 3).await;
        handle.finish();
    };

    let (outcome, ()) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(driver, controller)
    })
    .await
    .expect("driver finished");

    let DriveOutcome::Completed(result) = outcome.expect("session") else {
        panic!("session was cancelled");
    };
    assert_eq!(result.total_reps, 0);
    assert!((result.average_confidence - 0.8).abs() < 1e-6);
    assert!(result.verified);
}

#[tokio::test]
async fn test_repeated_timeouts_degrade_to_basic_mode() {
    let source = ScriptedSource::new(InitBehavior::Ready, vec![Step::Stall; 5]);
    let (handle, control) = SessionHandle::new();
    let (tx, rx) = unbounded();
    let config = fast_config();

    let driver = run_exercise(source, push_ups(), &config, control, Some(tx));
    let controller = async {
        wait_for_basic(&rx, 1).await;
        handle.finish();
    };

    let (outcome, ()) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(driver, controller)
    })
    .await
    .expect("driver finished");

    assert!(matches!(outcome.expect("session"), DriveOutcome::Completed(_)));
}

#[tokio::test]
async fn test_cancel_during_acquisition() {
    let source = ScriptedSource::new(InitBehavior::Hang, vec![]);
    let (handle, control) = SessionHandle::new();
    let config = fast_config();

    let driver = run_exercise(source, push_ups(), &config, control, None);
    let controller = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();
    };

    let (outcome, ()) = tokio::join!(driver, controller);
    assert_eq!(outcome.expect("session"), DriveOutcome::Cancelled);
}

#[tokio::test]
async fn test_cancel_while_running_emits_nothing() {
    let source = ScriptedSource::new(
        InitBehavior::Ready,
        vec![Step::Pose(push_up_pose(0, 40.0)), Step::Stall],
    );
    let (handle, control) = SessionHandle::new();
    let mut config = fast_config();
    config.detector.fallback_window_ms = 1_000;

    let driver = run_exercise(source, push_ups(), &config, control, None);
    let controller = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    };

    let (outcome, ()) = tokio::join!(driver, controller);
    assert_eq!(outcome.expect("session"), DriveOutcome::Cancelled);
}
