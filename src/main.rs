//! IcePulse replay tool
//!
//! Replays a recorded pose stream through an exercise session and prints the
//! session result, recommendation, next target and technique report as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use icepulse::coaching::{analyze_buffer, form_score, next_target, recommend};
use icepulse::exercises::{ExerciseDefinition, ExerciseType};
use icepulse::pose::{FrameAdapter, ReplaySource};
use icepulse::session::{run_exercise, DriveOutcome, SessionHandle};
use icepulse::storage::config::{load_config, load_config_from};
use icepulse::storage::records::PerformanceRecord;

#[derive(Parser, Debug)]
#[command(name = "icepulse")]
#[command(about = "Replay a recorded pose stream through an exercise session")]
#[command(version)]
struct Args {
    /// Exercise type tag (push_ups, squats, pull_ups, shooting, stick_handling, ...)
    #[arg(short, long)]
    exercise: String,

    /// Target repetitions per set
    #[arg(long, default_value_t = 10)]
    target_reps: u32,

    /// Target number of sets
    #[arg(long, default_value_t = 3)]
    target_sets: u32,

    /// Drill timer in seconds, for timed drills without a rep target
    #[arg(long)]
    timer: Option<u32>,

    /// JSON-lines pose recording
    #[arg(short, long)]
    input: PathBuf,

    /// Rep counts of recent attempts, oldest first
    #[arg(long, value_delimiter = ',')]
    history: Vec<u32>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting IcePulse v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    let exercise_type = ExerciseType::from_tag_or_generic(&args.exercise);
    let mut definition = ExerciseDefinition::new(
        format!("replay-{}", exercise_type.tag()),
        exercise_type.to_string(),
        exercise_type,
        args.target_reps,
        args.target_sets,
    );
    if let Some(seconds) = args.timer {
        definition = definition.with_timer(seconds);
    }

    let source = ReplaySource::open(&args.input)
        .with_context(|| format!("Failed to read recording {}", args.input.display()))?;

    let adapter = FrameAdapter::new(config.frame);
    let frames: Vec<_> = source.iter().filter_map(|raw| adapter.adapt(raw)).collect();

    let (handle, control) = SessionHandle::new();
    let outcome = run_exercise(source, definition.clone(), &config, control, None)
        .await
        .context("Failed to start exercise session")?;
    drop(handle);

    let result = match outcome {
        DriveOutcome::Completed(result) => result,
        DriveOutcome::Cancelled => anyhow::bail!("Session was cancelled"),
    };

    let mut attempts = args.history.clone();
    attempts.push(result.total_reps);

    let recommendation = recommend(result.total_reps, definition.target_reps);
    let next = next_target(definition.target_reps, &attempts);
    let technique = analyze_buffer(exercise_type, &frames);

    let mut record = PerformanceRecord::from_session(&definition, &result);
    if let Some(best) = frames.iter().max_by(|a, b| form_score(a).total_cmp(&form_score(b))) {
        record = record.with_form_score(form_score(best));
    }

    let report = serde_json::json!({
        "result": result,
        "celebrate": result.should_celebrate(),
        "recommendation": recommendation,
        "next_target": next,
        "technique": technique,
        "record": record,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
