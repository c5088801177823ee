use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mentallify::classifier::artifacts::ArtifactPaths;
use mentallify::classifier::training::{self, TrainingOptions};
use mentallify::logging;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "train_model",
    version,
    about = "Train the symptom classifier from a labelled CSV"
)]
struct Args {
    #[arg(long, help = "CSV with symptoms,disease (or text,label) columns")]
    data: PathBuf,
    #[arg(long, default_value = "info", help = "error, warn, info, debug, or trace")]
    log_level: String,
    #[arg(long, default_value = "backend")]
    artifacts_dir: PathBuf,
    #[arg(long, default_value = "reports")]
    reports_dir: PathBuf,
    #[arg(long, default_value_t = 20_000)]
    max_features: usize,
    #[arg(long, default_value_t = 300)]
    max_iter: usize,
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level)?;

    anyhow::ensure!(
        args.test_size > 0.0 && args.test_size < 1.0,
        "--test-size must be between 0 and 1, got {}",
        args.test_size
    );

    let examples = training::load_dataset(&args.data)
        .with_context(|| format!("failed to load dataset {}", args.data.display()))?;
    info!(rows = examples.len(), "dataset loaded");

    let mut options = TrainingOptions {
        test_size: args.test_size,
        seed: args.seed,
        ..TrainingOptions::default()
    };
    options.tfidf.max_features = Some(args.max_features);
    options.fit.max_iter = args.max_iter;

    let outcome = training::train(&examples, &options)?;
    println!("{}", outcome.evaluation.report());

    let paths = ArtifactPaths::in_dir(&args.artifacts_dir);
    training::write_outputs(&outcome, &examples, &paths, &args.reports_dir)
        .context("failed to write training outputs")?;

    info!(
        artifacts_dir = %args.artifacts_dir.display(),
        reports_dir = %args.reports_dir.display(),
        "training complete"
    );
    Ok(())
}
