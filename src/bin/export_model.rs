use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mentallify::classifier::artifacts::{self, ArtifactPaths};
use mentallify::logging;

#[derive(Parser, Debug)]
#[command(
    name = "export_model",
    version,
    about = "Export trained artifacts as web_model.json and vocab.json"
)]
struct Args {
    #[arg(long, default_value = "backend")]
    artifacts_dir: PathBuf,
    #[arg(long, default_value = "info", help = "error, warn, info, debug, or trace")]
    log_level: String,
    #[arg(long, default_value = "models")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level)?;

    let paths = ArtifactPaths::in_dir(&args.artifacts_dir);
    let web_model = artifacts::export_web_model(&paths, &args.out_dir).with_context(|| {
        format!(
            "failed to export artifacts from {}",
            args.artifacts_dir.display()
        )
    })?;

    println!(
        "Wrote {} classes and {} terms to {}",
        web_model.classes.len(),
        web_model.vocab.len(),
        args.out_dir.display()
    );
    Ok(())
}
