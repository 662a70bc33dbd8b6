//! Download the raw listings sample, clean it, and publish the result.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{load_input, prepare_work_dir, publish_table, StepContext};
use crate::artifacts::{Artifact, ArtifactStore, Run, RunSettings, RunSummary};
use crate::transformations::clean;

pub const JOB_TYPE: &str = "basic_cleaning";
pub const GROUP: &str = "cleaning";
/// Local file name of the cleaned table.
pub const OUTPUT_FILE: &str = "clean_sample.csv";

/// Parameters of the cleaning step, recorded in the run config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Args {
    /// Input reference, e.g. `sample.csv:latest`
    pub input_artifact: String,
    /// Output artifact name, without a `.csv` suffix
    pub output_artifact: String,
    pub output_type: String,
    pub output_description: String,
    pub min_price: f64,
    pub max_price: f64,
}

pub async fn go<S: ArtifactStore + ?Sized>(
    store: &S,
    ctx: &StepContext,
    args: &Args,
) -> Result<RunSummary> {
    if args.output_artifact.to_lowercase().ends_with(".csv") {
        warn!(
            "Output artifact name '{}' ends with .csv; artifact names should not carry a file extension",
            args.output_artifact
        );
    }
    prepare_work_dir(ctx).await?;

    let settings = RunSettings::new(&ctx.project, JOB_TYPE).with_group(GROUP);
    let mut run = Run::init(store, settings);
    run.update_config(args)
        .context("Failed to record step parameters")?;

    let raw = load_input(&mut run, &args.input_artifact).await?;
    let cleaned = clean(&raw, args.min_price, args.max_price)
        .with_context(|| format!("Failed to clean {}", args.input_artifact))?;
    info!(
        "Cleaning kept {} of {} rows",
        cleaned.height(),
        raw.height()
    );

    let artifact = Artifact::new(&args.output_artifact, &args.output_type)
        .with_description(&args.output_description);
    publish_table(
        &mut run,
        &cleaned,
        &ctx.output_path(OUTPUT_FILE),
        artifact,
        &[],
    )
    .await?;

    run.finish().await.context("Failed to finish run")
}
