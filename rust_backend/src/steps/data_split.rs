//! Split the cleaned listings into train, validation and test artifacts.
//!
//! All three partitions are written to the work dir before any of them is
//! logged, so a split or write failure leaves the store untouched. A store
//! failure while logging can still leave the earlier partitions registered.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{load_input, prepare_work_dir, publish, write_output, StepContext};
use crate::artifacts::{Artifact, ArtifactStore, Run, RunSettings, RunSummary};
use crate::core::Stratify;
use crate::transformations::split;

pub const JOB_TYPE: &str = "data_split";

/// File name and artifact type of each partition, in output order.
pub const PARTITIONS: [(&str, &str); 3] = [
    ("train.csv", "train_data"),
    ("val.csv", "val_data"),
    ("test.csv", "test_data"),
];

/// Parameters of the split step, recorded in the run config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Args {
    pub input_artifact: String,
    pub test_size: f64,
    pub val_size: f64,
    pub random_seed: u64,
    /// Column to stratify on, or `none`
    pub stratify_by: String,
}

pub async fn go<S: ArtifactStore + ?Sized>(
    store: &S,
    ctx: &StepContext,
    args: &Args,
) -> Result<RunSummary> {
    prepare_work_dir(ctx).await?;

    let mut run = Run::init(store, RunSettings::new(&ctx.project, JOB_TYPE));
    run.update_config(args)
        .context("Failed to record step parameters")?;

    let cleaned = load_input(&mut run, &args.input_artifact).await?;
    let stratify: Stratify = args.stratify_by.parse()?;
    let (train, val, test) = split(
        &cleaned,
        args.test_size,
        args.val_size,
        args.random_seed,
        &stratify,
    )
    .with_context(|| format!("Failed to split {}", args.input_artifact))?;

    let mut artifacts = Vec::with_capacity(PARTITIONS.len());
    for ((file_name, artifact_type), partition) in PARTITIONS.iter().zip([&train, &val, &test]) {
        let path = ctx.output_path(file_name);
        write_output(partition, &path)?;
        let mut artifact = Artifact::new(*file_name, *artifact_type);
        artifact.add_file(&path);
        artifacts.push(artifact);
    }

    for artifact in artifacts {
        publish(&mut run, artifact, &[]).await?;
    }

    run.finish().await.context("Failed to finish run")
}
