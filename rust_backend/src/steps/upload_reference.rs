//! Register an already-cleaned table as the reference dataset for validation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{publish, StepContext};
use crate::artifacts::{Artifact, ArtifactStore, Run, RunSettings, RunSummary};

pub const JOB_TYPE: &str = "upload_reference";
pub const ARTIFACT_NAME: &str = "clean_sample_reference";
pub const ARTIFACT_TYPE: &str = "reference";
pub const DESCRIPTION: &str = "Reference dataset for data validation";
/// Downstream validation looks the reference up by this alias.
pub const ALIAS: &str = "reference";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Args {
    /// Cleaned CSV to register; relative paths resolve against the work dir
    pub input_file: PathBuf,
    pub artifact_name: String,
    pub artifact_type: String,
    pub description: String,
    pub alias: String,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from(super::basic_cleaning::OUTPUT_FILE),
            artifact_name: ARTIFACT_NAME.to_string(),
            artifact_type: ARTIFACT_TYPE.to_string(),
            description: DESCRIPTION.to_string(),
            alias: ALIAS.to_string(),
        }
    }
}

pub async fn go<S: ArtifactStore + ?Sized>(
    store: &S,
    ctx: &StepContext,
    args: &Args,
) -> Result<RunSummary> {
    let input = ctx.work_dir.join(&args.input_file);
    if !input.is_file() {
        anyhow::bail!("Reference file {} does not exist", input.display());
    }

    let mut run = Run::init(store, RunSettings::new(&ctx.project, JOB_TYPE));
    run.update_config(args)
        .context("Failed to record step parameters")?;

    let mut artifact =
        Artifact::new(&args.artifact_name, &args.artifact_type).with_description(&args.description);
    artifact.add_file(input);
    publish(&mut run, artifact, &[args.alias.as_str()]).await?;

    run.finish().await.context("Failed to finish run")
}
