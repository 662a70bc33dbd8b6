//! Seed the store with a raw listings file so the pipeline can start locally.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{publish, StepContext};
use crate::artifacts::store::file_name_of;
use crate::artifacts::{Artifact, ArtifactStore, Run, RunSettings, RunSummary};
use crate::io::TableLoader;

pub const JOB_TYPE: &str = "upload_raw";
pub const ARTIFACT_TYPE: &str = "raw_data";
pub const DESCRIPTION: &str = "Raw listings sample";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Args {
    pub input_file: PathBuf,
    /// Defaults to the file name of `input_file`, e.g. `sample.csv`
    pub artifact_name: Option<String>,
    pub artifact_type: String,
    pub description: String,
}

impl Args {
    pub fn new(input_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            artifact_name: None,
            artifact_type: ARTIFACT_TYPE.to_string(),
            description: DESCRIPTION.to_string(),
        }
    }
}

pub async fn go<S: ArtifactStore + ?Sized>(
    store: &S,
    ctx: &StepContext,
    args: &Args,
) -> Result<RunSummary> {
    // Refuse files the later steps could not read.
    let loaded = TableLoader::load_from_file(&args.input_file)
        .with_context(|| format!("Failed to load raw file {}", args.input_file.display()))?;

    let name = match &args.artifact_name {
        Some(name) => name.clone(),
        None => file_name_of(&args.input_file)?,
    };

    let mut run = Run::init(store, RunSettings::new(&ctx.project, JOB_TYPE));
    run.update_config(args)
        .context("Failed to record step parameters")?;

    let mut artifact = Artifact::new(name, &args.artifact_type).with_description(&args.description);
    artifact.add_file(&args.input_file);
    let record = publish(&mut run, artifact, &[]).await?;
    log::info!(
        "Seeded {} with {} rows",
        record.qualified_name(),
        loaded.num_rows
    );

    run.finish().await.context("Failed to finish run")
}
