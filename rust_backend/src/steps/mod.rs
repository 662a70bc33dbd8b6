//! Pipeline steps: artifact in, core transformation, artifact out.
//!
//! Each step opens a [`Run`](crate::artifacts::Run) against the store it is
//! given, records its parameters, and finishes the run once its outputs are
//! logged. Files a step produces are written into the context's work dir
//! before they are copied into the store.

use anyhow::{Context, Result};
use log::info;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

use crate::artifacts::{Artifact, ArtifactRecord, ArtifactStore, Run};
use crate::io::TableLoader;

pub mod basic_cleaning;
pub mod data_split;
pub mod upload_raw;
pub mod upload_reference;

/// Default project every run is filed under.
pub const DEFAULT_PROJECT: &str = "nyc_airbnb";

/// Where a step runs: project name and local scratch directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StepContext {
    pub project: String,
    pub work_dir: PathBuf,
}

impl StepContext {
    pub fn new(project: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Path of `file_name` inside the work dir.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.work_dir.join(file_name)
    }
}

impl Default for StepContext {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT, ".")
    }
}

/// Fetch a table artifact through `run` and load it.
pub(crate) async fn load_input<S: ArtifactStore + ?Sized>(
    run: &mut Run<'_, S>,
    reference: &str,
) -> Result<DataFrame> {
    info!("Downloading artifact {}", reference);
    let path = run
        .use_artifact(reference)
        .await
        .with_context(|| format!("Failed to fetch input artifact {}", reference))?;
    let loaded = TableLoader::load_from_file(&path)
        .with_context(|| format!("Failed to load input artifact {}", reference))?;
    info!("Loaded {} rows from {}", loaded.num_rows, reference);
    Ok(loaded.dataframe)
}

/// Write `df` as CSV into the work dir.
pub(crate) fn write_output(df: &DataFrame, path: &Path) -> Result<()> {
    TableLoader::save_csv(df, path).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write `df` as CSV and log it as a single-file artifact.
pub(crate) async fn publish_table<S: ArtifactStore + ?Sized>(
    run: &mut Run<'_, S>,
    df: &DataFrame,
    path: &Path,
    mut artifact: Artifact,
    aliases: &[&str],
) -> Result<ArtifactRecord> {
    write_output(df, path)?;
    artifact.add_file(path);
    publish(run, artifact, aliases).await
}

/// Log an artifact whose files are already attached.
pub(crate) async fn publish<S: ArtifactStore + ?Sized>(
    run: &mut Run<'_, S>,
    artifact: Artifact,
    aliases: &[&str],
) -> Result<ArtifactRecord> {
    info!("Logging artifact {} ({})", artifact.name, artifact.artifact_type);
    run.log_artifact(&artifact, aliases)
        .await
        .with_context(|| format!("Failed to log artifact {}", artifact.name))
}

/// Make sure the work dir exists before a step writes into it.
pub(crate) async fn prepare_work_dir(ctx: &StepContext) -> Result<()> {
    tokio::fs::create_dir_all(&ctx.work_dir)
        .await
        .with_context(|| format!("Failed to create work dir {}", ctx.work_dir.display()))
}
