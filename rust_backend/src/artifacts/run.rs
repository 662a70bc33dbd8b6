//! Run lifecycle: consumed and produced artifacts plus run parameters.
//!
//! A [`Run`] borrows a store for its whole lifetime and is handed explicitly to
//! the pipeline steps; nothing in the crate keeps global run state.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::{ArtifactError, ArtifactResult};
use super::reference::ArtifactRef;
use super::store::{Artifact, ArtifactRecord, ArtifactStore, RunSummary};

/// Identification of a run within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub project: String,
    #[serde(default)]
    pub group: Option<String>,
    pub job_type: String,
}

impl RunSettings {
    pub fn new(project: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            group: None,
            job_type: job_type.into(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// An active run against an [`ArtifactStore`].
pub struct Run<'a, S: ArtifactStore + ?Sized> {
    store: &'a S,
    id: String,
    settings: RunSettings,
    config: serde_json::Map<String, serde_json::Value>,
    used: Vec<String>,
    logged: Vec<String>,
    started_at: DateTime<Utc>,
}

impl<'a, S: ArtifactStore + ?Sized> Run<'a, S> {
    /// Start a run. The id combines the job type, start time and a random suffix.
    pub fn init(store: &'a S, settings: RunSettings) -> Self {
        let started_at = Utc::now();
        let id = format!(
            "{}-{}-{:08x}",
            settings.job_type,
            started_at.format("%Y%m%dT%H%M%S"),
            rand::random::<u32>()
        );
        info!(
            "Run {} started (project {}, job type {})",
            id, settings.project, settings.job_type
        );
        Self {
            store,
            id,
            settings,
            config: serde_json::Map::new(),
            used: Vec::new(),
            logged: Vec::new(),
            started_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn config(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.config
    }

    /// Merge the fields of `params` into the run config; later values win.
    pub fn update_config<T: Serialize + ?Sized>(&mut self, params: &T) -> ArtifactResult<()> {
        match serde_json::to_value(params)? {
            serde_json::Value::Object(fields) => {
                self.config.extend(fields);
                Ok(())
            }
            other => Err(ArtifactError::SerializationError(format!(
                "run config must serialize to an object, got {}",
                other
            ))),
        }
    }

    /// Resolve `reference` and return the local path of its single file.
    pub async fn use_artifact(&mut self, reference: &str) -> ArtifactResult<PathBuf> {
        let reference = ArtifactRef::parse(reference)?;
        let record = self.store.use_artifact(&reference).await?;
        let dir = self.store.download(&record).await?;
        let path = dir.join(record.single_file()?);

        info!("Run {} uses {}", self.id, record.qualified_name());
        self.used.push(record.qualified_name());
        Ok(path)
    }

    /// Publish `artifact` with extra `aliases`.
    pub async fn log_artifact(
        &mut self,
        artifact: &Artifact,
        aliases: &[&str],
    ) -> ArtifactResult<ArtifactRecord> {
        let aliases: Vec<String> = aliases.iter().map(|a| a.to_string()).collect();
        let record = self.store.log_artifact(artifact, &aliases).await?;
        self.logged.push(record.qualified_name());
        Ok(record)
    }

    /// End the run and persist its summary through the store.
    pub async fn finish(self) -> ArtifactResult<RunSummary> {
        let summary = RunSummary {
            run_id: self.id,
            project: self.settings.project,
            group: self.settings.group,
            job_type: self.settings.job_type,
            config: self.config,
            used_artifacts: self.used,
            logged_artifacts: self.logged,
            started_at: self.started_at,
            finished_at: Utc::now(),
        };
        self.store.record_run(&summary).await?;
        info!(
            "Run {} finished: used [{}], logged [{}]",
            summary.run_id,
            summary.used_artifacts.join(", "),
            summary.logged_artifacts.join(", ")
        );
        Ok(summary)
    }
}
