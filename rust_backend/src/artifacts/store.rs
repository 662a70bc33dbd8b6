//! Artifact store trait and the records it exchanges.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::{ArtifactError, ArtifactResult};
use super::reference::ArtifactRef;

/// A set of local files to publish under one name and type.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub artifact_type: String,
    pub description: Option<String>,
    files: Vec<PathBuf>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, artifact_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            description: None,
            files: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a local file; it is copied into the store when logged.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.files.push(path.into());
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// One immutable stored version of an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub version: u32,
    pub artifact_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hex SHA-256 over file names and contents
    pub digest: String,
    /// File names relative to the version directory
    pub files: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    /// `name:v<N>`
    pub fn qualified_name(&self) -> String {
        format!("{}:v{}", self.name, self.version)
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    /// The only file of a single-file artifact.
    pub fn single_file(&self) -> ArtifactResult<&str> {
        match self.files.as_slice() {
            [file] => Ok(file.as_str()),
            files => Err(ArtifactError::ValidationError(format!(
                "{} holds {} files, expected exactly one",
                self.qualified_name(),
                files.len()
            ))),
        }
    }
}

/// Record of one finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub job_type: String,
    pub config: serde_json::Map<String, serde_json::Value>,
    /// Qualified names of consumed artifacts
    pub used_artifacts: Vec<String>,
    /// Qualified names of produced artifacts
    pub logged_artifacts: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Versioned artifact storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Resolve a reference to a stored version.
    ///
    /// # Returns
    /// * `Err(ArtifactError::NotFound)` - If the name, version or alias is unknown
    async fn use_artifact(&self, reference: &ArtifactRef) -> ArtifactResult<ArtifactRecord>;

    /// Local directory holding the files of a stored version.
    async fn download(&self, record: &ArtifactRecord) -> ArtifactResult<PathBuf>;

    /// Publish an artifact and assign `aliases` to the resulting version.
    ///
    /// Content identical to an existing version reuses that version; only the
    /// aliases change. `latest` is managed by the store.
    async fn log_artifact(
        &self,
        artifact: &Artifact,
        aliases: &[String],
    ) -> ArtifactResult<ArtifactRecord>;

    /// All versions of `name`, oldest first; empty when the name is unknown.
    async fn versions(&self, name: &str) -> ArtifactResult<Vec<ArtifactRecord>>;

    /// Persist the summary of a finished run.
    async fn record_run(&self, summary: &RunSummary) -> ArtifactResult<()>;
}

/// File name component of `path`, as stored in a record.
pub(crate) fn file_name_of(path: &Path) -> ArtifactResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ArtifactError::ValidationError(format!("'{}' has no file name", path.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(files: &[&str]) -> ArtifactRecord {
        ArtifactRecord {
            name: "train.csv".into(),
            version: 2,
            artifact_type: "train_data".into(),
            description: None,
            digest: "00".into(),
            files: files.iter().map(|f| f.to_string()).collect(),
            aliases: vec!["latest".into()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_qualified_name_and_alias() {
        let rec = record(&["train.csv"]);
        assert_eq!(rec.qualified_name(), "train.csv:v2");
        assert!(rec.has_alias("latest"));
        assert!(!rec.has_alias("reference"));
    }

    #[test]
    fn test_single_file() {
        assert_eq!(record(&["train.csv"]).single_file().unwrap(), "train.csv");
        assert!(record(&[]).single_file().is_err());
        assert!(record(&["a.csv", "b.csv"]).single_file().is_err());
    }

    #[test]
    fn test_artifact_builder() {
        let mut artifact = Artifact::new("clean_sample", "clean_sample").with_description("Data");
        artifact.add_file("clean_sample.csv");
        assert_eq!(artifact.description.as_deref(), Some("Data"));
        assert_eq!(artifact.files(), [PathBuf::from("clean_sample.csv")]);
    }

    #[test]
    fn test_record_json_round_trip() {
        let rec = record(&["train.csv"]);
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("description"));
        let back: ArtifactRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
