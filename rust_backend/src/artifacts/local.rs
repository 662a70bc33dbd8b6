//! Directory-backed artifact store.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<name>/manifest.json     every version of <name> with its aliases
//! <root>/<name>/v<N>/<file>       immutable copy of the published files
//! <root>/runs/<run_id>.json       finished run summaries
//! ```
//!
//! Writes are serialized through a single async lock per store handle, so
//! clones of one `LocalArtifactStore` never interleave manifest updates.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use super::error::{ArtifactError, ArtifactResult};
use super::reference::{parse_version_tag, ArtifactRef, VersionSelector, LATEST};
use super::store::{file_name_of, Artifact, ArtifactRecord, ArtifactStore, RunSummary};

const MANIFEST_FILE: &str = "manifest.json";
const RUNS_DIR: &str = "runs";

/// Calculate the SHA-256 digest of a set of named files.
///
/// Files are hashed in name order, each as its name, a NUL byte, then its
/// contents, so the digest does not depend on the order files were attached.
pub fn calculate_digest(files: &[(String, Vec<u8>)]) -> String {
    let mut sorted: Vec<&(String, Vec<u8>)> = files.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Sha256::new();
    for (name, contents) in sorted {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(contents);
    }
    hex::encode(hasher.finalize())
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    name: String,
    versions: Vec<ArtifactRecord>,
}

/// Artifact store keeping every version on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LocalArtifactStore {
    /// Create a store rooted at `root`; the directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_dir(&self, name: &str) -> ArtifactResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    fn version_dir(&self, name: &str, version: u32) -> ArtifactResult<PathBuf> {
        Ok(self.artifact_dir(name)?.join(format!("v{}", version)))
    }

    async fn load_manifest(&self, name: &str) -> ArtifactResult<Option<Manifest>> {
        let path = self.artifact_dir(name)?.join(MANIFEST_FILE);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ArtifactError::IoError(format!("{}: {}", path.display(), e))),
        }
    }

    async fn save_manifest(&self, manifest: &Manifest) -> ArtifactResult<()> {
        let dir = self.artifact_dir(&manifest.name)?;
        fs::create_dir_all(&dir).await?;

        let tmp = dir.join(format!("{}.tmp", MANIFEST_FILE));
        fs::write(&tmp, serde_json::to_vec_pretty(manifest)?).await?;
        fs::rename(&tmp, dir.join(MANIFEST_FILE)).await?;
        Ok(())
    }
}

fn validate_name(name: &str) -> ArtifactResult<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(ArtifactError::ValidationError(format!(
            "invalid artifact name '{}'",
            name
        )));
    }
    if name.contains(['/', '\\', ':']) {
        return Err(ArtifactError::ValidationError(format!(
            "artifact name '{}' must not contain '/', '\\' or ':'",
            name
        )));
    }
    if name == RUNS_DIR {
        return Err(ArtifactError::ValidationError(format!(
            "artifact name '{}' is reserved",
            name
        )));
    }
    Ok(())
}

fn validate_alias(alias: &str) -> ArtifactResult<()> {
    if alias.is_empty() || alias.contains([':', '/']) || parse_version_tag(alias).is_some() {
        return Err(ArtifactError::ValidationError(format!(
            "invalid alias '{}'",
            alias
        )));
    }
    Ok(())
}

/// Move every alias onto `versions[target]`, `latest` included.
///
/// `latest` tracks the most recently logged content, which is an older
/// version when that content was deduplicated.
fn assign_aliases(versions: &mut [ArtifactRecord], target: usize, aliases: &[String]) {
    for alias in aliases.iter().filter(|a| a.as_str() != LATEST) {
        for record in versions.iter_mut() {
            record.aliases.retain(|a| a != alias);
        }
        versions[target].aliases.push(alias.clone());
    }

    for record in versions.iter_mut() {
        record.aliases.retain(|a| a != LATEST);
    }
    versions[target].aliases.insert(0, LATEST.to_string());
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn use_artifact(&self, reference: &ArtifactRef) -> ArtifactResult<ArtifactRecord> {
        let manifest = self
            .load_manifest(&reference.name)
            .await?
            .ok_or_else(|| ArtifactError::NotFound(format!("artifact '{}'", reference.name)))?;

        let found = match &reference.selector {
            VersionSelector::Latest => manifest
                .versions
                .iter()
                .find(|r| r.has_alias(LATEST))
                .or_else(|| manifest.versions.last()),
            VersionSelector::Version(v) => manifest.versions.iter().find(|r| r.version == *v),
            VersionSelector::Alias(alias) => manifest.versions.iter().find(|r| r.has_alias(alias)),
        };

        let record = found
            .cloned()
            .ok_or_else(|| ArtifactError::NotFound(reference.to_string()))?;
        debug!("Resolved {} to {}", reference, record.qualified_name());
        Ok(record)
    }

    async fn download(&self, record: &ArtifactRecord) -> ArtifactResult<PathBuf> {
        let dir = self.version_dir(&record.name, record.version)?;
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(ArtifactError::InternalError(format!(
                "{} is not a directory",
                dir.display()
            ))),
            Err(_) => Err(ArtifactError::NotFound(format!(
                "files of {} at {}",
                record.qualified_name(),
                dir.display()
            ))),
        }
    }

    async fn log_artifact(
        &self,
        artifact: &Artifact,
        aliases: &[String],
    ) -> ArtifactResult<ArtifactRecord> {
        validate_name(&artifact.name)?;
        for alias in aliases {
            validate_alias(alias)?;
        }
        if artifact.files().is_empty() {
            return Err(ArtifactError::ValidationError(format!(
                "artifact '{}' has no files",
                artifact.name
            )));
        }

        let mut contents: Vec<(String, Vec<u8>)> = Vec::with_capacity(artifact.files().len());
        let mut seen = HashSet::new();
        for path in artifact.files() {
            let file_name = file_name_of(path)?;
            if !seen.insert(file_name.clone()) {
                return Err(ArtifactError::ValidationError(format!(
                    "artifact '{}' has two files named '{}'",
                    artifact.name, file_name
                )));
            }
            let bytes = fs::read(path)
                .await
                .map_err(|e| ArtifactError::IoError(format!("{}: {}", path.display(), e)))?;
            contents.push((file_name, bytes));
        }
        let digest = calculate_digest(&contents);

        let _guard = self.write_lock.lock().await;
        let mut manifest = self
            .load_manifest(&artifact.name)
            .await?
            .unwrap_or_else(|| Manifest {
                name: artifact.name.clone(),
                versions: Vec::new(),
            });

        if let Some(first) = manifest.versions.first() {
            if first.artifact_type != artifact.artifact_type {
                return Err(ArtifactError::ValidationError(format!(
                    "artifact '{}' has type '{}', cannot log it as '{}'",
                    artifact.name, first.artifact_type, artifact.artifact_type
                )));
            }
        }

        let target = match manifest.versions.iter().position(|r| r.digest == digest) {
            Some(idx) => {
                info!(
                    "Content of '{}' unchanged, reusing {}",
                    artifact.name,
                    manifest.versions[idx].qualified_name()
                );
                idx
            }
            None => {
                let version = manifest.versions.len() as u32;
                let dir = self.version_dir(&artifact.name, version)?;
                fs::create_dir_all(&dir).await?;
                for (file_name, bytes) in &contents {
                    fs::write(dir.join(file_name), bytes).await?;
                }

                manifest.versions.push(ArtifactRecord {
                    name: artifact.name.clone(),
                    version,
                    artifact_type: artifact.artifact_type.clone(),
                    description: artifact.description.clone(),
                    digest,
                    files: contents.into_iter().map(|(name, _)| name).collect(),
                    aliases: Vec::new(),
                    created_at: Utc::now(),
                });
                manifest.versions.len() - 1
            }
        };

        assign_aliases(&mut manifest.versions, target, aliases);
        self.save_manifest(&manifest).await?;

        let record = manifest.versions[target].clone();
        info!(
            "Logged artifact {} (type {}, aliases [{}])",
            record.qualified_name(),
            record.artifact_type,
            record.aliases.join(", ")
        );
        Ok(record)
    }

    async fn versions(&self, name: &str) -> ArtifactResult<Vec<ArtifactRecord>> {
        Ok(self
            .load_manifest(name)
            .await?
            .map(|m| m.versions)
            .unwrap_or_default())
    }

    async fn record_run(&self, summary: &RunSummary) -> ArtifactResult<()> {
        if summary.run_id.is_empty() || summary.run_id.contains(['/', '\\']) {
            return Err(ArtifactError::ValidationError(format!(
                "invalid run id '{}'",
                summary.run_id
            )));
        }
        let dir = self.root.join(RUNS_DIR);
        fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}.json", summary.run_id));
        fs::write(&path, serde_json::to_vec_pretty(summary)?).await?;
        debug!("Recorded run {} at {}", summary.run_id, path.display());
        Ok(())
    }
}
