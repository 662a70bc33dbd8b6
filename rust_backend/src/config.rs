//! Pipeline configuration file support.
//!
//! Options live in `pipeline.toml`, one section per step plus `[store]`.
//! Every option is optional in the file; command-line values take precedence,
//! and a step option missing from both is reported by its dotted name.
//!
//! ```toml
//! [store]
//! root = "artifacts"
//! project = "nyc_airbnb"
//!
//! [basic_cleaning]
//! input_artifact = "sample.csv:latest"
//! output_artifact = "clean_sample"
//! output_type = "clean_sample"
//! output_description = "Data with outliers and null values removed"
//! min_price = 10
//! max_price = 350
//!
//! [data_split]
//! input_artifact = "clean_sample:latest"
//! test_size = 0.2
//! val_size = 0.2
//! random_seed = 42
//! stratify_by = "neighbourhood_group"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::steps::{basic_cleaning, data_split, upload_reference, StepContext, DEFAULT_PROJECT};

pub const CONFIG_FILE: &str = "pipeline.toml";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("No {0} found in standard locations")]
    NotFound(&'static str),

    #[error("Missing required option '{0}' (set it in the config file or on the command line)")]
    MissingOption(String),
}

/// Whole-pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub basic_cleaning: BasicCleaningSettings,
    #[serde(default)]
    pub data_split: DataSplitSettings,
    #[serde(default)]
    pub upload_reference: UploadReferenceSettings,
}

/// Artifact store location and run bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
    #[serde(default = "default_project")]
    pub project: String,
    /// Scratch directory for files produced by the steps
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

fn default_store_root() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            project: default_project(),
            work_dir: default_work_dir(),
        }
    }
}

impl StoreSettings {
    pub fn step_context(&self) -> StepContext {
        StepContext::new(&self.project, &self.work_dir)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicCleaningSettings {
    pub input_artifact: Option<String>,
    pub output_artifact: Option<String>,
    pub output_type: Option<String>,
    pub output_description: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSplitSettings {
    pub input_artifact: Option<String>,
    pub test_size: Option<f64>,
    pub val_size: Option<f64>,
    pub random_seed: Option<u64>,
    pub stratify_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadReferenceSettings {
    pub input_file: Option<PathBuf>,
    pub artifact_name: Option<String>,
    pub artifact_type: Option<String>,
    pub description: Option<String>,
    pub alias: Option<String>,
}

fn required<T>(value: Option<T>, option: &str) -> ConfigResult<T> {
    value.ok_or_else(|| ConfigError::MissingOption(option.to_string()))
}

impl BasicCleaningSettings {
    /// Values set in `overrides` replace the ones in `self`.
    pub fn overridden_by(self, overrides: Self) -> Self {
        Self {
            input_artifact: overrides.input_artifact.or(self.input_artifact),
            output_artifact: overrides.output_artifact.or(self.output_artifact),
            output_type: overrides.output_type.or(self.output_type),
            output_description: overrides.output_description.or(self.output_description),
            min_price: overrides.min_price.or(self.min_price),
            max_price: overrides.max_price.or(self.max_price),
        }
    }

    pub fn into_args(self) -> ConfigResult<basic_cleaning::Args> {
        Ok(basic_cleaning::Args {
            input_artifact: required(self.input_artifact, "basic_cleaning.input_artifact")?,
            output_artifact: required(self.output_artifact, "basic_cleaning.output_artifact")?,
            output_type: required(self.output_type, "basic_cleaning.output_type")?,
            output_description: required(
                self.output_description,
                "basic_cleaning.output_description",
            )?,
            min_price: required(self.min_price, "basic_cleaning.min_price")?,
            max_price: required(self.max_price, "basic_cleaning.max_price")?,
        })
    }
}

impl DataSplitSettings {
    /// Values set in `overrides` replace the ones in `self`.
    pub fn overridden_by(self, overrides: Self) -> Self {
        Self {
            input_artifact: overrides.input_artifact.or(self.input_artifact),
            test_size: overrides.test_size.or(self.test_size),
            val_size: overrides.val_size.or(self.val_size),
            random_seed: overrides.random_seed.or(self.random_seed),
            stratify_by: overrides.stratify_by.or(self.stratify_by),
        }
    }

    pub fn into_args(self) -> ConfigResult<data_split::Args> {
        Ok(data_split::Args {
            input_artifact: required(self.input_artifact, "data_split.input_artifact")?,
            test_size: required(self.test_size, "data_split.test_size")?,
            val_size: required(self.val_size, "data_split.val_size")?,
            random_seed: required(self.random_seed, "data_split.random_seed")?,
            stratify_by: required(self.stratify_by, "data_split.stratify_by")?,
        })
    }
}

impl UploadReferenceSettings {
    /// Values set in `overrides` replace the ones in `self`.
    pub fn overridden_by(self, overrides: Self) -> Self {
        Self {
            input_file: overrides.input_file.or(self.input_file),
            artifact_name: overrides.artifact_name.or(self.artifact_name),
            artifact_type: overrides.artifact_type.or(self.artifact_type),
            description: overrides.description.or(self.description),
            alias: overrides.alias.or(self.alias),
        }
    }

    /// Unset options fall back to the standard reference artifact.
    pub fn into_args(self) -> upload_reference::Args {
        let defaults = upload_reference::Args::default();
        upload_reference::Args {
            input_file: self.input_file.unwrap_or(defaults.input_file),
            artifact_name: self.artifact_name.unwrap_or(defaults.artifact_name),
            artifact_type: self.artifact_type.unwrap_or(defaults.artifact_type),
            description: self.description.unwrap_or(defaults.description),
            alias: self.alias.unwrap_or(defaults.alias),
        }
    }
}

impl PipelineConfig {
    /// Load pipeline configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|message| ConfigError::ParseError {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load pipeline configuration from the default location.
    ///
    /// Searches for `pipeline.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> ConfigResult<Self> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE),
            Path::new("rust_backend").join(CONFIG_FILE),
            Path::new("..").join(CONFIG_FILE),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound(CONFIG_FILE))
    }

    /// Explicit path if given, else the default location, else built-in defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::from_default_location() {
                Err(ConfigError::NotFound(_)) => Ok(Self::default()),
                other => other,
            },
        }
    }
}
