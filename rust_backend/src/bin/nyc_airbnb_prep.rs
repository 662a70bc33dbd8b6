//! NYC Airbnb preparation pipeline CLI.
//!
//! Runs one pipeline step against a local artifact store.
//!
//! # Usage
//!
//! ```bash
//! # Seed the store with a raw sample
//! nyc-airbnb-prep upload-raw --input-file sample.csv
//!
//! # Clean it
//! nyc-airbnb-prep basic-cleaning --input-artifact sample.csv:latest \
//!   --output-artifact clean_sample --output-type clean_sample \
//!   --output-description "Data with outliers and null values removed" \
//!   --min-price 10 --max-price 350
//!
//! # Split it
//! nyc-airbnb-prep data-split --input-artifact clean_sample:latest \
//!   --test-size 0.2 --val-size 0.2 --random-seed 42 --stratify-by neighbourhood_group
//! ```
//!
//! Options missing on the command line are taken from `pipeline.toml`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nyc_airbnb_prep::artifacts::{LocalArtifactStore, RunSummary};
use nyc_airbnb_prep::config::{
    BasicCleaningSettings, DataSplitSettings, PipelineConfig, UploadReferenceSettings,
};
use nyc_airbnb_prep::steps::{basic_cleaning, data_split, upload_raw, upload_reference};

#[derive(Debug, Parser)]
#[command(name = "nyc-airbnb-prep", version, about = "NYC Airbnb listings preparation pipeline")]
struct Cli {
    /// Pipeline config file (default: pipeline.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Artifact store directory
    #[arg(long, global = true)]
    store_root: Option<PathBuf>,

    /// Directory for files produced by the step
    #[arg(long, global = true)]
    work_dir: Option<PathBuf>,

    /// Project the run is filed under
    #[arg(long, global = true)]
    project: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Clean the raw sample and publish the cleaned table
    BasicCleaning(BasicCleaningCmd),
    /// Split a table into train/val/test artifacts
    DataSplit(DataSplitCmd),
    /// Register a cleaned file as the validation reference
    UploadReference(UploadReferenceCmd),
    /// Seed the store with a raw listings file
    UploadRaw(UploadRawCmd),
}

#[derive(Debug, Args)]
struct BasicCleaningCmd {
    /// Input artifact, e.g. 'sample.csv:latest'
    #[arg(long, alias = "input_artifact")]
    input_artifact: Option<String>,

    /// Output artifact name (no .csv), e.g. 'clean_sample'
    #[arg(long, alias = "output_artifact")]
    output_artifact: Option<String>,

    /// Type of the output artifact
    #[arg(long, alias = "output_type")]
    output_type: Option<String>,

    /// Description of the output artifact
    #[arg(long, alias = "output_description")]
    output_description: Option<String>,

    /// Rows with price below this are removed
    #[arg(long, alias = "min_price")]
    min_price: Option<f64>,

    /// Rows with price above this are removed
    #[arg(long, alias = "max_price")]
    max_price: Option<f64>,
}

impl From<BasicCleaningCmd> for BasicCleaningSettings {
    fn from(cmd: BasicCleaningCmd) -> Self {
        Self {
            input_artifact: cmd.input_artifact,
            output_artifact: cmd.output_artifact,
            output_type: cmd.output_type,
            output_description: cmd.output_description,
            min_price: cmd.min_price,
            max_price: cmd.max_price,
        }
    }
}

#[derive(Debug, Args)]
struct DataSplitCmd {
    #[arg(long, alias = "input_artifact")]
    input_artifact: Option<String>,

    /// Fraction of rows for the test set
    #[arg(long, alias = "test_size")]
    test_size: Option<f64>,

    /// Fraction of rows for the validation set
    #[arg(long, alias = "val_size")]
    val_size: Option<f64>,

    #[arg(long, alias = "random_seed")]
    random_seed: Option<u64>,

    /// Column to stratify on, or 'none'
    #[arg(long, alias = "stratify_by")]
    stratify_by: Option<String>,
}

impl From<DataSplitCmd> for DataSplitSettings {
    fn from(cmd: DataSplitCmd) -> Self {
        Self {
            input_artifact: cmd.input_artifact,
            test_size: cmd.test_size,
            val_size: cmd.val_size,
            random_seed: cmd.random_seed,
            stratify_by: cmd.stratify_by,
        }
    }
}

#[derive(Debug, Args)]
struct UploadReferenceCmd {
    /// Cleaned CSV to register (default: clean_sample.csv in the work dir)
    #[arg(long)]
    input_file: Option<PathBuf>,

    #[arg(long)]
    artifact_name: Option<String>,

    #[arg(long)]
    alias: Option<String>,
}

impl From<UploadReferenceCmd> for UploadReferenceSettings {
    fn from(cmd: UploadReferenceCmd) -> Self {
        Self {
            input_file: cmd.input_file,
            artifact_name: cmd.artifact_name,
            alias: cmd.alias,
            ..Default::default()
        }
    }
}

#[derive(Debug, Args)]
struct UploadRawCmd {
    /// Raw CSV or JSON listings file
    #[arg(long)]
    input_file: PathBuf,

    /// Artifact name (default: the file name)
    #[arg(long)]
    artifact_name: Option<String>,

    #[arg(long, default_value = upload_raw::ARTIFACT_TYPE)]
    artifact_type: String,

    #[arg(long, default_value = upload_raw::DESCRIPTION)]
    description: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    if let Some(root) = cli.store_root {
        config.store.root = root;
    }
    if let Some(work_dir) = cli.work_dir {
        config.store.work_dir = work_dir;
    }
    if let Some(project) = cli.project {
        config.store.project = project;
    }

    let store = LocalArtifactStore::new(&config.store.root);
    let ctx = config.store.step_context();
    info!(
        "Using artifact store at {} (project {})",
        config.store.root.display(),
        ctx.project
    );

    let summary: RunSummary = match cli.command {
        Command::BasicCleaning(cmd) => {
            let args = config.basic_cleaning.overridden_by(cmd.into()).into_args()?;
            basic_cleaning::go(&store, &ctx, &args).await?
        }
        Command::DataSplit(cmd) => {
            let args = config.data_split.overridden_by(cmd.into()).into_args()?;
            data_split::go(&store, &ctx, &args).await?
        }
        Command::UploadReference(cmd) => {
            let args = config.upload_reference.overridden_by(cmd.into()).into_args();
            upload_reference::go(&store, &ctx, &args).await?
        }
        Command::UploadRaw(cmd) => {
            let args = upload_raw::Args {
                input_file: cmd.input_file,
                artifact_name: cmd.artifact_name,
                artifact_type: cmd.artifact_type,
                description: cmd.description,
            };
            upload_raw::go(&store, &ctx, &args)
                .await
                .context("Failed to upload raw file")?
        }
    };

    info!(
        "Run {} ({}) complete: logged [{}]",
        summary.run_id,
        summary.job_type,
        summary.logged_artifacts.join(", ")
    );
    Ok(())
}
