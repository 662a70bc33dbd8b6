//! Versioned artifact tracking for the pipeline steps.
//!
//! The [`ArtifactStore`] trait is the seam between the steps and storage;
//! [`LocalArtifactStore`] keeps every version in a local directory tree. A
//! [`Run`] wraps a store with the bookkeeping of one step execution: the
//! artifacts it consumed and produced and the parameters it ran with.
//!
//! # Example
//!
//! ```no_run
//! use nyc_airbnb_prep::artifacts::{Artifact, LocalArtifactStore, Run, RunSettings};
//!
//! # async fn demo() -> nyc_airbnb_prep::artifacts::ArtifactResult<()> {
//! let store = LocalArtifactStore::new("artifacts");
//! let mut run = Run::init(&store, RunSettings::new("nyc_airbnb", "basic_cleaning"));
//! let input = run.use_artifact("sample.csv:latest").await?;
//!
//! let mut artifact = Artifact::new("clean_sample", "clean_sample");
//! artifact.add_file(input);
//! run.log_artifact(&artifact, &[]).await?;
//! run.finish().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod local;
pub mod reference;
pub mod run;
pub mod store;


pub use error::{ArtifactError, ArtifactResult};
pub use local::LocalArtifactStore;
pub use reference::{ArtifactRef, VersionSelector};
pub use run::{Run, RunSettings};
pub use store::{Artifact, ArtifactRecord, ArtifactStore, RunSummary};
