//! Core vocabulary for the listings preparation pipeline.
//!
//! Listings travel through the crate as polars `DataFrame`s. This module
//! names the columns and bounds the cleaner relies on, the validated split
//! parameters, and the error taxonomy shared by the cleaning and splitting
//! transformations.

pub mod domain;
pub mod error;

pub use domain::{PriceRange, SplitSizes, Stratify};
pub use error::{PrepError, PrepResult};
