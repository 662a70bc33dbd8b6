//! DataFrame transformations: cleaning, filtering and splitting.
//!
//! This module provides the pure core of the pipeline. Every function takes a
//! `&DataFrame` and returns new frames; nothing here performs I/O.
//!
//! # Modules
//!
//! - [`filtering`]: Generic row filters and the date column rewrite
//! - [`cleaning`]: The ordered listing cleaning chain
//! - [`splitting`]: Seeded, optionally stratified train/val/test splitting
//!
//! # Example
//!
//! ```no_run
//! use nyc_airbnb_prep::core::Stratify;
//! use nyc_airbnb_prep::transformations::{clean, split};
//! use polars::prelude::DataFrame;
//!
//! # fn example(raw: DataFrame) -> Result<(), nyc_airbnb_prep::core::PrepError> {
//! let cleaned = clean(&raw, 10.0, 350.0)?;
//! let stratify: Stratify = "neighbourhood_group".parse()?;
//! let (train, val, test) = split(&cleaned, 0.2, 0.2, 42, &stratify)?;
//! # Ok(())
//! # }
//! ```

pub mod cleaning;
pub mod filtering;
pub mod splitting;

#[cfg(test)]
mod splitting_tests;

pub use cleaning::{clean, clean_with_range, cleaning_steps, validate_schema, CleaningStep};
pub use filtering::{
    drop_nulls, filter_by_column, filter_by_range, filter_by_ranges, filter_greater_than,
    parse_datetime_column,
};
pub use splitting::{split, split_with_sizes, train_test_split};
