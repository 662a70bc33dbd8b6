//! High-level listings loading utilities.
//!
//! Loaders combine format detection with the CSV and JSON parsers and attach
//! file paths to every error.
//!
//! # Example
//!
//! ```no_run
//! use nyc_airbnb_prep::io::TableLoader;
//! use std::path::Path;
//!
//! let result = TableLoader::load_from_file(Path::new("sample.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} rows", result.num_rows);
//! ```

pub mod loaders;

#[cfg(test)]
mod loaders_tests;

pub use loaders::{TableLoadResult, TableLoader, TableSourceType};
