//! Parsers for listings data formats.
//!
//! This module converts between text formats and polars `DataFrame`s.
//!
//! # Parsers
//!
//! - [`csv_parser`]: Read and write headed CSV files
//! - [`json_parser`]: Read JSON arrays of flat records
//! - [`dates`]: Parse date-like strings into timestamps
//!
//! # Example
//!
//! ```no_run
//! use nyc_airbnb_prep::parsing::csv_parser::parse_table_csv;
//! use std::path::Path;
//!
//! let listings = parse_table_csv(Path::new("sample.csv"))
//!     .expect("Failed to parse listings");
//! ```

pub mod csv_parser;
pub mod dates;
pub mod json_parser;
