//! NYC Airbnb listings preparation.
//!
//! Two pure transformations sit at the center of the crate:
//!
//! - [`transformations::clean`] drops price outliers and incomplete listings,
//!   parses `last_review`, and keeps entire homes inside the city bounds.
//! - [`transformations::split`] produces seeded, optionally stratified
//!   train/validation/test partitions.
//!
//! Around them, [`steps`] runs each transformation against a versioned
//! [`artifacts`] store, configured through [`config`].

pub mod artifacts;
pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod steps;
pub mod transformations;
