//! Listing cleaner: an ordered chain of row filters and one column rewrite.
//!
//! The order of [`cleaning_steps`] is normative. Later steps rely on the state
//! left by earlier ones (for example, nulls introduced by date parsing are only
//! removed by the following step), so the chain must run exactly as listed.

use log::{debug, info};
use polars::prelude::*;

use super::filtering::{
    drop_nulls, filter_by_column, filter_by_range, filter_by_ranges, filter_greater_than,
    parse_datetime_column,
};
use crate::core::domain::{columns, ENTIRE_HOME, LATITUDE_BOUNDS, LONGITUDE_BOUNDS};
use crate::core::{PrepError, PrepResult, PriceRange};

/// One stage of the cleaning chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CleaningStep {
    /// Keep rows with `min_price <= price <= max_price`
    PriceRange(PriceRange),
    /// Parse `last_review` into timestamps, unparseable values become null
    ParseLastReview,
    /// Drop rows without a `last_review`
    DropMissingLastReview,
    /// Keep rows inside the city bounding box
    CityBoundary,
    /// Keep rows with `availability_365 > 0`
    PositiveAvailability,
    /// Drop rows without a `host_name`
    DropMissingHostName,
    /// Keep rows whose `room_type` is exactly "Entire home/apt"
    EntireHomeOnly,
    /// Re-check the price bound after every other filter
    PriceRecheck(PriceRange),
}

impl CleaningStep {
    /// Short identifier used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            CleaningStep::PriceRange(_) => "price_range",
            CleaningStep::ParseLastReview => "parse_last_review",
            CleaningStep::DropMissingLastReview => "drop_missing_last_review",
            CleaningStep::CityBoundary => "city_boundary",
            CleaningStep::PositiveAvailability => "positive_availability",
            CleaningStep::DropMissingHostName => "drop_missing_host_name",
            CleaningStep::EntireHomeOnly => "entire_home_only",
            CleaningStep::PriceRecheck(_) => "price_recheck",
        }
    }

    /// Applies this step, returning a new frame.
    pub fn apply(&self, df: &DataFrame) -> PrepResult<DataFrame> {
        match self {
            CleaningStep::PriceRange(range) | CleaningStep::PriceRecheck(range) => {
                filter_by_range(df, columns::PRICE, range.min_price, range.max_price)
            }
            CleaningStep::ParseLastReview => parse_datetime_column(df, columns::LAST_REVIEW),
            CleaningStep::DropMissingLastReview => drop_nulls(df, columns::LAST_REVIEW),
            CleaningStep::CityBoundary => filter_by_ranges(
                df,
                &[
                    (columns::LONGITUDE, LONGITUDE_BOUNDS.0, LONGITUDE_BOUNDS.1),
                    (columns::LATITUDE, LATITUDE_BOUNDS.0, LATITUDE_BOUNDS.1),
                ],
            ),
            CleaningStep::PositiveAvailability => {
                filter_greater_than(df, columns::AVAILABILITY_365, 0.0)
            }
            CleaningStep::DropMissingHostName => drop_nulls(df, columns::HOST_NAME),
            CleaningStep::EntireHomeOnly => filter_by_column(df, columns::ROOM_TYPE, ENTIRE_HOME),
        }
    }
}

/// The cleaning chain in execution order.
pub fn cleaning_steps(range: PriceRange) -> [CleaningStep; 8] {
    [
        CleaningStep::PriceRange(range),
        CleaningStep::ParseLastReview,
        CleaningStep::DropMissingLastReview,
        CleaningStep::CityBoundary,
        CleaningStep::PositiveAvailability,
        CleaningStep::DropMissingHostName,
        CleaningStep::EntireHomeOnly,
        CleaningStep::PriceRecheck(range),
    ]
}

/// Fail with a schema error naming every required column that is absent
pub fn validate_schema(df: &DataFrame, required_columns: &[&str]) -> PrepResult<()> {
    let missing: Vec<String> = required_columns
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PrepError::SchemaError(missing))
    }
}

/// Clean a raw listings frame.
///
/// Runs every step of [`cleaning_steps`] in order. The input frame is left
/// untouched; the result has the same columns with `last_review` normalized to
/// microsecond timestamps.
///
/// # Errors
///
/// [`PrepError::SchemaError`] if any required column is absent.
///
/// # Examples
///
/// ```
/// use nyc_airbnb_prep::transformations::clean;
/// use polars::prelude::*;
///
/// let raw = df!(
///     "price" => [150, 150],
///     "last_review" => ["2019-05-21", "not-a-date"],
///     "longitude" => [-73.95, -73.95],
///     "latitude" => [40.7, 40.7],
///     "availability_365" => [30, 30],
///     "host_name" => ["Ana", "Ben"],
///     "room_type" => ["Entire home/apt", "Entire home/apt"],
/// )
/// .unwrap();
///
/// let cleaned = clean(&raw, 10.0, 350.0).unwrap();
/// assert_eq!(cleaned.height(), 1);
/// ```
pub fn clean(df: &DataFrame, min_price: f64, max_price: f64) -> PrepResult<DataFrame> {
    clean_with_range(df, PriceRange::new(min_price, max_price))
}

/// [`clean`] taking a [`PriceRange`].
pub fn clean_with_range(df: &DataFrame, range: PriceRange) -> PrepResult<DataFrame> {
    validate_schema(df, &columns::REQUIRED)?;

    let input_rows = df.height();
    let mut current = df.clone();
    for step in cleaning_steps(range) {
        let before = current.height();
        current = step.apply(&current)?;
        debug!(
            "Cleaning step {}: {} -> {} rows",
            step.name(),
            before,
            current.height()
        );
    }

    info!(
        "Cleaned listings: kept {} of {} rows (price range [{}, {}])",
        current.height(),
        input_rows,
        range.min_price,
        range.max_price
    );
    Ok(current)
}
