use polars::prelude::*;

use crate::core::{PrepError, PrepResult};
use crate::parsing::dates::parse_timestamp;

/// A column that must exist, or a schema error naming it
pub(crate) fn require_column<'a>(df: &'a DataFrame, column: &str) -> PrepResult<&'a Column> {
    df.column(column)
        .map_err(|_| PrepError::missing_column(column))
}

/// Keep the rows for which `predicate` is true; null counts as false
fn filter_with(df: &DataFrame, predicate: Expr) -> PrepResult<DataFrame> {
    Ok(df.clone().lazy().filter(predicate).collect()?)
}

/// Numeric view of a column; text that is not a number becomes null
fn numeric(column: &str) -> Expr {
    col(column).cast(DataType::Float64)
}

/// Keep rows whose column value equals `value` (exact, case-sensitive string match)
pub fn filter_by_column(df: &DataFrame, column: &str, value: &str) -> PrepResult<DataFrame> {
    require_column(df, column)?;
    filter_with(df, col(column).cast(DataType::String).eq(lit(value)))
}

/// Keep rows whose numeric value lies in `[min_value, max_value]`
///
/// Non-numeric and missing values never satisfy the range.
pub fn filter_by_range(
    df: &DataFrame,
    column: &str,
    min_value: f64,
    max_value: f64,
) -> PrepResult<DataFrame> {
    filter_by_ranges(df, &[(column, min_value, max_value)])
}

/// Keep rows that satisfy every inclusive `(column, min, max)` range at once
pub fn filter_by_ranges(df: &DataFrame, ranges: &[(&str, f64, f64)]) -> PrepResult<DataFrame> {
    for &(column, _, _) in ranges {
        require_column(df, column)?;
    }

    let predicate = ranges
        .iter()
        .map(|&(column, lo, hi)| numeric(column).is_between(lit(lo), lit(hi), ClosedInterval::Both))
        .reduce(|acc, expr| acc.and(expr));

    match predicate {
        Some(predicate) => filter_with(df, predicate),
        None => Ok(df.clone()),
    }
}

/// Keep rows whose numeric value is strictly greater than `threshold`
pub fn filter_greater_than(df: &DataFrame, column: &str, threshold: f64) -> PrepResult<DataFrame> {
    require_column(df, column)?;
    filter_with(df, numeric(column).gt(lit(threshold)))
}

/// Drop rows where the column is null
pub fn drop_nulls(df: &DataFrame, column: &str) -> PrepResult<DataFrame> {
    let mask = require_column(df, column)?.is_not_null();
    Ok(df.filter(&mask)?)
}

/// Rewrite a column as microsecond timestamps; values that cannot be parsed
/// become null
///
/// Datetime columns pass through unchanged and date columns are widened to
/// midnight. Any other non-text column becomes entirely null.
pub fn parse_datetime_column(df: &DataFrame, column: &str) -> PrepResult<DataFrame> {
    let source = require_column(df, column)?;
    let name = source.name().clone();

    let parsed = match source.dtype() {
        DataType::Datetime(_, _) => return Ok(df.clone()),
        DataType::Date => source
            .as_materialized_series()
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?,
        DataType::String => {
            let micros = source
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_timestamp).map(|ts| ts.and_utc().timestamp_micros()));
            Int64Chunked::from_iter_options(name, micros)
                .into_datetime(TimeUnit::Microseconds, None)
                .into_series()
        }
        _ => Int64Chunked::full_null(name, source.len())
            .into_datetime(TimeUnit::Microseconds, None)
            .into_series(),
    };

    let mut out = df.clone();
    out.with_column(parsed)?;
    Ok(out)
}
