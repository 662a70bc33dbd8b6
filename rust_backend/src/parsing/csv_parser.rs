use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use crate::core::domain::columns;

/// Field spellings read as missing values. Empty fields are always missing.
pub const NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DAY_NANOS: i64 = 86_400_000_000_000;

/// Header names of a CSV buffer
///
/// Rejects input without a header and headers that repeat a name.
fn read_header(bytes: &[u8]) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);
    let header: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    if header.is_empty() {
        bail!("CSV input has no header");
    }
    let mut seen = HashSet::new();
    for name in &header {
        if !seen.insert(name.as_str()) {
            bail!("Duplicate column name '{}' in CSV header", name);
        }
    }
    Ok(header)
}

/// Dtype overrides pinning the free-text columns present in `header` to String
fn text_overrides(header: &[String]) -> Schema {
    let mut schema = Schema::default();
    for name in header.iter().filter(|h| columns::TEXT.contains(&h.as_str())) {
        schema.with_column(name.as_str().into(), DataType::String);
    }
    schema
}

/// Parse headed CSV bytes into a DataFrame
///
/// Column types are inferred over the whole input. Free-text listing columns
/// stay String even when every value looks like a number, so a host called
/// "Nan" or "Infinity" is read back verbatim.
pub fn read_dataframe(bytes: Vec<u8>) -> Result<DataFrame> {
    let header = read_header(&bytes)?;
    let null_values: Vec<PlSmallStr> = NA_VALUES.iter().map(|v| PlSmallStr::from(*v)).collect();

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_schema_overwrite(Some(Arc::new(text_overrides(&header))))
        .map_parse_options(|opts| {
            opts.with_null_values(Some(NullValues::AllColumns(null_values.clone())))
        })
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("Failed to parse CSV into DataFrame")?;

    Ok(df)
}

/// Parse a CSV file into a DataFrame
pub fn parse_table_csv(csv_path: &Path) -> Result<DataFrame> {
    let bytes = std::fs::read(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;
    read_dataframe(bytes)
        .with_context(|| format!("Failed to parse CSV file {}", csv_path.display()))
}

/// Parse CSV text into a DataFrame
pub fn parse_table_csv_str(content: &str) -> Result<DataFrame> {
    read_dataframe(content.as_bytes().to_vec())
}

/// strftime layout for datetime columns: date only when every value is midnight
fn datetime_format(df: &DataFrame) -> Result<&'static str> {
    for column in df.get_columns() {
        let per_day = match column.dtype() {
            DataType::Datetime(TimeUnit::Nanoseconds, _) => DAY_NANOS,
            DataType::Datetime(TimeUnit::Microseconds, _) => DAY_NANOS / 1_000,
            DataType::Datetime(TimeUnit::Milliseconds, _) => DAY_NANOS / 1_000_000,
            _ => continue,
        };
        let ticks = column.cast(&DataType::Int64)?;
        if ticks
            .i64()?
            .into_iter()
            .flatten()
            .any(|t| t.rem_euclid(per_day) != 0)
        {
            return Ok("%Y-%m-%d %H:%M:%S");
        }
    }
    Ok("%Y-%m-%d")
}

/// Write a DataFrame as headed CSV (no index column, nulls as empty fields)
pub fn write_table<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let mut df = df.clone();
    let format = datetime_format(&df)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_datetime_format(Some(format.to_string()))
        .finish(&mut df)
        .context("Failed to write CSV")
}

/// Write a DataFrame to a CSV file, replacing any existing file
pub fn write_table_csv(df: &DataFrame, csv_path: &Path) -> Result<()> {
    let file = File::create(csv_path)
        .with_context(|| format!("Failed to create CSV file {}", csv_path.display()))?;
    write_table(df, file)
}

/// Render a DataFrame as CSV text
pub fn table_to_csv_string(df: &DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    write_table(df, &mut buffer)?;
    String::from_utf8(buffer).context("CSV output is not valid UTF-8")
}
