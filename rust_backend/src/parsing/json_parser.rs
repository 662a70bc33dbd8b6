use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde_json::Value as JsonValue;
use std::io::Cursor;
use std::path::Path;

/// Parse a JSON array of flat records into a DataFrame
///
/// Columns are the union of record keys; a record lacking a key gets a null
/// in that column. Column types are inferred over every record.
pub fn parse_table_json_str(json_str: &str) -> Result<DataFrame> {
    let parsed: JsonValue = serde_json::from_str(json_str).context("Invalid JSON")?;
    let records = match &parsed {
        JsonValue::Array(records) => records,
        _ => bail!("Expected a JSON array of records"),
    };
    if let Some(i) = records.iter().position(|r| !r.is_object()) {
        bail!("Record {} is not a JSON object", i);
    }
    if records.is_empty() {
        return Ok(DataFrame::empty());
    }

    JsonReader::new(Cursor::new(json_str.as_bytes()))
        .infer_schema_len(None)
        .finish()
        .context("Failed to build DataFrame from JSON records")
}

/// Parse a JSON records file into a DataFrame
pub fn parse_table_json(json_path: &Path) -> Result<DataFrame> {
    let content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file {}", json_path.display()))?;
    parse_table_json_str(&content)
        .with_context(|| format!("Failed to parse JSON file {}", json_path.display()))
}
