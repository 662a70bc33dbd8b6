use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use crate::parsing::csv_parser;
use crate::parsing::json_parser;

/// Represents the source format of a listings file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSourceType {
    Json,
    Csv,
}

impl TableSourceType {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .with_context(|| format!("File has no extension: {}", path.display()))?;

        match extension.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }
}

/// Result of loading a listings file
#[derive(Debug)]
pub struct TableLoadResult {
    pub dataframe: DataFrame,
    pub source_type: TableSourceType,
    pub num_rows: usize,
}

impl TableLoadResult {
    pub fn new(dataframe: DataFrame, source_type: TableSourceType) -> Self {
        let num_rows = dataframe.height();
        Self {
            dataframe,
            source_type,
            num_rows,
        }
    }
}

/// Unified interface for loading and saving listings DataFrames
pub struct TableLoader;

impl TableLoader {
    /// Load listings from a file (auto-detects JSON or CSV)
    pub fn load_from_file(path: &Path) -> Result<TableLoadResult> {
        match TableSourceType::from_path(path)? {
            TableSourceType::Json => Self::load_from_json(path),
            TableSourceType::Csv => Self::load_from_csv(path),
        }
    }

    /// Load listings from a JSON file
    pub fn load_from_json(json_path: &Path) -> Result<TableLoadResult> {
        let df = json_parser::parse_table_json(json_path).context("Failed to parse JSON file")?;
        Ok(TableLoadResult::new(df, TableSourceType::Json))
    }

    /// Load listings from a JSON string
    pub fn load_from_json_str(json_str: &str) -> Result<TableLoadResult> {
        let df =
            json_parser::parse_table_json_str(json_str).context("Failed to parse JSON string")?;
        Ok(TableLoadResult::new(df, TableSourceType::Json))
    }

    /// Load listings from a CSV file
    pub fn load_from_csv(csv_path: &Path) -> Result<TableLoadResult> {
        let df = csv_parser::parse_table_csv(csv_path).context("Failed to parse CSV file")?;
        Ok(TableLoadResult::new(df, TableSourceType::Csv))
    }

    /// Save a DataFrame as CSV, creating parent directories as needed
    pub fn save_csv(df: &DataFrame, csv_path: &Path) -> Result<()> {
        if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        csv_parser::write_table_csv(df, csv_path)
    }
}
