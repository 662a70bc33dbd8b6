//! Error types for the cleaning and splitting core.

use polars::prelude::PolarsError;

/// Result type for core table operations
pub type PrepResult<T> = Result<T, PrepError>;

/// Error type for core table operations
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    #[error("Schema error: missing required column(s): {}", .0.join(", "))]
    SchemaError(Vec<String>),

    #[error("Invalid split size: {0}")]
    InvalidSizeError(String),

    #[error("Stratification error: {0}")]
    StratificationError(String),

    #[error("DataFrame error: {0}")]
    FrameError(String),
}

impl PrepError {
    /// Shorthand for a schema error about a single column.
    pub fn missing_column(name: &str) -> Self {
        PrepError::SchemaError(vec![name.to_string()])
    }
}

impl From<PolarsError> for PrepError {
    fn from(err: PolarsError) -> Self {
        PrepError::FrameError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_every_column() {
        let err = PrepError::SchemaError(vec!["price".into(), "room_type".into()]);
        assert_eq!(
            err.to_string(),
            "Schema error: missing required column(s): price, room_type"
        );
    }

    #[test]
    fn test_missing_column_helper() {
        let err = PrepError::missing_column("host_name");
        assert!(matches!(err, PrepError::SchemaError(ref cols) if cols == &["host_name"]));
    }

    #[test]
    fn test_polars_errors_convert() {
        let err: PrepError = PolarsError::ComputeError("boom".into()).into();
        assert!(matches!(err, PrepError::FrameError(ref msg) if msg.contains("boom")));
    }
}
