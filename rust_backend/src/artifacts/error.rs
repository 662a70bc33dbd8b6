//! Error types for artifact store operations.

/// Result type for artifact store operations
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Error type for artifact store operations
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid artifact reference: {0}")]
    InvalidReference(String),

    #[error("Artifact validation error: {0}")]
    ValidationError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for ArtifactError {
    fn from(err: std::io::Error) -> Self {
        ArtifactError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ArtifactError {
    fn from(err: serde_json::Error) -> Self {
        ArtifactError::SerializationError(err.to_string())
    }
}

impl From<String> for ArtifactError {
    fn from(s: String) -> Self {
        ArtifactError::InternalError(s)
    }
}

impl From<&str> for ArtifactError {
    fn from(s: &str) -> Self {
        ArtifactError::InternalError(s.to_string())
    }
}
