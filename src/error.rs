//! Library error type

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported page data in {origin}: {message}")]
    InvalidInput { origin: String, message: String },

    #[error("PageSpeed Insights error: {0}")]
    PageSpeed(String),

    #[error("Google Trends error: {0}")]
    Trends(String),

    #[cfg(any(feature = "pagespeed", feature = "trends"))]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AuditError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AuditError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        AuditError::Json {
            origin: origin.into(),
            source,
        }
    }

    pub fn invalid_input(origin: impl Into<String>, message: impl Into<String>) -> Self {
        AuditError::InvalidInput {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
