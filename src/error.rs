//! Error types for trialscope

use thiserror::Error;

/// Errors that can occur while extracting metrics from a recording
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("State topic not found in records: {0}")]
    MissingTopic(String),

    #[error("Failed to parse record: {0}")]
    ParseError(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Notebook access error: {0}")]
    NotebookError(String),
}
