//! Common error types for the archive pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for archive pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types across the archive tooling
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding/decoding error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required input file does not exist
    #[error("Missing {label}: {}", path.display())]
    MissingInput { label: &'static str, path: PathBuf },

    /// Side file exists but is not a JSON object keyed by figure id
    #[error("Invalid side file {}: {reason}", path.display())]
    InvalidSidecar { path: PathBuf, reason: String },
}
