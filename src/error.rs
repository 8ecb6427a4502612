//! Error types for the accuracy-checker library.

use thiserror::Error;

/// Result type for accuracy-checker operations.
pub type Result<T> = std::result::Result<T, AccuracyError>;

/// Error types that can occur while loading records or decoding network output.
///
/// The metric queries themselves never fail: missing classes and empty
/// denominators fall back to zero-valued results.
#[derive(Error, Debug)]
pub enum AccuracyError {
    /// Error during I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while reading or writing CSV rows.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A ground truth or detection row failed validation.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A threshold outside of [0, 1] or not finite.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Raw network output that does not have the expected layout.
    #[error("Invalid network output: {0}")]
    InvalidOutput(String),
}
