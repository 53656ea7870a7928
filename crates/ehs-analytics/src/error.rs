//! Custom error types for the asset generation pipeline.
//!
//! This module provides the crate-wide error hierarchy using `thiserror`.
//! Missing input files and absent columns are NOT errors — those degrade
//! inside the pipeline stages. Errors here are the conditions that abort a
//! run: unreadable files, malformed CSV, failed renders, failed writes.

use thiserror::Error;

/// The main error type for the asset generation pipeline.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Chart rendering failed.
    #[error("Failed to render chart '{chart}': {reason}")]
    ChartRender { chart: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
