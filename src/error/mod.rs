//! Error handling for the surveillance pipeline.
//!
//! Only `Schema`, `Config`, `Io` and `Csv` errors abort a pipeline run.
//! `InsufficientData` is constructed for group-scoped shortfalls and logged
//! by the caller, which then degrades the affected outputs to
//! missing/unscored; it never aborts other groups.

pub mod util;

/// Specialized error type for the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing delimited-text data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required columns absent from the uploaded table; fatal for the upload
    #[error(
        "schema error: missing required column(s): {}; accepted headers: {}",
        .missing.join(", "),
        .expected.join("; ")
    )]
    Schema {
        /// Canonical names of the missing columns
        missing: Vec<String>,
        /// Accepted header spellings for each missing column
        expected: Vec<String>,
    },

    /// Invalid pipeline or scorer configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A group has too few data points for the requested computation
    #[error("insufficient data for {scope}: {needed} points required, {available} available")]
    InsufficientData {
        scope: String,
        needed: usize,
        available: usize,
    },

    /// Error serializing a configuration snapshot
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
