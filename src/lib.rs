//! A Rust library for transforming and anomaly-scoring country-year disease
//! surveillance tables: normalization, wide-to-long reshaping, rolling-window
//! and year-over-year enrichment, isolation-forest outlier scoring, filtering
//! and delimited-text export.

pub mod aggregate;
pub mod anomaly;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod reshape;
pub mod schema;
pub mod stats;

// Re-export the most common types for easier use
// Core types
pub use config::{PipelineConfig, ScorerConfig};
pub use error::{PipelineError, Result};
pub use models::{
    AnomalyLabel, Disease, EnrichedRecord, LongRecord, ScoredRecord, WideRecord, WindowSize,
};

// Pipeline stages
pub use aggregate::{ROLLING_WINDOWS, enrich};
pub use anomaly::{ModelKind, ScoredTables, score_all, score_records};
pub use loader::{QualityReport, load_wide_from_path, load_wide_from_reader};
pub use pipeline::{PipelineOutput, run_from_bytes, run_from_path, run_from_reader};
pub use reshape::{pivot_joint, wide_to_long};

// Filtering, export and memoization
pub use cache::PipelineCache;
pub use export::{scored_csv_bytes, write_enriched_csv, write_scored_csv};
pub use filter::{DiseaseSelection, TableFilter};
pub use schema::{CountryAliases, resolve_headers};
pub use stats::{ColumnSummary, summarize_wide, write_summary_csv};
