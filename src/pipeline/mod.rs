//! End-to-end pipeline orchestration.
//!
//! One call runs an uploaded table through every stage in order:
//! load/normalize → reshape → enrich → score. Each stage produces a new
//! owned table and all of them are returned, since the presentation layer
//! consumes different stages for different views (the wide table for the
//! preview, the enriched table for charts, the scored tables for the
//! anomaly view).

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::aggregate::enrich;
use crate::anomaly::{ScoredTables, score_all};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::error::util::safe_open_file;
use crate::loader::{QualityReport, load_wide_from_reader};
use crate::models::{EnrichedRecord, LongRecord, WideRecord};
use crate::reshape::wide_to_long;

/// Every table produced by one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub wide: Vec<WideRecord>,
    pub long: Vec<LongRecord>,
    pub enriched: Vec<EnrichedRecord>,
    /// `None` when scoring is disabled in the configuration
    pub scored: Option<ScoredTables>,
    pub quality: QualityReport,
}

/// Run the full pipeline over a delimited-text upload.
///
/// Fatal errors (unreadable input, missing required columns, invalid
/// configuration) abort before any output is produced; all other
/// irregularities degrade record-by-record to missing/unscored and are
/// reported in [`PipelineOutput::quality`].
pub fn run_from_reader<R: Read>(reader: R, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let start = Instant::now();

    let (wide, quality) = load_wide_from_reader(reader, config)?;
    debug!("loaded {} wide records in {:?}", wide.len(), start.elapsed());

    let long = wide_to_long(&wide);
    let enriched = enrich(&long);

    let scored = match &config.scoring {
        Some(scorer_config) => {
            let scoring_start = Instant::now();
            let tables = score_all(&enriched, scorer_config)?;
            debug!("scored 3 models in {:?}", scoring_start.elapsed());
            Some(tables)
        }
        None => None,
    };

    info!(
        "pipeline run: {} wide -> {} long records in {:?}",
        wide.len(),
        long.len(),
        start.elapsed()
    );

    Ok(PipelineOutput {
        wide,
        long,
        enriched,
        scored,
        quality,
    })
}

/// Run the full pipeline over an in-memory upload.
pub fn run_from_bytes(bytes: &[u8], config: &PipelineConfig) -> Result<PipelineOutput> {
    run_from_reader(bytes, config)
}

/// Run the full pipeline over a file on disk.
pub fn run_from_path(path: &Path, config: &PipelineConfig) -> Result<PipelineOutput> {
    let file = safe_open_file(path, "running surveillance pipeline")?;
    run_from_reader(file, config)
}
