//! Export of enriched and scored tables as delimited text.
//!
//! The downloadable-dataset path: whatever table the filter produced goes
//! back out as CSV with every computed column preserved. Missing values
//! serialize as empty cells. Output is byte-identical for identical input
//! and configuration, which the determinism tests rely on.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::models::{EnrichedRecord, ScoredRecord};

/// Write enriched records as CSV with a header row.
pub fn write_enriched_csv<W: Write>(writer: W, records: &[EnrichedRecord]) -> Result<()> {
    write_csv(writer, records)
}

/// Write scored records as CSV with a header row.
pub fn write_scored_csv<W: Write>(writer: W, records: &[ScoredRecord]) -> Result<()> {
    write_csv(writer, records)
}

/// Render scored records to an in-memory CSV buffer.
pub fn scored_csv_bytes(records: &[ScoredRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_scored_csv(&mut buffer, records)?;
    Ok(buffer)
}

fn write_csv<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
