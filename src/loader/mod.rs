//! Loading and normalization of uploaded surveillance tables.
//!
//! Parses a delimited-text upload into [`WideRecord`]s: resolves headers
//! against the canonical schema, collapses country-name variants through the
//! alias table, coerces numeric cells (empty or unparseable cells become
//! missing, never zero) and derives per-100K rates. Non-fatal irregularities
//! are counted in a [`QualityReport`] and processing continues; only a
//! missing required column aborts the upload.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::error::util::safe_open_file;
use crate::models::{WideRecord, rate_per_100k};
use crate::schema::{ColumnId, CountryAliases, HeaderMap, resolve_headers};

/// Counts of the non-fatal irregularities observed while loading one upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityReport {
    /// Country names not found in the alias table, passed through unchanged.
    /// Informational only: the record itself is intact, so these do not make
    /// a report un-clean. Most ordinary names are not in the alias table.
    pub unresolved_countries: BTreeSet<String>,
    /// Rows dropped because their year fell outside the configured range
    pub out_of_range_years: usize,
    /// Rows dropped for an empty country or unparseable year
    pub skipped_rows: usize,
    /// Numeric cells that were empty or unparseable and became missing
    pub missing_numeric_cells: usize,
}

impl QualityReport {
    /// Whether the upload loaded without losing or degrading any data.
    /// Unresolved country names are not counted here; they pass through
    /// unchanged and are surfaced via [`QualityReport::summary`] instead.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.out_of_range_years == 0
            && self.skipped_rows == 0
            && self.missing_numeric_cells == 0
    }

    /// Generate a human-readable summary of the report
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Data Quality Summary:\n");
        summary.push_str(&format!(
            "  Unresolved country names: {}\n",
            self.unresolved_countries.len()
        ));
        if !self.unresolved_countries.is_empty() {
            for name in &self.unresolved_countries {
                summary.push_str(&format!("    - {name}\n"));
            }
        }
        summary.push_str(&format!(
            "  Rows outside valid year range: {}\n",
            self.out_of_range_years
        ));
        summary.push_str(&format!("  Rows skipped: {}\n", self.skipped_rows));
        summary.push_str(&format!(
            "  Missing/unparseable numeric cells: {}\n",
            self.missing_numeric_cells
        ));
        summary
    }
}

/// Load normalized wide records from any reader, using the built-in alias table.
pub fn load_wide_from_reader<R: Read>(
    reader: R,
    config: &PipelineConfig,
) -> Result<(Vec<WideRecord>, QualityReport)> {
    load_wide_with_aliases(reader, config, &CountryAliases::default())
}

/// Load normalized wide records from a file path.
pub fn load_wide_from_path(
    path: &Path,
    config: &PipelineConfig,
) -> Result<(Vec<WideRecord>, QualityReport)> {
    let file = safe_open_file(path, "reading surveillance table")?;
    load_wide_from_reader(file, config)
}

/// Load normalized wide records with a caller-supplied alias table.
pub fn load_wide_with_aliases<R: Read>(
    reader: R,
    config: &PipelineConfig,
    aliases: &CountryAliases,
) -> Result<(Vec<WideRecord>, QualityReport)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();
    let header_map = resolve_headers(&headers)?;

    let mut records = Vec::new();
    let mut report = QualityReport::default();
    let (year_lo, year_hi) = config.valid_years;

    for (row_number, row) in csv_reader.records().enumerate() {
        let row = row?;
        let cell = |column: ColumnId| -> &str {
            header_map
                .index_of(column)
                .and_then(|i| row.get(i))
                .unwrap_or("")
        };

        let raw_country = cell(ColumnId::Country);
        if raw_country.is_empty() {
            warn!("row {}: empty country name, skipping", row_number + 2);
            report.skipped_rows += 1;
            continue;
        }

        let Some(year) = parse_year(cell(ColumnId::Year)) else {
            warn!(
                "row {}: unparseable year {:?}, skipping",
                row_number + 2,
                cell(ColumnId::Year)
            );
            report.skipped_rows += 1;
            continue;
        };
        if year < year_lo || year > year_hi {
            debug!("row {}: year {year} outside {year_lo}..={year_hi}", row_number + 2);
            report.out_of_range_years += 1;
            continue;
        }

        let country = match aliases.resolve(raw_country) {
            Some(canonical) => canonical.to_string(),
            None => {
                debug!("unresolved country name: {raw_country:?}");
                report.unresolved_countries.insert(raw_country.to_string());
                raw_country.to_string()
            }
        };

        let measles_cases = parse_numeric(cell(ColumnId::MeaslesCases), &mut report);
        let rubella_cases = parse_numeric(cell(ColumnId::RubellaCases), &mut report);
        let population = parse_numeric(cell(ColumnId::Population), &mut report);

        // Pre-computed rate columns win over derivation when the upload has
        // them; otherwise rates come from cases and population.
        let (measles_per_100k, rubella_per_100k) = if header_map.has_precomputed_rates() {
            (
                parse_numeric(cell(ColumnId::MeaslesPer100k), &mut report),
                parse_numeric(cell(ColumnId::RubellaPer100k), &mut report),
            )
        } else {
            (
                rate_per_100k(measles_cases, population),
                rate_per_100k(rubella_cases, population),
            )
        };

        records.push(WideRecord {
            country,
            region: cell(ColumnId::Region).to_string(),
            year,
            measles_cases,
            rubella_cases,
            population,
            measles_per_100k,
            rubella_per_100k,
        });
    }

    if !report.is_clean() {
        warn!(
            "loaded {} records with irregularities: {} out-of-range, {} skipped, {} missing cells",
            records.len(),
            report.out_of_range_years,
            report.skipped_rows,
            report.missing_numeric_cells
        );
    }
    if !report.unresolved_countries.is_empty() {
        debug!(
            "{} country names not in the alias table, passed through unchanged",
            report.unresolved_countries.len()
        );
    }

    Ok((records, report))
}

fn parse_year(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    // Spreadsheets often export years as floats ("2020.0")
    cell.parse::<i32>()
        .ok()
        .or_else(|| cell.parse::<f64>().ok().filter(|y| y.fract() == 0.0).map(|y| y as i32))
}

/// Coerce a numeric cell. Empty or unparseable cells become missing, never
/// zero, and are counted in the report.
fn parse_numeric(cell: &str, report: &mut QualityReport) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        report.missing_numeric_cells += 1;
        return None;
    }
    match cell.replace(',', "").parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            debug!("unparseable numeric cell: {cell:?}");
            report.missing_numeric_cells += 1;
            None
        }
    }
}
