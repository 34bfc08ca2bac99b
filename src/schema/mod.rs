//! Schema resolution for uploaded tables.
//!
//! Maps source column headers onto the canonical field set, tolerating case,
//! whitespace and separator differences, and validates that every required
//! column is present before any row is parsed.

pub mod aliases;

pub use aliases::{ALIAS_TABLE_VERSION, CountryAliases};

use rustc_hash::FxHashMap;

use crate::error::{PipelineError, Result};

/// Canonical columns of the surveillance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnId {
    Country,
    Region,
    Year,
    MeaslesCases,
    RubellaCases,
    Population,
    /// Optional pre-computed rate; derived from population when absent
    MeaslesPer100k,
    /// Optional pre-computed rate; derived from population when absent
    RubellaPer100k,
}

impl ColumnId {
    /// Columns that must be present for the upload to be processable.
    pub const REQUIRED: [Self; 6] = [
        Self::Country,
        Self::Region,
        Self::Year,
        Self::MeaslesCases,
        Self::RubellaCases,
        Self::Population,
    ];

    /// Optional columns picked up when present.
    pub const OPTIONAL: [Self; 2] = [Self::MeaslesPer100k, Self::RubellaPer100k];

    /// Canonical field name.
    #[must_use]
    pub const fn canonical(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Region => "region",
            Self::Year => "year",
            Self::MeaslesCases => "measles_cases",
            Self::RubellaCases => "rubella_cases",
            Self::Population => "population",
            Self::MeaslesPer100k => "measles_per_100k",
            Self::RubellaPer100k => "rubella_per_100k",
        }
    }

    /// Accepted header spellings, in normalized form (see [`normalize_header`]).
    #[must_use]
    pub const fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::Country => &["country", "country_name"],
            Self::Region => &["region", "region_name", "who_region"],
            Self::Year => &["year"],
            Self::MeaslesCases => &["measles_cases", "measles", "measles_case_count"],
            Self::RubellaCases => &["rubella_cases", "rubella", "rubella_case_count"],
            Self::Population => &["population", "total_population", "pop"],
            Self::MeaslesPer100k => &[
                "measles_cases_per_100k",
                "measles_per_100k",
                "measles_per100k",
            ],
            Self::RubellaPer100k => &[
                "rubella_cases_per_100k",
                "rubella_per_100k",
                "rubella_per100k",
            ],
        }
    }
}

/// Resolved mapping from canonical columns to positions in the uploaded header row.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    indices: FxHashMap<ColumnId, usize>,
}

impl HeaderMap {
    /// Position of the given column in the source row, if the column was found.
    #[must_use]
    pub fn index_of(&self, column: ColumnId) -> Option<usize> {
        self.indices.get(&column).copied()
    }

    /// Whether the upload carried its own pre-computed per-100K columns.
    #[must_use]
    pub fn has_precomputed_rates(&self) -> bool {
        self.indices.contains_key(&ColumnId::MeaslesPer100k)
            && self.indices.contains_key(&ColumnId::RubellaPer100k)
    }
}

/// Normalize a source header for synonym matching: lowercase, with runs of
/// non-alphanumeric characters collapsed to a single underscore.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Resolve a header row against the canonical column set.
///
/// The first header matching a column's synonym list wins; later duplicates
/// are ignored with a debug log. Missing required columns are fatal and the
/// error names both the missing canonical fields and the spellings that
/// would have been accepted.
pub fn resolve_headers(headers: &[String]) -> Result<HeaderMap> {
    let mut indices = FxHashMap::default();

    for (pos, raw) in headers.iter().enumerate() {
        let normalized = normalize_header(raw);
        let all = ColumnId::REQUIRED.iter().chain(ColumnId::OPTIONAL.iter());
        for &column in all {
            if column.synonyms().contains(&normalized.as_str()) {
                if indices.contains_key(&column) {
                    log::debug!(
                        "duplicate header {raw:?} for column {}, keeping first occurrence",
                        column.canonical()
                    );
                } else {
                    indices.insert(column, pos);
                }
                break;
            }
        }
    }

    let missing: Vec<ColumnId> = ColumnId::REQUIRED
        .iter()
        .copied()
        .filter(|c| !indices.contains_key(c))
        .collect();

    if missing.is_empty() {
        Ok(HeaderMap { indices })
    } else {
        Err(PipelineError::Schema {
            missing: missing.iter().map(|c| c.canonical().to_string()).collect(),
            expected: missing
                .iter()
                .map(|c| format!("{}: {}", c.canonical(), c.synonyms().join(" | ")))
                .collect(),
        })
    }
}
