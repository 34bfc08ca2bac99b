//! Domain model for country-year disease surveillance tables.
//!
//! Each pipeline stage consumes one record type and produces the next:
//! `WideRecord` (as uploaded) → `LongRecord` (one row per disease) →
//! `EnrichedRecord` (rolling/YoY columns) → `ScoredRecord` (anomaly output).
//! Missing values are `Option<f64>` everywhere; zero is a valid case count
//! and is never conflated with missing.

use serde::{Deserialize, Serialize};

/// The diseases tracked by the surveillance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disease {
    Measles,
    Rubella,
}

impl Disease {
    /// All diseases in the fixed unpivot order (measles first).
    ///
    /// The reshaper and the joint pivot both rely on this order being
    /// stable across runs.
    pub const ALL: [Self; 2] = [Self::Measles, Self::Rubella];

    /// Lowercase label used in exported tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Measles => "measles",
            Self::Rubella => "rubella",
        }
    }
}

impl std::fmt::Display for Disease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rolling-average window sizes supported by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowSize {
    W3,
    W5,
    W7,
}

impl WindowSize {
    /// Window length in years.
    #[must_use]
    pub const fn years(self) -> usize {
        match self {
            Self::W3 => 3,
            Self::W5 => 5,
            Self::W7 => 7,
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::W3
    }
}

/// One uploaded row, normalized: canonical country name, coerced numerics,
/// derived per-100K rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideRecord {
    pub country: String,
    pub region: String,
    pub year: i32,
    pub measles_cases: Option<f64>,
    pub rubella_cases: Option<f64>,
    pub population: Option<f64>,
    pub measles_per_100k: Option<f64>,
    pub rubella_per_100k: Option<f64>,
}

impl WideRecord {
    /// Case count for the given disease.
    #[must_use]
    pub const fn cases(&self, disease: Disease) -> Option<f64> {
        match disease {
            Disease::Measles => self.measles_cases,
            Disease::Rubella => self.rubella_cases,
        }
    }

    /// Per-100K rate for the given disease.
    #[must_use]
    pub const fn rate(&self, disease: Disease) -> Option<f64> {
        match disease {
            Disease::Measles => self.measles_per_100k,
            Disease::Rubella => self.rubella_per_100k,
        }
    }
}

/// One row per country-year-disease, produced by the reshaper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub country: String,
    pub region: String,
    pub year: i32,
    pub disease: Disease,
    pub cases: Option<f64>,
    pub cases_per_100k: Option<f64>,
}

/// Long record plus the aggregator's computed columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub country: String,
    pub region: String,
    pub year: i32,
    pub disease: Disease,
    pub cases: Option<f64>,
    pub cases_per_100k: Option<f64>,
    pub rolling_avg_3: Option<f64>,
    pub rolling_avg_5: Option<f64>,
    pub rolling_avg_7: Option<f64>,
    pub yoy_growth_pct: Option<f64>,
}

impl EnrichedRecord {
    /// The rolling-average column matching the given window selector.
    #[must_use]
    pub const fn rolling_avg(&self, window: WindowSize) -> Option<f64> {
        match window {
            WindowSize::W3 => self.rolling_avg_3,
            WindowSize::W5 => self.rolling_avg_5,
            WindowSize::W7 => self.rolling_avg_7,
        }
    }
}

/// Anomaly classification emitted by the scorer.
///
/// `Unscored` marks records excluded from model fitting (out of the model's
/// disease scope, or missing a required feature); they are kept in the table
/// rather than dropped so output cardinality always matches input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyLabel {
    Normal,
    Anomaly,
    Unscored,
}

/// Enriched record plus anomaly output for one fitted model.
///
/// Score polarity follows the usual isolation-forest convention: lower
/// (more negative) scores are more anomalous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub country: String,
    pub region: String,
    pub year: i32,
    pub disease: Disease,
    pub cases: Option<f64>,
    pub cases_per_100k: Option<f64>,
    pub rolling_avg_3: Option<f64>,
    pub rolling_avg_5: Option<f64>,
    pub rolling_avg_7: Option<f64>,
    pub yoy_growth_pct: Option<f64>,
    pub anomaly_label: AnomalyLabel,
    pub anomaly_score: Option<f64>,
}

impl ScoredRecord {
    /// An unscored copy of an enriched record, the scorer's starting point
    /// for every row.
    #[must_use]
    pub fn unscored(record: &EnrichedRecord) -> Self {
        Self {
            country: record.country.clone(),
            region: record.region.clone(),
            year: record.year,
            disease: record.disease,
            cases: record.cases,
            cases_per_100k: record.cases_per_100k,
            rolling_avg_3: record.rolling_avg_3,
            rolling_avg_5: record.rolling_avg_5,
            rolling_avg_7: record.rolling_avg_7,
            yoy_growth_pct: record.yoy_growth_pct,
            anomaly_label: AnomalyLabel::Unscored,
            anomaly_score: None,
        }
    }
}

/// Per-100K case rate, or `None` when either input is missing or the
/// population is not strictly positive. Never infinity, never an error.
#[must_use]
pub fn rate_per_100k(cases: Option<f64>, population: Option<f64>) -> Option<f64> {
    match (cases, population) {
        (Some(c), Some(p)) if p > 0.0 => Some(c / p * 100_000.0),
        _ => None,
    }
}

/// Common read-only view over long, enriched and scored rows, used by the
/// table filter.
pub trait TableRow {
    fn country(&self) -> &str;
    fn region(&self) -> &str;
    fn year(&self) -> i32;
    fn disease(&self) -> Disease;
}

macro_rules! impl_table_row {
    ($($ty:ty),+) => {
        $(impl TableRow for $ty {
            fn country(&self) -> &str {
                &self.country
            }

            fn region(&self) -> &str {
                &self.region
            }

            fn year(&self) -> i32 {
                self.year
            }

            fn disease(&self) -> Disease {
                self.disease
            }
        })+
    };
}

impl_table_row!(LongRecord, EnrichedRecord, ScoredRecord);
