//! Descriptive summary statistics over the wide table.
//!
//! The offline summary report: one row per numeric column with count, mean,
//! sample standard deviation, min and max, computed over non-missing values
//! only. Exported as delimited text like every other table.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::models::WideRecord;

/// Descriptive statistics for one numeric column.
///
/// `count` is the number of non-missing values; the moments are `None` when
/// there is nothing to compute them from (`std_dev` needs at least two
/// values).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    fn compute(column: &str, values: impl Iterator<Item = Option<f64>>) -> Self {
        let present: Vec<f64> = values.flatten().collect();
        let count = present.len();
        let mean = (count > 0).then(|| present.iter().sum::<f64>() / count as f64);
        let std_dev = match (count, mean) {
            (2.., Some(m)) => {
                let variance = present.iter().map(|v| (v - m).powi(2)).sum::<f64>()
                    / (count - 1) as f64;
                Some(variance.sqrt())
            }
            _ => None,
        };
        Self {
            column: column.to_string(),
            count,
            mean,
            std_dev,
            min: present.iter().copied().reduce(f64::min),
            max: present.iter().copied().reduce(f64::max),
        }
    }
}

/// Summarize every numeric column of the wide table, in column order.
#[must_use]
pub fn summarize_wide(records: &[WideRecord]) -> Vec<ColumnSummary> {
    vec![
        ColumnSummary::compute("year", records.iter().map(|r| Some(f64::from(r.year)))),
        ColumnSummary::compute("measles_cases", records.iter().map(|r| r.measles_cases)),
        ColumnSummary::compute("rubella_cases", records.iter().map(|r| r.rubella_cases)),
        ColumnSummary::compute("population", records.iter().map(|r| r.population)),
        ColumnSummary::compute(
            "measles_per_100k",
            records.iter().map(|r| r.measles_per_100k),
        ),
        ColumnSummary::compute(
            "rubella_per_100k",
            records.iter().map(|r| r.rubella_per_100k),
        ),
    ]
}

/// Write column summaries as CSV with a header row.
pub fn write_summary_csv<W: Write>(writer: W, summaries: &[ColumnSummary]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for summary in summaries {
        csv_writer.serialize(summary)?;
    }
    csv_writer.flush()?;
    Ok(())
}
