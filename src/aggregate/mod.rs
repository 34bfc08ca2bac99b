//! Rolling-window and year-over-year enrichment.
//!
//! Records are grouped by (country, disease) and processed in ascending year
//! order within each group; the sort is load-bearing, rolling and YoY math
//! is meaningless on unsorted years. Output order and cardinality match the
//! input: computed columns are written back to each record's original
//! position.

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::models::{Disease, EnrichedRecord, LongRecord};

/// Trailing window sizes computed for every record.
pub const ROLLING_WINDOWS: [usize; 3] = [3, 5, 7];

/// Enrich long records with rolling averages and YoY growth.
///
/// Rolling average of window `w` at a row = mean of the non-missing
/// `cases_per_100k` values over the up-to-`w` most recent rows of the sorted
/// group ending at that row. Early rows use however many rows exist
/// (partial windows are policy, not an error); a window with only missing
/// values yields missing.
///
/// YoY growth = `(v[Y] - v[Y-1]) / v[Y-1] * 100`, only when calendar year
/// `Y-1` is present in the group with a non-missing, non-zero value;
/// otherwise missing. Never a division error or infinity.
#[must_use]
pub fn enrich(long: &[LongRecord]) -> Vec<EnrichedRecord> {
    let mut groups: FxHashMap<(&str, Disease), Vec<usize>> = FxHashMap::default();
    for (idx, record) in long.iter().enumerate() {
        groups
            .entry((record.country.as_str(), record.disease))
            .or_default()
            .push(idx);
    }

    let mut enriched: Vec<Option<EnrichedRecord>> = vec![None; long.len()];

    for indices in groups.into_values() {
        // Stable on (year, input position) so duplicate years cannot make
        // output depend on hash-map iteration order
        let sorted: Vec<usize> = indices
            .into_iter()
            .sorted_by_key(|&i| (long[i].year, i))
            .collect();
        let values: Vec<Option<f64>> = sorted
            .iter()
            .map(|&i| long[i].cases_per_100k)
            .collect();

        for (pos, &idx) in sorted.iter().enumerate() {
            let record = &long[idx];
            let [rolling_avg_3, rolling_avg_5, rolling_avg_7] =
                ROLLING_WINDOWS.map(|w| trailing_mean(&values, pos, w));
            let yoy_growth_pct = yoy_growth(&sorted, &values, long, pos);

            enriched[idx] = Some(EnrichedRecord {
                country: record.country.clone(),
                region: record.region.clone(),
                year: record.year,
                disease: record.disease,
                cases: record.cases,
                cases_per_100k: record.cases_per_100k,
                rolling_avg_3,
                rolling_avg_5,
                rolling_avg_7,
                yoy_growth_pct,
            });
        }
    }

    // Every input index belongs to exactly one group
    enriched.into_iter().flatten().collect()
}

/// Mean of the non-missing values in the trailing window of size `window`
/// ending at `pos` inclusive.
fn trailing_mean(values: &[Option<f64>], pos: usize, window: usize) -> Option<f64> {
    let start = (pos + 1).saturating_sub(window);
    let present: Vec<f64> = values[start..=pos].iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

fn yoy_growth(
    sorted: &[usize],
    values: &[Option<f64>],
    long: &[LongRecord],
    pos: usize,
) -> Option<f64> {
    if pos == 0 {
        return None;
    }
    let year = long[sorted[pos]].year;
    let prior_year = long[sorted[pos - 1]].year;
    if prior_year != year - 1 {
        return None;
    }
    let current = values[pos]?;
    let prior = values[pos - 1]?;
    if prior == 0.0 {
        return None;
    }
    Some((current - prior) / prior * 100.0)
}
