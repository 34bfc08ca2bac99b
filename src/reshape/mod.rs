//! Reshaping between wide, long and joint table layouts.
//!
//! `wide_to_long` unpivots the two disease columns into separate rows.
//! `pivot_joint` is the distinct re-pivot used by the joint anomaly model:
//! it folds the two long rows of a country-year back into one feature row
//! while remembering which source rows it came from, so scores can be
//! written back without losing alignment.

use rustc_hash::FxHashMap;

use crate::models::{Disease, EnrichedRecord, LongRecord, WideRecord};

/// Unpivot wide records into long records.
///
/// Emits exactly two long records per wide record, in input order, with
/// measles before rubella for each source row. Downstream grouping and the
/// test fixtures rely on this order being reproducible.
#[must_use]
pub fn wide_to_long(wide: &[WideRecord]) -> Vec<LongRecord> {
    let mut long = Vec::with_capacity(wide.len() * 2);
    for record in wide {
        for disease in Disease::ALL {
            long.push(LongRecord {
                country: record.country.clone(),
                region: record.region.clone(),
                year: record.year,
                disease,
                cases: record.cases(disease),
                cases_per_100k: record.rate(disease),
            });
        }
    }
    long
}

/// One country-year feature row for the joint anomaly model.
#[derive(Debug, Clone, PartialEq)]
pub struct JointRow {
    pub country: String,
    pub year: i32,
    /// Feature vector: both diseases' rates, plus both growth values when
    /// the scorer is configured to include growth
    pub features: Vec<f64>,
    /// Indices into the source enriched table that this row's score applies to
    pub members: Vec<usize>,
}

/// Re-pivot enriched long records into joint country-year feature rows.
///
/// A joint row is produced only for country-years where both diseases are
/// present with all required features; other records stay unscored. Output
/// order follows the first appearance of each country-year in the input.
#[must_use]
pub fn pivot_joint(records: &[EnrichedRecord], include_growth: bool) -> Vec<JointRow> {
    struct Pair {
        measles: Option<usize>,
        rubella: Option<usize>,
    }

    let mut order: Vec<(String, i32)> = Vec::new();
    let mut pairs: FxHashMap<(String, i32), Pair> = FxHashMap::default();

    for (idx, record) in records.iter().enumerate() {
        let key = (record.country.clone(), record.year);
        let pair = pairs.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Pair {
                measles: None,
                rubella: None,
            }
        });
        let slot = match record.disease {
            Disease::Measles => &mut pair.measles,
            Disease::Rubella => &mut pair.rubella,
        };
        // First record wins on (unexpected) duplicates
        if slot.is_none() {
            *slot = Some(idx);
        }
    }

    let mut rows = Vec::new();
    for key in order {
        let pair = &pairs[&key];
        let (Some(m_idx), Some(r_idx)) = (pair.measles, pair.rubella) else {
            continue;
        };
        let Some(features) =
            joint_features(&records[m_idx], &records[r_idx], include_growth)
        else {
            continue;
        };
        rows.push(JointRow {
            country: key.0,
            year: key.1,
            features,
            members: vec![m_idx, r_idx],
        });
    }
    rows
}

fn joint_features(
    measles: &EnrichedRecord,
    rubella: &EnrichedRecord,
    include_growth: bool,
) -> Option<Vec<f64>> {
    let mut features = vec![measles.cases_per_100k?, rubella.cases_per_100k?];
    if include_growth {
        features.push(measles.yoy_growth_pct?);
        features.push(rubella.yoy_growth_pct?);
    }
    Some(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(country: &str, year: i32, measles: Option<f64>, rubella: Option<f64>) -> WideRecord {
        WideRecord {
            country: country.to_string(),
            region: "Africa".to_string(),
            year,
            measles_cases: measles,
            rubella_cases: rubella,
            population: Some(1_000_000.0),
            measles_per_100k: measles.map(|c| c / 10.0),
            rubella_per_100k: rubella.map(|c| c / 10.0),
        }
    }

    fn enriched(
        country: &str,
        year: i32,
        disease: Disease,
        rate: Option<f64>,
        growth: Option<f64>,
    ) -> EnrichedRecord {
        EnrichedRecord {
            country: country.to_string(),
            region: "Africa".to_string(),
            year,
            disease,
            cases: rate,
            cases_per_100k: rate,
            rolling_avg_3: None,
            rolling_avg_5: None,
            rolling_avg_7: None,
            yoy_growth_pct: growth,
        }
    }

    #[test]
    fn test_output_is_twice_input_in_fixed_order() {
        let wide_rows = vec![wide("Angola", 2020, Some(10.0), Some(5.0)),
                             wide("Benin", 2020, Some(3.0), Some(1.0))];
        let long = wide_to_long(&wide_rows);

        assert_eq!(long.len(), 4);
        assert_eq!(long[0].disease, Disease::Measles);
        assert_eq!(long[1].disease, Disease::Rubella);
        assert_eq!(long[0].country, "Angola");
        assert_eq!(long[2].country, "Benin");
        assert_eq!(long[2].disease, Disease::Measles);
    }

    #[test]
    fn test_long_rows_recover_wide_values() {
        let wide_rows = vec![wide("Angola", 2020, Some(10.0), Some(5.0))];
        let long = wide_to_long(&wide_rows);

        assert_eq!(long[0].cases, Some(10.0));
        assert_eq!(long[0].cases_per_100k, Some(1.0));
        assert_eq!(long[1].cases, Some(5.0));
        assert_eq!(long[1].cases_per_100k, Some(0.5));
        assert!(long.iter().all(|r| r.year == 2020 && r.country == "Angola"));
    }

    #[test]
    fn test_joint_pivot_preserves_alignment() {
        let records = vec![
            enriched("Angola", 2020, Disease::Measles, Some(1.0), None),
            enriched("Angola", 2020, Disease::Rubella, Some(0.5), None),
            enriched("Angola", 2021, Disease::Measles, Some(2.0), None),
            enriched("Angola", 2021, Disease::Rubella, Some(0.7), None),
        ];
        let rows = pivot_joint(&records, false);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2020);
        assert_eq!(rows[0].features, vec![1.0, 0.5]);
        assert_eq!(rows[0].members, vec![0, 1]);
        assert_eq!(rows[1].members, vec![2, 3]);
    }

    #[test]
    fn test_joint_pivot_skips_incomplete_country_years() {
        let records = vec![
            enriched("Angola", 2020, Disease::Measles, Some(1.0), None),
            enriched("Angola", 2020, Disease::Rubella, None, None),
            enriched("Benin", 2020, Disease::Measles, Some(1.0), None),
        ];
        assert!(pivot_joint(&records, false).is_empty());
    }

    #[test]
    fn test_joint_pivot_with_growth_requires_growth_features() {
        let records = vec![
            enriched("Angola", 2021, Disease::Measles, Some(2.0), Some(100.0)),
            enriched("Angola", 2021, Disease::Rubella, Some(0.7), Some(40.0)),
            enriched("Angola", 2020, Disease::Measles, Some(1.0), None),
            enriched("Angola", 2020, Disease::Rubella, Some(0.5), None),
        ];
        let rows = pivot_joint(&records, true);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].features, vec![2.0, 0.7, 100.0, 40.0]);
    }
}
