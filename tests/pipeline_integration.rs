//! End-to-end tests over the public pipeline API.

use epi_pipeline::{
    AnomalyLabel, Disease, DiseaseSelection, PipelineCache, PipelineConfig, PipelineError,
    ScorerConfig, TableFilter, run_from_bytes, scored_csv_bytes, summarize_wide,
};

const HEADER: &str = "Region,Country,Year,Measles_Cases,Rubella_Cases,Population";

fn config_with_seed(seed: u64) -> PipelineConfig {
    PipelineConfig {
        scoring: Some(ScorerConfig {
            random_seed: Some(seed),
            ..ScorerConfig::default()
        }),
        ..PipelineConfig::default()
    }
}

/// Two years of country A from the specification's worked example, plus
/// enough filler countries for the scorer to have data to fit on.
fn fixture_csv() -> String {
    let mut csv = String::from(HEADER);
    csv.push_str("\nAfrica,Angola,2020,10,0,1000000");
    csv.push_str("\nAfrica,Angola,2021,20,0,1000000");
    for (country, base) in [("Benin", 4), ("Chad", 6), ("Ghana", 8), ("Kenya", 3)] {
        for year in 2015..=2021 {
            csv.push_str(&format!(
                "\nAfrica,{country},{year},{cases},{rubella},2000000",
                cases = base * 10 + (year - 2015),
                rubella = base,
            ));
        }
    }
    csv
}

#[test]
fn worked_example_from_wide_to_yoy() {
    let output = run_from_bytes(fixture_csv().as_bytes(), &config_with_seed(42)).unwrap();

    // Reshaper invariant: exactly two long records per wide record
    assert_eq!(output.long.len(), output.wide.len() * 2);

    let measles_2021 = output
        .enriched
        .iter()
        .find(|r| r.country == "Angola" && r.year == 2021 && r.disease == Disease::Measles)
        .unwrap();
    assert_eq!(measles_2021.cases, Some(20.0));
    assert_eq!(measles_2021.cases_per_100k, Some(2.0));
    // (2.0 - 1.0) / 1.0 * 100
    assert_eq!(measles_2021.yoy_growth_pct, Some(100.0));
    // Partial window over two years: (1.0 + 2.0) / 2
    assert_eq!(measles_2021.rolling_avg_3, Some(1.5));

    let measles_2020 = output
        .enriched
        .iter()
        .find(|r| r.country == "Angola" && r.year == 2020 && r.disease == Disease::Measles)
        .unwrap();
    assert_eq!(measles_2020.yoy_growth_pct, None);
    assert_eq!(measles_2020.rolling_avg_3, Some(1.0));
}

#[test]
fn grouping_long_by_country_year_recovers_wide_values() {
    let output = run_from_bytes(fixture_csv().as_bytes(), &config_with_seed(42)).unwrap();

    for wide in &output.wide {
        let pair: Vec<_> = output
            .long
            .iter()
            .filter(|r| r.country == wide.country && r.year == wide.year)
            .collect();
        assert_eq!(pair.len(), 2, "{} {}", wide.country, wide.year);
        assert_eq!(pair[0].disease, Disease::Measles);
        assert_eq!(pair[0].cases, wide.measles_cases);
        assert_eq!(pair[1].disease, Disease::Rubella);
        assert_eq!(pair[1].cases, wide.rubella_cases);
    }
}

#[test]
fn scorer_preserves_cardinality_across_all_models() {
    let output = run_from_bytes(fixture_csv().as_bytes(), &config_with_seed(42)).unwrap();
    let scored = output.scored.unwrap();

    assert_eq!(scored.measles.len(), output.enriched.len());
    assert_eq!(scored.rubella.len(), output.enriched.len());
    assert_eq!(scored.joint.len(), output.enriched.len());

    // Rubella rows are out of scope for the measles model but still present
    assert!(
        scored
            .measles
            .iter()
            .filter(|r| r.disease == Disease::Rubella)
            .all(|r| r.anomaly_label == AnomalyLabel::Unscored)
    );
}

#[test]
fn identical_runs_export_identical_bytes() {
    let csv = fixture_csv();
    let export = |seed| {
        let output = run_from_bytes(csv.as_bytes(), &config_with_seed(seed)).unwrap();
        scored_csv_bytes(&output.scored.unwrap().joint).unwrap()
    };
    assert_eq!(export(42), export(42));
}

#[test]
fn missing_column_aborts_with_named_columns() {
    let csv = "Region,Country,Year,Measles_Cases\nAfrica,Angola,2020,10";
    let err = run_from_bytes(csv.as_bytes(), &config_with_seed(42)).unwrap_err();

    match err {
        PipelineError::Schema { missing, .. } => {
            assert!(missing.contains(&"rubella_cases".to_string()));
            assert!(missing.contains(&"population".to_string()));
        }
        other => panic!("expected schema error, got {other}"),
    }
}

#[test]
fn scoring_toggle_off_skips_models() {
    let config = PipelineConfig {
        scoring: None,
        ..PipelineConfig::default()
    };
    let output = run_from_bytes(fixture_csv().as_bytes(), &config).unwrap();
    assert!(output.scored.is_none());
    assert!(!output.enriched.is_empty());
}

#[test]
fn filter_then_export_round_trip() {
    let output = run_from_bytes(fixture_csv().as_bytes(), &config_with_seed(42)).unwrap();
    let scored = output.scored.unwrap();

    let filtered = TableFilter::default()
        .with_disease(DiseaseSelection::Measles)
        .with_year_range(2020, 2021)
        .with_regions(["Africa"])
        .apply(&scored.measles);
    assert!(!filtered.is_empty());
    assert!(filtered.iter().all(|r| r.disease == Disease::Measles));

    let bytes = scored_csv_bytes(&filtered).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    // Header plus one line per filtered record
    assert_eq!(text.lines().count(), filtered.len() + 1);
}

#[test]
fn cache_reuses_identical_runs() {
    let csv = fixture_csv();
    let config = config_with_seed(42);
    let mut cache = PipelineCache::new();
    let mut computations = 0;

    for _ in 0..3 {
        cache
            .get_or_compute(csv.as_bytes(), &config, || {
                computations += 1;
                run_from_bytes(csv.as_bytes(), &config)
            })
            .unwrap();
    }

    assert_eq!(computations, 1);
}

#[test]
fn summary_statistics_cover_the_wide_table() {
    let output = run_from_bytes(fixture_csv().as_bytes(), &config_with_seed(42)).unwrap();
    let summaries = summarize_wide(&output.wide);

    let population = summaries
        .iter()
        .find(|s| s.column == "population")
        .unwrap();
    assert_eq!(population.count, output.wide.len());
    assert_eq!(population.min, Some(1_000_000.0));
    assert_eq!(population.max, Some(2_000_000.0));
}

#[test]
fn quality_report_counts_irregularities() {
    let mut csv = fixture_csv();
    csv.push_str("\nAfrica,Wakanda,2020,5,1,1000000"); // unresolved name
    csv.push_str("\nAfrica,Angola,1999,5,1,1000000"); // out of range
    csv.push_str("\nAfrica,Angola,2019,,1,1000000"); // missing cell

    let output = run_from_bytes(csv.as_bytes(), &config_with_seed(42)).unwrap();
    assert!(output.quality.unresolved_countries.contains("Wakanda"));
    assert_eq!(output.quality.out_of_range_years, 1);
    assert!(output.quality.missing_numeric_cells >= 1);
    assert!(output.quality.summary().contains("Wakanda"));
}
