//! Anomaly scoring over enriched records.
//!
//! One stateless scoring function, three feature-set selections: measles-only,
//! rubella-only, and a joint model over both diseases' features per
//! country-year. The contamination ratio is applied uniformly across all
//! countries (a documented limitation of the original dashboard, kept as-is).

pub mod forest;

use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::ScorerConfig;
use crate::error::{PipelineError, Result};
use crate::models::{AnomalyLabel, Disease, EnrichedRecord, ScoredRecord};
use crate::reshape::pivot_joint;
use forest::IsolationForest;

/// Feature-set selection for one model fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Fit on measles records' features only
    Measles,
    /// Fit on rubella records' features only
    Rubella,
    /// Fit on joint (measles, rubella) feature rows per country-year
    Joint,
}

impl ModelKind {
    #[must_use]
    const fn scope(self) -> &'static str {
        match self {
            Self::Measles => "measles model",
            Self::Rubella => "rubella model",
            Self::Joint => "joint model",
        }
    }
}

/// Output of running all three models over one enriched table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTables {
    pub measles: Vec<ScoredRecord>,
    pub rubella: Vec<ScoredRecord>,
    pub joint: Vec<ScoredRecord>,
}

/// Score every record under one model.
///
/// Output cardinality always equals input cardinality. Records outside the
/// model's disease scope or missing a required feature are labeled
/// [`AnomalyLabel::Unscored`] with no score, never dropped. When fewer than
/// `min_samples` rows are scorable, the whole model degrades to unscored
/// (logged, not an error for the caller).
///
/// Labeling: the `floor(contamination * n)` lowest-scoring fitted rows are
/// anomalies; score ties are broken by input position, so labeling is
/// deterministic whenever the seed is fixed.
pub fn score_records(
    records: &[EnrichedRecord],
    kind: ModelKind,
    config: &ScorerConfig,
) -> Result<Vec<ScoredRecord>> {
    config.validate()?;

    let mut scored: Vec<ScoredRecord> = records.iter().map(ScoredRecord::unscored).collect();

    // (feature vector, indices of the records the resulting score applies to)
    let fitted_rows: Vec<(Vec<f64>, Vec<usize>)> = match kind {
        ModelKind::Measles => disease_rows(records, Disease::Measles, config.include_growth),
        ModelKind::Rubella => disease_rows(records, Disease::Rubella, config.include_growth),
        ModelKind::Joint => pivot_joint(records, config.include_growth)
            .into_iter()
            .map(|row| (row.features, row.members))
            .collect(),
    };

    if fitted_rows.len() < config.min_samples {
        let shortfall = PipelineError::InsufficientData {
            scope: kind.scope().to_string(),
            needed: config.min_samples,
            available: fitted_rows.len(),
        };
        warn!("{shortfall}; leaving all records unscored");
        return Ok(scored);
    }

    let mut rng = match config.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let features: Vec<Vec<f64>> = fitted_rows.iter().map(|(f, _)| f.clone()).collect();
    let model = IsolationForest::fit(&features, config.n_estimators, &mut rng);
    let scores = model.score_samples(&features);

    // Lowest contamination-fraction of scores are anomalous; ties broken by
    // fitted-row position for determinism
    let n_anomalies =
        (config.contamination * fitted_rows.len() as f64).floor() as usize;
    let mut ranked: Vec<usize> = (0..scores.len()).collect();
    ranked.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    for (rank, &row) in ranked.iter().enumerate() {
        let label = if rank < n_anomalies {
            AnomalyLabel::Anomaly
        } else {
            AnomalyLabel::Normal
        };
        for &member in &fitted_rows[row].1 {
            scored[member].anomaly_label = label;
            scored[member].anomaly_score = Some(scores[row]);
        }
    }

    Ok(scored)
}

/// Run the three models independently over the same enriched table.
pub fn score_all(records: &[EnrichedRecord], config: &ScorerConfig) -> Result<ScoredTables> {
    Ok(ScoredTables {
        measles: score_records(records, ModelKind::Measles, config)?,
        rubella: score_records(records, ModelKind::Rubella, config)?,
        joint: score_records(records, ModelKind::Joint, config)?,
    })
}

fn disease_rows(
    records: &[EnrichedRecord],
    disease: Disease,
    include_growth: bool,
) -> Vec<(Vec<f64>, Vec<usize>)> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.disease == disease)
        .filter_map(|(idx, r)| {
            let mut features = vec![r.cases_per_100k?];
            if include_growth {
                features.push(r.yoy_growth_pct?);
            }
            Some((features, vec![idx]))
        })
        .collect()
}
