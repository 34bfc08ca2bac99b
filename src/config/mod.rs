//! Configuration for pipeline runs.

use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Inclusive range of years accepted by the loader; rows outside it are
    /// skipped and counted as data-quality warnings
    pub valid_years: (i32, i32),
    /// Anomaly-scoring configuration; `None` disables scoring entirely
    pub scoring: Option<ScorerConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            valid_years: (2012, 2025),
            scoring: Some(ScorerConfig::default()),
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration before a run.
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.valid_years;
        if lo > hi {
            return Err(PipelineError::Config(format!(
                "valid year range is inverted: {lo}..={hi}"
            )));
        }
        if let Some(scoring) = &self.scoring {
            scoring.validate()?;
        }
        Ok(())
    }
}

/// Configuration for the anomaly scorer.
///
/// The contamination ratio is applied uniformly across all countries; this
/// matches the original dashboard and ignores country-size differences. A
/// per-group contamination map would extend this struct without changing the
/// scorer's contract.
#[derive(Debug, Clone, Serialize)]
pub struct ScorerConfig {
    /// Expected fraction of fitted records labeled anomalous, in (0, 1)
    pub contamination: f64,
    /// Seed for the forest's randomized subsampling; `Some` makes scores
    /// bit-for-bit reproducible across runs, `None` uses OS entropy
    pub random_seed: Option<u64>,
    /// Number of trees in the isolation forest
    pub n_estimators: usize,
    /// Minimum number of scorable rows required to fit a model; below this
    /// the whole model degrades to unscored
    pub min_samples: usize,
    /// Include `yoy_growth_pct` in the feature vector alongside the per-100K
    /// rate
    pub include_growth: bool,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            contamination: 0.1,
            random_seed: None,
            n_estimators: 100,
            min_samples: 3,
            include_growth: false,
        }
    }
}

impl ScorerConfig {
    /// Validate scorer parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination < 1.0) {
            return Err(PipelineError::Config(format!(
                "contamination must be in (0, 1), got {}",
                self.contamination
            )));
        }
        if self.n_estimators == 0 {
            return Err(PipelineError::Config(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_contamination_bounds() {
        let mut cfg = ScorerConfig::default();
        for bad in [0.0, 1.0, -0.2, 1.5] {
            cfg.contamination = bad;
            assert!(cfg.validate().is_err(), "contamination {bad} should fail");
        }
        cfg.contamination = 0.5;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_inverted_year_range_rejected() {
        let cfg = PipelineConfig {
            valid_years: (2025, 2012),
            scoring: None,
        };
        assert!(cfg.validate().is_err());
    }
}
