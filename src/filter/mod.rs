//! The UI-facing filter surface.
//!
//! Mirrors the dashboard sidebar: disease selector, inclusive year range,
//! region multi-select and rolling-window selector. Filters evaluate over
//! any row type exposing the [`TableRow`] view and always produce a new
//! table.

use serde::Serialize;

use crate::models::{Disease, TableRow, WindowSize};

/// Disease facet of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DiseaseSelection {
    Measles,
    Rubella,
    #[default]
    Both,
}

impl DiseaseSelection {
    #[must_use]
    pub const fn matches(self, disease: Disease) -> bool {
        match self {
            Self::Both => true,
            Self::Measles => matches!(disease, Disease::Measles),
            Self::Rubella => matches!(disease, Disease::Rubella),
        }
    }
}

/// A composable row filter over enriched or scored tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableFilter {
    pub disease: DiseaseSelection,
    /// Inclusive year bounds; `None` keeps all years
    pub year_range: Option<(i32, i32)>,
    /// Selected regions; `None` (or empty) keeps all regions
    pub regions: Option<Vec<String>>,
    /// Which rolling-average column a consumer should read; does not affect
    /// row selection
    pub window: WindowSize,
}

impl TableFilter {
    #[must_use]
    pub fn with_disease(mut self, disease: DiseaseSelection) -> Self {
        self.disease = disease;
        self
    }

    #[must_use]
    pub fn with_year_range(mut self, from: i32, to: i32) -> Self {
        self.year_range = Some((from, to));
        self
    }

    #[must_use]
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a row passes every facet of the filter.
    #[must_use]
    pub fn matches<R: TableRow>(&self, row: &R) -> bool {
        if !self.disease.matches(row.disease()) {
            return false;
        }
        if let Some((from, to)) = self.year_range
            && (row.year() < from || row.year() > to)
        {
            return false;
        }
        if let Some(regions) = &self.regions
            && !regions.is_empty()
            && !regions.iter().any(|r| r == row.region())
        {
            return false;
        }
        true
    }

    /// Produce a new table containing the matching rows.
    #[must_use]
    pub fn apply<R: TableRow + Clone>(&self, rows: &[R]) -> Vec<R> {
        rows.iter().filter(|r| self.matches(*r)).cloned().collect()
    }
}
