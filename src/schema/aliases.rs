//! Country-name alias resolution.
//!
//! Uploaded files spell country names inconsistently ("DR Congo",
//! "Congo, Dem. Rep.", ...). The alias table collapses known variants onto
//! one canonical name. Resolution is a plain lookup table so it can be
//! tested, versioned and extended; names absent from the table pass through
//! unchanged and are reported as unresolved, never treated as fatal.

use rustc_hash::FxHashMap;

/// Bumped whenever the built-in alias table changes.
pub const ALIAS_TABLE_VERSION: u32 = 1;

/// Built-in table: canonical name followed by its known variant spellings.
/// Canonical names resolve to themselves.
const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    (
        "Democratic Republic of the Congo",
        &[
            "DR Congo",
            "DRC",
            "Congo, Dem. Rep.",
            "Democratic Republic of Congo",
            "Congo (Kinshasa)",
        ],
    ),
    (
        "United States of America",
        &["USA", "US", "United States", "United States of America (the)"],
    ),
    (
        "United Kingdom of Great Britain and Northern Ireland",
        &["UK", "United Kingdom", "Great Britain"],
    ),
    ("Russian Federation", &["Russia"]),
    ("United Republic of Tanzania", &["Tanzania"]),
    ("Viet Nam", &["Vietnam"]),
    ("Syrian Arab Republic", &["Syria"]),
    ("Iran (Islamic Republic of)", &["Iran"]),
    ("Bolivia (Plurinational State of)", &["Bolivia"]),
    ("Venezuela (Bolivarian Republic of)", &["Venezuela"]),
    ("Lao People's Democratic Republic", &["Laos", "Lao PDR"]),
    (
        "Democratic People's Republic of Korea",
        &["North Korea", "DPR Korea", "Korea, North"],
    ),
    ("Republic of Korea", &["South Korea", "Korea, South"]),
    ("Côte d'Ivoire", &["Cote d'Ivoire", "Ivory Coast"]),
    ("Republic of Moldova", &["Moldova"]),
    ("Czechia", &["Czech Republic"]),
    ("Türkiye", &["Turkey", "Turkiye"]),
];

/// Lookup table mapping known country-name spellings (canonical or variant)
/// to canonical names. Matching is case-insensitive and whitespace-trimmed.
#[derive(Debug, Clone)]
pub struct CountryAliases {
    map: FxHashMap<String, String>,
}

impl Default for CountryAliases {
    fn default() -> Self {
        let mut aliases = Self {
            map: FxHashMap::default(),
        };
        for (canonical, variants) in BUILTIN_ALIASES {
            aliases.insert(canonical, canonical);
            for variant in *variants {
                aliases.insert(variant, canonical);
            }
        }
        aliases
    }
}

impl CountryAliases {
    /// An empty table, for callers that want full control over the mapping.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Add one variant → canonical mapping, replacing any existing entry for
    /// the variant.
    #[must_use]
    pub fn with_alias(mut self, variant: &str, canonical: &str) -> Self {
        self.insert(variant, canonical);
        self.insert(canonical, canonical);
        self
    }

    fn insert(&mut self, spelling: &str, canonical: &str) {
        self.map
            .insert(Self::key(spelling), canonical.to_string());
    }

    fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Canonical name for a known spelling, or `None` for an unknown one.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.map.get(&Self::key(name)).map(String::as_str)
    }

    /// Number of known spellings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_collapse_to_canonical() {
        let aliases = CountryAliases::default();
        for variant in ["DR Congo", "DRC", "Democratic Republic of Congo"] {
            assert_eq!(
                aliases.resolve(variant),
                Some("Democratic Republic of the Congo"),
                "variant {variant:?}"
            );
        }
    }

    #[test]
    fn test_canonical_names_resolve_to_themselves() {
        let aliases = CountryAliases::default();
        assert_eq!(aliases.resolve("Viet Nam"), Some("Viet Nam"));
    }

    #[test]
    fn test_matching_is_case_insensitive_and_trimmed() {
        let aliases = CountryAliases::default();
        assert_eq!(aliases.resolve("  usa "), Some("United States of America"));
    }

    #[test]
    fn test_unknown_names_are_not_resolved() {
        let aliases = CountryAliases::default();
        assert_eq!(aliases.resolve("Atlantis"), None);
    }

    #[test]
    fn test_with_alias_extends_the_table() {
        let aliases = CountryAliases::empty().with_alias("Holland", "Netherlands");
        assert_eq!(aliases.resolve("holland"), Some("Netherlands"));
        assert_eq!(aliases.resolve("Netherlands"), Some("Netherlands"));
    }
}
