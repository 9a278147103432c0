//! Facet catalogue: which filter dimensions exist and how their options are built

use serde::{Deserialize, Serialize};

/// How a facet's options are derived from the dynamic-filter response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    /// Each returned value becomes one option (label == value)
    #[default]
    Categorical,
    /// Raw booleans collapse into fixed "yes" (`"1"`) / "no" (`"0"`) options
    Boolean,
}

/// One filter dimension of the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSpec {
    /// Server-side filter field name
    pub key: String,
    /// Heading shown above the dropdown
    pub label: String,
    #[serde(default)]
    pub kind: FacetKind,
}

impl FacetSpec {
    pub fn new(key: &str, label: &str, kind: FacetKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
        }
    }
}

/// Facets of the transaction analysis page, in display order
pub const DEFAULT_FACETS: &[(&str, &str, FacetKind)] = &[
    ("secondary_unit", "Secondary unit", FacetKind::Categorical),
    ("province", "Province", FacetKind::Categorical),
    ("region", "Region", FacetKind::Categorical),
    ("power_type", "Power type", FacetKind::Categorical),
    ("investment_scope", "Investment scope", FacetKind::Categorical),
    ("project_nature", "Project nature", FacetKind::Categorical),
    ("is_uhv_support", "UHV supporting source", FacetKind::Boolean),
    ("has_subsidy", "Subsidized", FacetKind::Boolean),
];

/// Owned copy of [`DEFAULT_FACETS`]
pub fn default_catalog() -> Vec<FacetSpec> {
    DEFAULT_FACETS
        .iter()
        .map(|(key, label, kind)| FacetSpec::new(key, label, *kind))
        .collect()
}
