//! Selection collection: UI state → request body

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::facet::FacetSet;
use crate::projects::ProjectList;

/// Facet key → checked values. Facets with nothing checked are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionDocument {
    pub filters: BTreeMap<String, Vec<String>>,
}

impl SelectionDocument {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.filters.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Raw time range inputs. Empty string = no bound; never parsed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub production_start_month: String,
    pub production_end_month: String,
    pub transaction_start_date: String,
    pub transaction_end_date: String,
}

impl TimeRange {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_unbounded(&self) -> bool {
        self.production_start_month.is_empty()
            && self.production_end_month.is_empty()
            && self.transaction_start_date.is_empty()
            && self.transaction_end_date.is_empty()
    }
}

/// Body of the two report requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CombinedSelection {
    #[serde(flatten)]
    pub filters: SelectionDocument,
    pub projects: Vec<String>,
    #[serde(flatten)]
    pub time_range: TimeRange,
}

/// Checked values of every facet except `exclude`
pub fn collect(facets: &FacetSet, exclude: Option<&str>) -> SelectionDocument {
    let filters = facets
        .iter()
        .filter(|f| Some(f.key()) != exclude)
        .map(|f| (f.key().to_string(), f.checked_values()))
        .filter(|(_, values)| !values.is_empty())
        .collect();

    SelectionDocument { filters }
}

/// Facet selection plus checked projects and the raw time range
pub fn collect_combined(facets: &FacetSet, projects: &ProjectList, time_range: &TimeRange) -> CombinedSelection {
    CombinedSelection {
        filters: collect(facets, None),
        projects: projects.checked_ids(),
        time_range: time_range.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FacetKind, FacetSpec};
    use crate::facet::{FacetOption, FacetState};
    use crate::wire::ProjectEntry;
    use serde_json::json;

    fn facets() -> FacetSet {
        let mut province = FacetState::with_options(
            FacetSpec::new("province", "Province", FacetKind::Categorical),
            vec![FacetOption::plain("Gansu"), FacetOption::plain("Hebei")],
            false,
        );
        province.set_checked("Hebei", true);
        province.set_checked("Gansu", true);

        let region = FacetState::with_options(
            FacetSpec::new("region", "Region", FacetKind::Categorical),
            vec![FacetOption::plain("North")],
            false,
        );

        let uhv = FacetState::with_options(
            FacetSpec::new("is_uhv_support", "UHV", FacetKind::Boolean),
            vec![FacetOption::new("Yes", "1"), FacetOption::new("No", "0")],
            true,
        );

        FacetSet::from_facets(vec![province, region, uhv])
    }

    #[test]
    fn test_collect_omits_empty_facets() {
        let doc = collect(&facets(), None);
        assert_eq!(doc.get("province"), Some(&["Gansu".to_string(), "Hebei".to_string()][..]));
        assert!(doc.get("region").is_none());
        assert_eq!(doc.get("is_uhv_support").map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_collect_excludes_key() {
        let doc = collect(&facets(), Some("province"));
        assert!(doc.get("province").is_none());
        assert!(doc.get("is_uhv_support").is_some());
    }

    #[test]
    fn test_combined_serializes_flat() {
        let mut projects = ProjectList::new(vec![
            ProjectEntry {
                id: "3".into(),
                project_name: "A".into(),
            },
            ProjectEntry {
                id: "9".into(),
                project_name: "B".into(),
            },
        ]);
        projects.set_checked("9", false);
        let time_range = TimeRange {
            production_start_month: "2024-01".into(),
            ..TimeRange::default()
        };

        let body = serde_json::to_value(collect_combined(&facets(), &projects, &time_range)).unwrap();
        assert_eq!(
            body,
            json!({
                "province": ["Gansu", "Hebei"],
                "is_uhv_support": ["1", "0"],
                "projects": ["3"],
                "production_start_month": "2024-01",
                "production_end_month": "",
                "transaction_start_date": "",
                "transaction_end_date": ""
            })
        );
    }

    #[test]
    fn test_selection_document_serializes_as_map() {
        let body = serde_json::to_value(collect(&facets(), Some("is_uhv_support"))).unwrap();
        assert_eq!(body, json!({"province": ["Gansu", "Hebei"]}));
    }

    #[test]
    fn test_time_range_clear() {
        let mut range = TimeRange {
            transaction_end_date: "2025-03-31".into(),
            ..TimeRange::default()
        };
        assert!(!range.is_unbounded());
        range.clear();
        assert!(range.is_unbounded());
    }
}
