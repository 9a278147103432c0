//! Multi-select facet state
//!
//! A facet owns its offered options (server order) and the set of values the
//! user has checked. Checked values are always a subset of the offered
//! values; [`crate::reconcile`] is the only place options are replaced.

use serde::Serialize;
use std::collections::HashSet;

use crate::catalog::{FacetKind, FacetSpec};

/// One checkbox in a facet dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub label: String,
    pub value: String,
}

impl FacetOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label is its value
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Summary shown on the collapsed dropdown button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSummary {
    None,
    All,
    Some(usize),
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionSummary::None => write!(f, "None selected"),
            SelectionSummary::All => write!(f, "-- All --"),
            SelectionSummary::Some(n) => write!(f, "{} selected", n),
        }
    }
}

/// Tri-state of a facet's "select all" checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Unchecked,
    Checked,
    Indeterminate,
}

impl SelectAllState {
    pub fn is_checked(self) -> bool {
        self == SelectAllState::Checked
    }

    pub fn is_indeterminate(self) -> bool {
        self == SelectAllState::Indeterminate
    }
}

/// State of one multi-select facet
#[derive(Debug, Clone)]
pub struct FacetState {
    spec: FacetSpec,
    options: Vec<FacetOption>,
    checked: HashSet<String>,
    search: String,
}

impl FacetState {
    /// Empty facet (no options offered yet)
    pub fn new(spec: FacetSpec) -> Self {
        Self {
            spec,
            options: Vec::new(),
            checked: HashSet::new(),
            search: String::new(),
        }
    }

    /// Facet seeded with initial options, optionally all checked (page load)
    pub fn with_options(spec: FacetSpec, options: Vec<FacetOption>, all_checked: bool) -> Self {
        let mut facet = Self::new(spec);
        facet.options = dedup_options(options);
        if all_checked {
            facet.set_all(true);
        }
        facet
    }

    pub fn key(&self) -> &str {
        &self.spec.key
    }

    pub fn label(&self) -> &str {
        &self.spec.label
    }

    pub fn kind(&self) -> FacetKind {
        self.spec.kind
    }

    pub fn options(&self) -> &[FacetOption] {
        &self.options
    }

    pub fn is_checked(&self, value: &str) -> bool {
        self.checked.contains(value)
    }

    /// Check or uncheck one offered value.
    /// Returns whether the state changed; values not offered are ignored.
    pub fn set_checked(&mut self, value: &str, checked: bool) -> bool {
        if !self.options.iter().any(|o| o.value == value) {
            return false;
        }
        if checked {
            self.checked.insert(value.to_string())
        } else {
            self.checked.remove(value)
        }
    }

    /// Select-all control: check or uncheck every offered value
    pub fn set_all(&mut self, checked: bool) {
        if checked {
            self.checked = self.options.iter().map(|o| o.value.clone()).collect();
        } else {
            self.checked.clear();
        }
    }

    /// Checked values in option (display) order
    pub fn checked_values(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| self.checked.contains(&o.value))
            .map(|o| o.value.clone())
            .collect()
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub fn total(&self) -> usize {
        self.options.len()
    }

    pub fn summary(&self) -> SelectionSummary {
        let checked = self.checked_count();
        if checked == 0 {
            SelectionSummary::None
        } else if checked == self.total() {
            SelectionSummary::All
        } else {
            SelectionSummary::Some(checked)
        }
    }

    pub fn select_all_state(&self) -> SelectAllState {
        match self.summary() {
            SelectionSummary::None => SelectAllState::Unchecked,
            SelectionSummary::All => SelectAllState::Checked,
            SelectionSummary::Some(_) => SelectAllState::Indeterminate,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Set the dropdown's search text; only affects [`Self::visible_options`]
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    /// Options whose label contains the search text (case-insensitive)
    pub fn visible_options(&self) -> impl Iterator<Item = &FacetOption> {
        let needle = self.search.to_lowercase();
        self.options
            .iter()
            .filter(move |o| needle.is_empty() || o.label.to_lowercase().contains(&needle))
    }

    /// Dropdown select-all: check or uncheck only the options passing the
    /// search text. Checks on hidden options are left alone.
    pub fn set_all_visible(&mut self, checked: bool) {
        let visible: Vec<String> = self.visible_options().map(|o| o.value.clone()).collect();
        for value in visible {
            if checked {
                self.checked.insert(value);
            } else {
                self.checked.remove(&value);
            }
        }
    }

    /// Swap in a new option list, keeping checks on values still offered.
    /// Returns the previously checked values that were dropped.
    pub(crate) fn replace_options(&mut self, options: Vec<FacetOption>) -> Vec<String> {
        let options = dedup_options(options);
        let offered: HashSet<&str> = options.iter().map(|o| o.value.as_str()).collect();

        let mut dropped: Vec<String> = self
            .checked
            .iter()
            .filter(|v| !offered.contains(v.as_str()))
            .cloned()
            .collect();
        dropped.sort();

        self.checked.retain(|v| offered.contains(v.as_str()));
        self.options = options;
        dropped
    }
}

/// Keep the first occurrence of each value
fn dedup_options(options: Vec<FacetOption>) -> Vec<FacetOption> {
    let mut seen = HashSet::new();
    options
        .into_iter()
        .filter(|o| seen.insert(o.value.clone()))
        .collect()
}

/// All facets of the page, in display order, addressable by key
#[derive(Debug, Clone, Default)]
pub struct FacetSet {
    facets: Vec<FacetState>,
}

impl FacetSet {
    pub fn from_catalog(catalog: &[FacetSpec]) -> Self {
        Self {
            facets: catalog.iter().cloned().map(FacetState::new).collect(),
        }
    }

    pub fn from_facets(facets: Vec<FacetState>) -> Self {
        Self { facets }
    }

    pub fn get(&self, key: &str) -> Option<&FacetState> {
        self.facets.iter().find(|f| f.key() == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FacetState> {
        self.facets.iter_mut().find(|f| f.key() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FacetState> {
        self.facets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FacetState> {
        self.facets.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Reset control: every option of every facet checked
    pub fn check_everything(&mut self) {
        for facet in &mut self.facets {
            facet.set_all(true);
        }
    }
}
