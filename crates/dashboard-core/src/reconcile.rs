//! Filter reconciliation
//!
//! Rebuilds every facet from a dynamic-filter response while keeping the
//! user's checks on values that are still offered. Reconciliation reads the
//! facet's checked state at the moment it runs, never a snapshot taken when
//! the request was sent.

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::catalog::FacetKind;
use crate::facet::{FacetOption, FacetSet, FacetState};

/// Label / value of the boolean "yes" option
pub const BOOLEAN_YES: (&str, &str) = ("Yes", "1");
/// Label / value of the boolean "no" option
pub const BOOLEAN_NO: (&str, &str) = ("No", "0");

/// Build a facet's option list from the raw response entries
pub fn options_from_response(kind: FacetKind, raw: &[Value]) -> Vec<FacetOption> {
    match kind {
        FacetKind::Categorical => raw.iter().filter_map(categorical_value).map(FacetOption::plain).collect(),
        FacetKind::Boolean => boolean_options(raw),
    }
}

/// Categorical entries: strings, numbers, or tuples whose first element is one
fn categorical_value(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.first().and_then(categorical_value),
        _ => None,
    }
}

/// Boolean entries arrive as `[true, ...]` / `[false, ...]` tuples.
/// Bare booleans are accepted as well.
fn boolean_options(raw: &[Value]) -> Vec<FacetOption> {
    let flag = |entry: &Value| match entry {
        Value::Array(items) => items.first().and_then(Value::as_bool),
        other => other.as_bool(),
    };

    let mut options = Vec::with_capacity(2);
    if raw.iter().any(|e| flag(e) == Some(true)) {
        options.push(FacetOption::new(BOOLEAN_YES.0, BOOLEAN_YES.1));
    }
    if raw.iter().any(|e| flag(e) == Some(false)) {
        options.push(FacetOption::new(BOOLEAN_NO.0, BOOLEAN_NO.1));
    }
    options
}

/// Replace `facet`'s options, keeping checks on values that survive.
/// Values no longer offered are dropped silently.
pub fn reconcile(facet: &mut FacetState, new_options: Vec<FacetOption>) {
    let dropped = facet.replace_options(new_options);
    if !dropped.is_empty() {
        debug!(facet = facet.key(), ?dropped, "dropped selections no longer offered");
    }
}

/// Reconcile every facet against a response's `options` mapping.
/// A facet missing from the mapping is offered nothing.
pub fn reconcile_all(facets: &mut FacetSet, options: &HashMap<String, Vec<Value>>) {
    for facet in facets.iter_mut() {
        let raw = options.get(facet.key()).map(Vec::as_slice).unwrap_or(&[]);
        let new_options = options_from_response(facet.kind(), raw);
        reconcile(facet, new_options);
    }
}
