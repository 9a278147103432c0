//! Drive a `DashboardState` the way the page does: initial load, user
//! selection, one dynamic-filter cycle, then the report fetches

use anyhow::{Context, Result, bail};
use dashboard_core::{CycleOutcome, DashboardState, Metric, ReportKind, SelectionDocument, TimeRange};
use tracing::{info, warn};

use crate::client::ServiceClient;

/// Everything the user selected on the command line
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// `(facet key, value)` pairs, in command-line order
    pub filters: Vec<(String, String)>,
    /// Project ids to keep checked; `None` keeps every project
    pub projects: Option<Vec<String>>,
    pub time_range: TimeRange,
    pub hidden: Vec<Metric>,
}

/// Parse one `--filter key=value` argument
pub fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing facet key in '{}'", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Page-load state: unconstrained option fetch with everything checked
pub async fn initial_state(client: &ServiceClient) -> Result<DashboardState> {
    let config = client.config();
    let mut state = DashboardState::new(&config.catalog, config.stale_policy);
    state.set_columns(config.columns);

    let response = client
        .filter_options(&SelectionDocument::default())
        .await
        .context("Failed to load initial filter options")?;
    state.apply_initial_options(response);

    info!(
        facets = state.facets().len(),
        projects = state.projects().projects().len(),
        "initial options loaded"
    );
    Ok(state)
}

/// Narrow each named facet to the given values. Facets not named keep every
/// option checked. Returns whether anything was narrowed.
pub fn apply_filters(state: &mut DashboardState, filters: &[(String, String)]) -> Result<bool> {
    let mut narrowed: Vec<&str> = Vec::new();

    for (key, value) in filters {
        if state.facet(key).is_none() {
            let known: Vec<&str> = state.facets().iter().map(|f| f.key()).collect();
            bail!("Unknown facet '{}' (known: {})", key, known.join(", "));
        }

        if !narrowed.contains(&key.as_str()) {
            state.set_facet_all(key, false);
            narrowed.push(key);
        }

        if !state.set_option_checked(key, value, true) && !is_checked(state, key, value) {
            warn!(facet = %key, value = %value, "value not offered by the service; ignored");
        }
    }

    Ok(!narrowed.is_empty())
}

fn is_checked(state: &DashboardState, key: &str, value: &str) -> bool {
    state.facet(key).is_some_and(|f| f.is_checked(value))
}

/// Keep only `ids` checked in the project list
pub fn apply_projects(state: &mut DashboardState, ids: &[String]) {
    state.set_project_search("");
    state.set_visible_projects(false);
    for id in ids {
        if !state.set_project_checked(id, true) && !state.projects().is_checked(id) {
            warn!(project = %id, "project not offered by the service; ignored");
        }
    }
}

/// One dynamic-filter cycle
pub async fn refresh_filters(client: &ServiceClient, state: &mut DashboardState, exclude: Option<&str>) -> Result<()> {
    let request = state.begin_filter_refresh_excluding(exclude);
    let result = client.filter_options(&request.body).await;
    let failure = result.as_ref().err().cloned();

    match state.finish_filter_refresh(request.ticket, result) {
        CycleOutcome::Applied | CycleOutcome::Stale => Ok(()),
        CycleOutcome::Failed => {
            let err = failure.map(anyhow::Error::new).unwrap_or_else(|| anyhow::anyhow!("unknown failure"));
            Err(err.context("Failed to update dynamic filters"))
        }
    }
}

/// Initial load plus the command-line selection, reconciled
pub async fn prepare(client: &ServiceClient, selection: &Selection) -> Result<DashboardState> {
    let mut state = initial_state(client).await?;

    if apply_filters(&mut state, &selection.filters)? {
        refresh_filters(client, &mut state, None).await?;
    }
    if let Some(ids) = &selection.projects {
        apply_projects(&mut state, ids);
    }
    state.set_time_range(selection.time_range.clone());
    for metric in &selection.hidden {
        state.set_column(*metric, false);
    }

    Ok(state)
}

/// Fetch one report into `state`
pub async fn load_report(client: &ServiceClient, state: &mut DashboardState, kind: ReportKind) -> CycleOutcome {
    let request = state.begin_report(kind);
    let result = client.report(kind, &request.body).await;
    state.finish_report(kind, request.ticket, result)
}

/// "Apply": both reports requested together
pub async fn load_reports(client: &ServiceClient, state: &mut DashboardState) {
    let [analysis, transaction] = state.begin_reports();

    let (analysis_result, transaction_result) = tokio::join!(
        client.report(analysis.kind, &analysis.body),
        client.report(transaction.kind, &transaction.body),
    );

    state.finish_report(analysis.kind, analysis.ticket, analysis_result);
    state.finish_report(transaction.kind, transaction.ticket, transaction_result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{FacetKind, FacetSpec, FilterOptionsResponse, ProjectEntry, StalePolicy};
    use serde_json::json;
    use std::collections::HashMap;

    fn loaded_state() -> DashboardState {
        let catalog = vec![
            FacetSpec::new("province", "Province", FacetKind::Categorical),
            FacetSpec::new("region", "Region", FacetKind::Categorical),
        ];
        let mut state = DashboardState::new(&catalog, StalePolicy::DiscardStale);
        state.apply_initial_options(FilterOptionsResponse {
            options: HashMap::from([
                ("province".to_string(), vec![json!("Gansu"), json!("Hebei"), json!("Yunnan")]),
                ("region".to_string(), vec![json!("North"), json!("South")]),
            ]),
            projects: vec![
                ProjectEntry {
                    id: "1".into(),
                    project_name: "Wind farm".into(),
                },
                ProjectEntry {
                    id: "2".into(),
                    project_name: "Solar park".into(),
                },
            ],
        });
        state
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("province=Gansu"), Ok(("province".into(), "Gansu".into())));
        assert_eq!(parse_filter(" region = North "), Ok(("region".into(), "North".into())));
        assert!(parse_filter("province").is_err());
        assert!(parse_filter("=Gansu").is_err());
    }

    #[test]
    fn test_apply_filters_narrows_named_facets_only() {
        let mut state = loaded_state();
        let filters = vec![
            ("province".to_string(), "Gansu".to_string()),
            ("province".to_string(), "Yunnan".to_string()),
        ];

        assert!(apply_filters(&mut state, &filters).unwrap());
        assert_eq!(state.facet("province").unwrap().checked_values(), vec!["Gansu", "Yunnan"]);
        assert_eq!(state.facet("region").unwrap().checked_count(), 2);
    }

    #[test]
    fn test_apply_filters_rejects_unknown_facet() {
        let mut state = loaded_state();
        let filters = vec![("city".to_string(), "Lanzhou".to_string())];
        let err = apply_filters(&mut state, &filters).unwrap_err();
        assert!(err.to_string().contains("Unknown facet 'city'"));
    }

    #[test]
    fn test_no_filters_means_no_refresh() {
        let mut state = loaded_state();
        assert!(!apply_filters(&mut state, &[]).unwrap());
    }

    #[test]
    fn test_apply_projects() {
        let mut state = loaded_state();
        apply_projects(&mut state, &["2".to_string(), "9".to_string()]);
        assert_eq!(state.projects().checked_ids(), vec!["2"]);
    }
}
