//! Fetch cycles driven from event handlers
//!
//! Each function takes a ticket from the state, runs the request on the event
//! loop and hands the result back with the same ticket.

use dashboard_core::{CycleOutcome, DashboardState, ReportRequest, SelectionDocument};
use leptos::logging::{log, warn};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{fetch_filter_options, fetch_report};

/// Startup: unconstrained option fetch, then both reports once
pub fn load_initial(state: RwSignal<DashboardState>) {
    spawn_local(async move {
        match fetch_filter_options(&SelectionDocument::default()).await {
            Ok(response) => state.update(|s| s.apply_initial_options(response)),
            Err(err) => warn!("failed to load initial filter options: {}", err),
        }
        run_reports(state).await;
    });
}

/// One dynamic-filter cycle for the current selection
pub fn refresh_filters(state: RwSignal<DashboardState>) {
    let Some(request) = state.try_update(|s| s.begin_filter_refresh()) else {
        return;
    };

    spawn_local(async move {
        let result = fetch_filter_options(&request.body).await;
        if let Err(err) = &result {
            warn!("failed to update dynamic filters: {}", err);
        }

        let outcome = state.try_update(|s| s.finish_filter_refresh(request.ticket, result));
        if outcome == Some(CycleOutcome::Stale) {
            log!("discarded stale filter response #{}", request.ticket.seq());
        }
    });
}

/// "Apply": both reports, each replacing its own table when it lands
pub fn apply(state: RwSignal<DashboardState>) {
    spawn_local(run_reports(state));
}

async fn run_reports(state: RwSignal<DashboardState>) {
    let Some([analysis, transaction]) = state.try_update(|s| s.begin_reports()) else {
        return;
    };
    futures::join!(run_report(state, analysis), run_report(state, transaction));
}

async fn run_report(state: RwSignal<DashboardState>, request: ReportRequest) {
    let result = fetch_report(request.kind, &request.body).await;
    if let Err(err) = &result {
        warn!("failed to load {}: {}", request.kind.title(), err);
    }
    state.update(|s| {
        s.finish_report(request.kind, request.ticket, result);
    });
}
