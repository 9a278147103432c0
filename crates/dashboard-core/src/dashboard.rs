//! Owned UI state of the transaction analysis page
//!
//! Front ends keep one `DashboardState`, mutate it through the accessors
//! below, and drive the three fetch cycles with `begin_*` / `finish_*` pairs.
//! Transports stay outside: a `begin_*` call hands out the request body and a
//! ticket, the front end performs the POST, and the matching `finish_*` call
//! applies the result.

use tracing::warn;

use crate::aggregate::{Aggregation, ReportKind, reduce};
use crate::catalog::FacetSpec;
use crate::columns::{ColumnVisibility, Metric};
use crate::cycle::{Admission, CycleState, RequestSequencer, RequestTicket, StalePolicy};
use crate::error::FetchError;
use crate::facet::{FacetSet, FacetState};
use crate::projects::ProjectList;
use crate::reconcile::reconcile_all;
use crate::render::{TableView, render};
use crate::selection::{CombinedSelection, SelectionDocument, TimeRange, collect, collect_combined};
use crate::wire::{FilterOptionsResponse, RawReportRow};

/// Dynamic-filter request ready to be sent
#[derive(Debug, Clone)]
pub struct FilterRequest {
    pub ticket: RequestTicket,
    pub body: SelectionDocument,
}

/// Report request ready to be sent
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub ticket: RequestTicket,
    pub body: CombinedSelection,
}

/// Result of handing a response back to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Applied,
    /// A newer request is outstanding; nothing changed
    Stale,
    /// Transport failure, surfaced as configured for the cycle kind
    Failed,
}

#[derive(Debug, Clone)]
struct ReportSlot {
    sequencer: RequestSequencer,
    view: TableView,
    aggregation: Option<Aggregation>,
}

impl ReportSlot {
    fn new(kind: ReportKind, policy: StalePolicy) -> Self {
        let name = match kind {
            ReportKind::Analysis => "analysis",
            ReportKind::TransactionTime => "transaction_time",
        };
        Self {
            sequencer: RequestSequencer::new(name, policy),
            view: TableView::Idle,
            aggregation: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    facets: FacetSet,
    projects: ProjectList,
    time_range: TimeRange,
    columns: ColumnVisibility,
    filter_cycle: RequestSequencer,
    analysis: ReportSlot,
    transaction_time: ReportSlot,
}

impl DashboardState {
    /// Facets from the catalogue with no options yet
    pub fn new(catalog: &[FacetSpec], policy: StalePolicy) -> Self {
        Self::with_facets(FacetSet::from_catalog(catalog), ProjectList::default(), policy)
    }

    /// Page-load state: initial option lists and projects
    pub fn with_facets(facets: FacetSet, projects: ProjectList, policy: StalePolicy) -> Self {
        Self {
            facets,
            projects,
            time_range: TimeRange::default(),
            columns: ColumnVisibility::default(),
            filter_cycle: RequestSequencer::new("dynamic_filters", policy),
            analysis: ReportSlot::new(ReportKind::Analysis, policy),
            transaction_time: ReportSlot::new(ReportKind::TransactionTime, policy),
        }
    }

    // -------------------------------------------------------------------------
    // Read accessors
    // -------------------------------------------------------------------------

    pub fn facets(&self) -> &FacetSet {
        &self.facets
    }

    pub fn facet(&self, key: &str) -> Option<&FacetState> {
        self.facets.get(key)
    }

    pub fn projects(&self) -> &ProjectList {
        &self.projects
    }

    pub fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    pub fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    pub fn filter_state(&self) -> CycleState {
        self.filter_cycle.state()
    }

    pub fn report_view(&self, kind: ReportKind) -> &TableView {
        &self.slot(kind).view
    }

    /// Last applied aggregation of `kind`, if the last fetch succeeded
    pub fn aggregation(&self, kind: ReportKind) -> Option<&Aggregation> {
        self.slot(kind).aggregation.as_ref()
    }

    /// Loading indicator: any report request outstanding
    pub fn is_loading(&self) -> bool {
        ReportKind::ALL.iter().any(|k| self.slot(*k).sequencer.in_flight() > 0)
    }

    pub fn selection(&self) -> SelectionDocument {
        collect(&self.facets, None)
    }

    pub fn combined_selection(&self) -> CombinedSelection {
        collect_combined(&self.facets, &self.projects, &self.time_range)
    }

    // -------------------------------------------------------------------------
    // Filter-affecting mutations. `true` means a dynamic-filter cycle is due.
    // -------------------------------------------------------------------------

    pub fn set_option_checked(&mut self, key: &str, value: &str, checked: bool) -> bool {
        self.facets
            .get_mut(key)
            .is_some_and(|f| f.set_checked(value, checked))
    }

    /// Facet select-all control (options visible under the search only)
    pub fn set_facet_all(&mut self, key: &str, checked: bool) -> bool {
        match self.facets.get_mut(key) {
            Some(facet) => {
                facet.set_all_visible(checked);
                true
            }
            None => false,
        }
    }

    pub fn set_project_checked(&mut self, id: &str, checked: bool) -> bool {
        self.projects.set_checked(id, checked)
    }

    /// Project select-all (visible projects only)
    pub fn set_visible_projects(&mut self, checked: bool) -> bool {
        self.projects.set_all_visible(checked);
        true
    }

    /// Replace the time range inputs
    pub fn set_time_range(&mut self, time_range: TimeRange) -> bool {
        self.time_range = time_range;
        true
    }

    pub fn time_range_mut(&mut self) -> &mut TimeRange {
        &mut self.time_range
    }

    /// Reset control: every facet option checked, time range cleared
    pub fn reset(&mut self) -> bool {
        self.facets.check_everything();
        self.time_range.clear();
        true
    }

    // -------------------------------------------------------------------------
    // Display-only mutations
    // -------------------------------------------------------------------------

    pub fn set_facet_search(&mut self, key: &str, term: &str) {
        if let Some(facet) = self.facets.get_mut(key) {
            facet.set_search(term);
        }
    }

    pub fn set_project_search(&mut self, term: &str) {
        self.projects.set_search(term);
    }

    pub fn set_column(&mut self, metric: Metric, visible: bool) {
        self.columns.set(metric, visible);
    }

    pub fn set_columns(&mut self, columns: ColumnVisibility) {
        self.columns = columns;
    }

    // -------------------------------------------------------------------------
    // Dynamic-filter cycle
    // -------------------------------------------------------------------------

    pub fn begin_filter_refresh(&mut self) -> FilterRequest {
        self.begin_filter_refresh_excluding(None)
    }

    /// Same cycle, but the request leaves `exclude`'s facet unconstrained so
    /// the response lists every option still reachable through the others
    pub fn begin_filter_refresh_excluding(&mut self, exclude: Option<&str>) -> FilterRequest {
        FilterRequest {
            ticket: self.filter_cycle.dispatch(),
            body: collect(&self.facets, exclude),
        }
    }

    /// Reconcile every facet and rebuild the project list from a response.
    /// Checks are preserved against the state as it is now.
    pub fn finish_filter_refresh(
        &mut self,
        ticket: RequestTicket,
        result: Result<FilterOptionsResponse, FetchError>,
    ) -> CycleOutcome {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(seq = ticket.seq(), error = %err, "failed to update dynamic filters");
                self.filter_cycle.fail(ticket);
                return CycleOutcome::Failed;
            }
        };

        if self.filter_cycle.admit(ticket) == Admission::Stale {
            return CycleOutcome::Stale;
        }

        reconcile_all(&mut self.facets, &response.options);
        self.projects.rebuild(response.projects);
        self.filter_cycle.finish();
        CycleOutcome::Applied
    }

    /// Startup options from an unconstrained fetch: every option and project
    /// checked, which is the page's default selection
    pub fn apply_initial_options(&mut self, response: FilterOptionsResponse) {
        reconcile_all(&mut self.facets, &response.options);
        self.facets.check_everything();
        self.projects.rebuild(response.projects);
    }

    // -------------------------------------------------------------------------
    // Report cycles
    // -------------------------------------------------------------------------

    /// Start a report fetch; the table shows the loading row
    pub fn begin_report(&mut self, kind: ReportKind) -> ReportRequest {
        let body = self.combined_selection();
        let slot = self.slot_mut(kind);
        slot.view = TableView::Loading;
        ReportRequest {
            kind,
            ticket: slot.sequencer.dispatch(),
            body,
        }
    }

    /// "Apply": both reports, issued together
    pub fn begin_reports(&mut self) -> [ReportRequest; 2] {
        ReportKind::ALL.map(|kind| self.begin_report(kind))
    }

    /// Replace `kind`'s table with the result of its fetch
    pub fn finish_report(
        &mut self,
        kind: ReportKind,
        ticket: RequestTicket,
        result: Result<Vec<RawReportRow>, FetchError>,
    ) -> CycleOutcome {
        let slot = self.slot_mut(kind);
        if slot.sequencer.admit(ticket) == Admission::Stale {
            return CycleOutcome::Stale;
        }

        let outcome = match result {
            Ok(rows) => {
                let aggregation = reduce(kind, &rows);
                slot.view = render(&aggregation);
                slot.aggregation = Some(aggregation);
                CycleOutcome::Applied
            }
            Err(err) => {
                warn!(report = ?kind, seq = ticket.seq(), error = %err, "failed to load report");
                slot.view = TableView::Failed(err.to_string());
                slot.aggregation = None;
                CycleOutcome::Failed
            }
        };

        slot.sequencer.finish();
        outcome
    }

    fn slot(&self, kind: ReportKind) -> &ReportSlot {
        match kind {
            ReportKind::Analysis => &self.analysis,
            ReportKind::TransactionTime => &self.transaction_time,
        }
    }

    fn slot_mut(&mut self, kind: ReportKind) -> &mut ReportSlot {
        match kind {
            ReportKind::Analysis => &mut self.analysis,
            ReportKind::TransactionTime => &mut self.transaction_time,
        }
    }
}
