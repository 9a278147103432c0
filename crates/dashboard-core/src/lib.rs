//! Shared logic of the transaction analysis dashboard
//!
//! Cascading facet state and its reconciliation against dynamic-filter
//! responses, request sequencing, and the report aggregation / table model
//! used by both the browser front end and the CLI.

pub mod aggregate;
pub mod catalog;
pub mod columns;
pub mod cycle;
pub mod dashboard;
pub mod error;
pub mod facet;
pub mod numeric;
pub mod projects;
pub mod reconcile;
pub mod render;
pub mod selection;
pub mod wire;

pub use aggregate::{Aggregation, Channel, ReportKind, reduce};
pub use catalog::{FacetKind, FacetSpec, default_catalog};
pub use columns::{ColumnVisibility, Metric};
pub use cycle::{RequestTicket, StalePolicy};
pub use dashboard::{CycleOutcome, DashboardState, FilterRequest, ReportRequest};
pub use error::FetchError;
pub use facet::{FacetOption, FacetSet, FacetState, SelectAllState, SelectionSummary};
pub use projects::ProjectList;
pub use selection::{CombinedSelection, SelectionDocument, TimeRange};
pub use wire::{Endpoints, FilterOptionsResponse, ProjectEntry, RawReportRow};
