use dashboard_core::wire::{decode_filter_options, decode_report_rows};
use dashboard_core::{CombinedSelection, FetchError, FilterOptionsResponse, RawReportRow, ReportKind, SelectionDocument};

use super::http::post_json;
use crate::config::CONFIG;

/// Option sets for the current selection
pub async fn fetch_filter_options(selection: &SelectionDocument) -> Result<FilterOptionsResponse, FetchError> {
    let body = post_json(&CONFIG.filter_options_url(), selection).await?;
    decode_filter_options(&body)
}

/// Rows of one report; an empty, `null` or absent body means no data
pub async fn fetch_report(kind: ReportKind, selection: &CombinedSelection) -> Result<Vec<RawReportRow>, FetchError> {
    let body = post_json(&CONFIG.report_url(kind), selection).await?;
    decode_report_rows(&body)
}
