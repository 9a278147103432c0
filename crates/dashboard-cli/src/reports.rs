//! Report output (console tables and CSV export)

use anyhow::{Context, Result, bail};
use csv::Writer;
use dashboard_core::projects::NO_MATCHING_PROJECTS;
use dashboard_core::render::{Cell, TableView, summary_line, visible_cells, visible_titles};
use dashboard_core::{Aggregation, ColumnVisibility, DashboardState, ReportKind, SelectAllState};
use std::path::Path;

use crate::constants::RULE_WIDTH;

/// Visible body lines of a table: the summary first, then the data rows.
/// An empty report has its zeroed summary only.
pub fn visible_body(view: &TableView, aggregation: Option<&Aggregation>, visibility: &ColumnVisibility) -> Vec<Vec<String>> {
    let texts = |cells: &[Cell]| -> Vec<String> { visible_cells(cells, visibility).map(|c| c.text.clone()).collect() };

    match (view, aggregation) {
        (TableView::Rows(table), _) => std::iter::once(&table.summary)
            .chain(table.rows.iter())
            .map(|cells| texts(cells.as_slice()))
            .collect(),
        (TableView::Empty, Some(aggregation)) => vec![texts(summary_line(aggregation).as_slice())],
        _ => Vec::new(),
    }
}

/// Pad every column to its widest entry; the period column is left aligned,
/// figures are right aligned
fn format_rows(header: &[String], body: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in body {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut lines = vec![line(header)];
    lines.push("-".repeat(lines[0].chars().count()));
    lines.extend(body.iter().map(|row| line(row)));
    lines
}

/// Print one report table to the console
pub fn print_table(state: &DashboardState, kind: ReportKind) {
    let view = state.report_view(kind);
    let visibility = state.columns();

    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("  {}", kind.title().to_uppercase());
    println!("{}", "=".repeat(RULE_WIDTH));

    let header = visible_titles(kind, visibility);
    let body = visible_body(view, state.aggregation(kind), visibility);
    for line in format_rows(&header, &body) {
        println!("{}", line);
    }

    if let Some(text) = view.placeholder() {
        println!("{}", text);
    }
    if let TableView::Failed(reason) = view {
        println!("  ({})", reason);
    }
    if let Some(aggregation) = state.aggregation(kind) {
        println!("\n{} row(s)", aggregation.summary.row_count);
    }
}

/// Print every facet with its reconciled options, then the project list
pub fn print_facets(state: &DashboardState) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("  FILTERS");
    println!("{}", "=".repeat(RULE_WIDTH));

    if state.facets().is_empty() {
        println!("\n  (no facets configured)");
    }
    for facet in state.facets().iter() {
        let mark = match facet.select_all_state() {
            SelectAllState::Checked => "[x]",
            SelectAllState::Unchecked => "[ ]",
            SelectAllState::Indeterminate => "[-]",
        };
        println!("\n{} {} ({}): {}", mark, facet.label(), facet.key(), facet.summary());
        for option in facet.options() {
            let checked = if facet.is_checked(&option.value) { "x" } else { " " };
            if option.label == option.value {
                println!("    [{}] {}", checked, option.label);
            } else {
                println!("    [{}] {} = {}", checked, option.label, option.value);
            }
        }
    }

    println!("\n{}", "-".repeat(RULE_WIDTH));
    println!("Projects");
    let projects = state.projects();
    if projects.is_empty() {
        println!("    {}", NO_MATCHING_PROJECTS);
    }
    for project in projects.projects() {
        let checked = if projects.is_checked(&project.id) { "x" } else { " " };
        println!("    [{}] {:>6}  {}", checked, project.id, project.project_name);
    }
}

/// Export the visible columns of one report (header, summary, rows)
pub fn write_csv(path: &Path, state: &DashboardState, kind: ReportKind) -> Result<()> {
    let view = state.report_view(kind);
    match view {
        TableView::Rows(_) | TableView::Empty => {}
        TableView::Failed(reason) => bail!("{} failed to load ({}); nothing exported", kind.title(), reason),
        TableView::Idle | TableView::Loading => bail!("{} has not been loaded", kind.title()),
    }

    let visibility = state.columns();
    let mut wtr = Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record(visible_titles(kind, visibility))?;
    for row in visible_body(view, state.aggregation(kind), visibility) {
        wtr.write_record(&row)?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{Metric, RawReportRow, StalePolicy, default_catalog};
    use serde_json::{Value, json};

    fn raw(value: Value) -> RawReportRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn loaded(kind: ReportKind, rows: Vec<RawReportRow>) -> DashboardState {
        let mut state = DashboardState::new(&default_catalog(), StalePolicy::default());
        let request = state.begin_report(kind);
        state.finish_report(kind, request.ticket, Ok(rows));
        state
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("dashboard-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_csv_export_visible_columns() {
        let mut state = loaded(
            ReportKind::TransactionTime,
            vec![
                raw(json!({"transaction_year_month": "2024-01", "online_qty": 4, "online_amt": 10})),
                raw(json!({"transaction_year_month": "2024-02", "beijing_qty": "6", "beijing_amt": "9.5"})),
            ],
        );
        state.set_column(Metric::Avg, false);

        let path = temp_path("transaction.csv");
        write_csv(&path, &state, ReportKind::TransactionTime).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header = reader.headers().unwrap().clone();
        // period + 6 groups x (qty, amt)
        assert_eq!(header.len(), 13);
        assert_eq!(&header[0], "Transaction month");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "Total");
        assert_eq!(&records[1][0], "2024-01");
        // Total group quantity of the summary line
        assert_eq!(&records[0][11], "10");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_csv_export_of_empty_report_has_summary_only() {
        let state = loaded(ReportKind::Analysis, Vec::new());
        let path = temp_path("analysis-empty.csv");
        write_csv(&path, &state, ReportKind::Analysis).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 26);
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][25], "0.0%");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_csv_export_refuses_failed_report() {
        let mut state = DashboardState::new(&default_catalog(), StalePolicy::default());
        let request = state.begin_report(ReportKind::Analysis);
        state.finish_report(
            ReportKind::Analysis,
            request.ticket,
            Err(dashboard_core::FetchError::Status(502)),
        );

        let path = temp_path("analysis-failed.csv");
        assert!(write_csv(&path, &state, ReportKind::Analysis).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_format_rows_aligns_columns() {
        let header = vec!["Month".to_string(), "Qty".to_string()];
        let body = vec![
            vec!["Total".to_string(), "1200".to_string()],
            vec!["2024-01".to_string(), "5".to_string()],
        ];
        let lines = format_rows(&header, &body);
        assert_eq!(lines[0], "Month     Qty");
        assert_eq!(lines[1], "-".repeat(13));
        assert_eq!(lines[2], "Total    1200");
        assert_eq!(lines[3], "2024-01     5");
    }
}
