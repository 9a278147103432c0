//! Report table view model
//!
//! A stateless projection of an [`Aggregation`] into display cells. Each cell
//! carries its column class so front ends can apply [`ColumnVisibility`]
//! without knowing the layout.

use crate::aggregate::{AggregatedRow, Aggregation, Channel, ChannelMetrics, DerivedMetrics, LedgerMetrics, ReportKind};
use crate::columns::{ColumnClass, ColumnVisibility, Metric};
use crate::error::FetchError;
use crate::numeric::{format_fixed2, format_plain, format_rounded};

pub const LOADING_TEXT: &str = "Loading...";
pub const NO_DATA_TEXT: &str = "No data";
pub const LOAD_FAILED_TEXT: &str = "Failed to load data, please retry";
pub const SUMMARY_LABEL: &str = "Total";

/// Title of the trailing "all channels" group
pub const TOTAL_GROUP_TITLE: &str = "Trading platforms total";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub class: ColumnClass,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: ColumnClass::Plain,
        }
    }

    fn metric(metric: Metric, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: ColumnClass::Metric(metric),
        }
    }
}

/// One leaf column of a report table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub class: ColumnClass,
    /// Group header this column sits under, if any
    pub group: Option<&'static str>,
}

/// Group header spanning one channel's metric columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeader {
    pub title: &'static str,
    /// `None` when every metric is hidden; the header is not shown
    pub colspan: Option<usize>,
}

/// Summary row plus data rows, in response order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub summary: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

/// What a report table body currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableView {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    /// The service returned no rows
    Empty,
    /// Transport failure; the message is for diagnostics only
    Failed(String),
    Rows(RenderedTable),
}

impl TableView {
    /// Text of the single placeholder row, if the body is a placeholder
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            TableView::Idle | TableView::Rows(_) => None,
            TableView::Loading => Some(LOADING_TEXT),
            TableView::Empty => Some(NO_DATA_TEXT),
            TableView::Failed(_) => Some(LOAD_FAILED_TEXT),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, TableView::Loading)
    }
}

fn metric_groups() -> impl Iterator<Item = &'static str> {
    Channel::ALL
        .into_iter()
        .map(Channel::label)
        .chain(std::iter::once(TOTAL_GROUP_TITLE))
}

/// Leaf columns of `kind`, in display order
pub fn columns(kind: ReportKind) -> Vec<Column> {
    let plain = |title: &str| Column {
        title: title.to_string(),
        class: ColumnClass::Plain,
        group: None,
    };

    let mut columns = vec![plain(match kind {
        ReportKind::Analysis => "Production month",
        ReportKind::TransactionTime => "Transaction month",
    })];

    if kind.has_ledger() {
        columns.extend(
            [
                "Total issued",
                "Ordinary green",
                "Green-green",
                "Issued platform sold",
                "Inventory",
            ]
            .into_iter()
            .map(plain),
        );
    }

    for group in metric_groups() {
        for metric in Metric::ALL {
            columns.push(Column {
                title: metric.label().to_string(),
                class: ColumnClass::Metric(metric),
                group: Some(group),
            });
        }
    }

    if kind.has_ledger() {
        columns.push(plain("Issued sold ratio"));
        columns.push(plain("Trading ratio"));
    }

    columns
}

/// Group headers with their colspan under the current toggles
pub fn group_headers(visibility: &ColumnVisibility) -> Vec<GroupHeader> {
    let colspan = visibility.group_colspan();
    metric_groups().map(|title| GroupHeader { title, colspan }).collect()
}

/// Flat titles of the visible columns ("Online listing Quantity")
pub fn visible_titles(kind: ReportKind, visibility: &ColumnVisibility) -> Vec<String> {
    columns(kind)
        .into_iter()
        .filter(|c| visibility.column_visible(c.class))
        .map(|c| match c.group {
            Some(group) => format!("{} {}", group, c.title),
            None => c.title,
        })
        .collect()
}

/// Cells of `row` that are visible under `visibility`
pub fn visible_cells<'a>(row: &'a [Cell], visibility: &'a ColumnVisibility) -> impl Iterator<Item = &'a Cell> {
    row.iter().filter(move |c| visibility.column_visible(c.class))
}

/// Average display: two decimals, or a bare `0` when there is no quantity
fn average_text(avg: f64, qty: f64) -> String {
    if qty > 0.0 { format_fixed2(avg) } else { "0".to_string() }
}

/// How raw channel values are shown on a line
#[derive(Clone, Copy)]
enum Line {
    /// Data row: raw values as returned
    Data,
    /// Summary row: quantities rounded, amounts fixed
    Summary,
}

fn channel_cells(line: Line, channels: &[ChannelMetrics; 5], derived: &DerivedMetrics, cells: &mut Vec<Cell>) {
    for channel in Channel::ALL {
        let metrics = channels[channel as usize];
        let (qty, amt) = match line {
            Line::Data => (format_plain(metrics.qty), format_plain(metrics.amt)),
            Line::Summary => (format_rounded(metrics.qty), format_fixed2(metrics.amt)),
        };
        cells.push(Cell::metric(Metric::Qty, qty));
        cells.push(Cell::metric(Metric::Amt, amt));
        cells.push(Cell::metric(Metric::Avg, average_text(derived.channel_avg(channel), metrics.qty)));
    }

    cells.push(Cell::metric(Metric::Qty, format_rounded(derived.total_qty)));
    cells.push(Cell::metric(Metric::Amt, format_fixed2(derived.total_amt)));
    cells.push(Cell::metric(Metric::Avg, average_text(derived.total_avg, derived.total_qty)));
}

fn build_line(
    line: Line,
    label: String,
    channels: &[ChannelMetrics; 5],
    ledger: Option<&LedgerMetrics>,
    derived: &DerivedMetrics,
) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(26);
    cells.push(Cell::plain(label));

    let ledger_view = ledger.zip(derived.ledger.as_ref());
    if let Some((raw, computed)) = ledger_view {
        let raw_text = |n: f64| match line {
            Line::Data => format_plain(n),
            Line::Summary => format_rounded(n),
        };
        cells.push(Cell::plain(format_rounded(computed.total_issued)));
        cells.push(Cell::plain(raw_text(raw.ordinary_green)));
        cells.push(Cell::plain(raw_text(raw.green_green)));
        cells.push(Cell::plain(raw_text(raw.issued_platform_sold)));
        cells.push(Cell::plain(format_rounded(computed.inventory)));
    }

    channel_cells(line, channels, derived, &mut cells);

    if let Some((_, computed)) = ledger_view {
        cells.push(Cell::plain(computed.issued_ratio.clone()));
        cells.push(Cell::plain(computed.trading_ratio.clone()));
    }

    cells
}

fn data_line(row: &AggregatedRow) -> Vec<Cell> {
    build_line(
        Line::Data,
        row.row.period.clone(),
        &row.row.channels,
        row.row.ledger.as_ref(),
        &row.derived,
    )
}

/// Summary row cells. An empty aggregation yields the zero placeholders.
pub fn summary_line(aggregation: &Aggregation) -> Vec<Cell> {
    let summary = &aggregation.summary;
    build_line(
        Line::Summary,
        SUMMARY_LABEL.to_string(),
        &summary.channels,
        summary.ledger.as_ref(),
        &summary.derived,
    )
}

/// Project an aggregation into a table body
pub fn render(aggregation: &Aggregation) -> TableView {
    if aggregation.is_empty() {
        return TableView::Empty;
    }

    TableView::Rows(RenderedTable {
        summary: summary_line(aggregation),
        rows: aggregation.rows.iter().map(data_line).collect(),
    })
}

/// Table body for a finished fetch
pub fn render_result(result: &Result<Aggregation, FetchError>) -> TableView {
    match result {
        Ok(aggregation) => render(aggregation),
        Err(err) => TableView::Failed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::reduce;
    use crate::wire::RawReportRow;
    use serde_json::{Value, json};

    fn rows(values: Vec<Value>) -> Vec<RawReportRow> {
        values
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()
    }

    fn texts(cells: &[Cell]) -> Vec<&str> {
        cells.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_column_counts() {
        assert_eq!(columns(ReportKind::Analysis).len(), ReportKind::Analysis.column_count());
        assert_eq!(
            columns(ReportKind::TransactionTime).len(),
            ReportKind::TransactionTime.column_count()
        );
    }

    #[test]
    fn test_rendered_rows_match_column_count() {
        for kind in ReportKind::ALL {
            let aggregation = reduce(kind, &rows(vec![json!({"online_qty": 1, "online_amt": 2})]));
            let TableView::Rows(table) = render(&aggregation) else {
                panic!("expected rows");
            };
            assert_eq!(table.summary.len(), kind.column_count());
            assert_eq!(table.rows[0].len(), kind.column_count());
        }
    }

    #[test]
    fn test_unilateral_scenario_cells() {
        let aggregation = reduce(
            ReportKind::Analysis,
            &rows(vec![json!({
                "production_year_month": "2024-05",
                "unilateral_qty": 10,
                "unilateral_amt": 100,
                "ordinary_green": 0
            })]),
        );
        let TableView::Rows(table) = render(&aggregation) else {
            panic!("expected rows");
        };
        let row = texts(&table.rows[0]);

        assert_eq!(row[0], "2024-05");
        // unilateral qty / amt / avg
        assert_eq!(&row[6..9], &["10", "100", "10.00"]);
        // online avg without quantity
        assert_eq!(row[11], "0");
        // total qty / amt / avg
        assert_eq!(&row[21..24], &["10", "100.00", "10.00"]);
        assert_eq!(&row[24..], &["0.0%", "0.0%"]);

        let summary = texts(&table.summary);
        assert_eq!(summary[0], SUMMARY_LABEL);
        assert_eq!(&summary[6..9], &["10", "100.00", "10.00"]);
    }

    #[test]
    fn test_empty_response_renders_placeholder() {
        let aggregation = reduce(ReportKind::TransactionTime, &[]);
        let view = render(&aggregation);
        assert_eq!(view, TableView::Empty);
        assert_eq!(view.placeholder(), Some(NO_DATA_TEXT));

        // The zeroed summary is still available for display
        let summary = summary_line(&aggregation);
        assert_eq!(summary.len(), 19);
        assert_eq!(&texts(&summary)[1..4], &["0", "0.00", "0"]);
    }

    #[test]
    fn test_failed_fetch_placeholder() {
        let view = render_result(&Err(FetchError::Status(500)));
        assert_eq!(view.placeholder(), Some(LOAD_FAILED_TEXT));
        assert!(matches!(view, TableView::Failed(_)));
    }

    #[test]
    fn test_hiding_quantity_columns() {
        let mut visibility = ColumnVisibility::default();
        visibility.set(Metric::Qty, false);

        let titles = visible_titles(ReportKind::TransactionTime, &visibility);
        assert_eq!(titles.len(), 19 - 6);
        assert!(titles.iter().all(|t| !t.ends_with("Quantity")));
        assert!(group_headers(&visibility).iter().all(|g| g.colspan == Some(2)));

        let aggregation = reduce(ReportKind::TransactionTime, &rows(vec![json!({"online_qty": 3})]));
        let TableView::Rows(table) = render(&aggregation) else {
            panic!("expected rows");
        };
        assert_eq!(visible_cells(&table.rows[0], &visibility).count(), 13);
    }

    #[test]
    fn test_group_headers_hidden_when_all_off() {
        let visibility = ColumnVisibility {
            qty: false,
            amt: false,
            avg: false,
        };
        let headers = group_headers(&visibility);
        assert_eq!(headers.len(), 6);
        assert!(headers.iter().all(|g| g.colspan.is_none()));
        assert_eq!(visible_titles(ReportKind::Analysis, &visibility).len(), 8);
    }
}
