use dashboard_core::render::{Cell, TableView, columns, group_headers, summary_line, visible_cells};
use dashboard_core::{ColumnVisibility, DashboardState, ReportKind};
use leptos::prelude::*;

/// First header row cell
enum HeaderCell {
    /// Column without a group; spans both header rows
    Plain(String),
    Group { title: &'static str, colspan: usize },
}

/// Two header rows: plain columns and group headers, then the visible
/// metric titles under each group
fn header_cells(kind: ReportKind, visibility: &ColumnVisibility) -> (Vec<HeaderCell>, Vec<String>) {
    let groups = group_headers(visibility);
    let mut top = Vec::new();
    let mut leaves = Vec::new();
    let mut current_group = None;

    for column in columns(kind) {
        let Some(group) = column.group else {
            top.push(HeaderCell::Plain(column.title));
            continue;
        };

        if current_group != Some(group) {
            current_group = Some(group);
            let colspan = groups.iter().find(|g| g.title == group).and_then(|g| g.colspan);
            if let Some(colspan) = colspan {
                top.push(HeaderCell::Group { title: group, colspan });
            }
        }

        if visibility.column_visible(column.class) {
            leaves.push(column.title);
        }
    }

    (top, leaves)
}

enum BodyLine {
    Placeholder { text: &'static str, failed: bool },
    Cells { cells: Vec<String>, summary: bool },
}

fn body_lines(kind: ReportKind, state: &DashboardState) -> Vec<BodyLine> {
    let visibility = state.columns();
    let texts = |cells: &[Cell]| -> Vec<String> {
        visible_cells(cells, visibility).map(|c| c.text.clone()).collect()
    };

    match state.report_view(kind) {
        TableView::Idle => Vec::new(),
        TableView::Rows(table) => std::iter::once(BodyLine::Cells {
            cells: texts(table.summary.as_slice()),
            summary: true,
        })
        .chain(table.rows.iter().map(|row| BodyLine::Cells {
            cells: texts(row.as_slice()),
            summary: false,
        }))
        .collect(),
        other => {
            let mut lines = Vec::new();
            // An empty report still shows its zeroed summary
            if let (TableView::Empty, Some(aggregation)) = (other, state.aggregation(kind)) {
                lines.push(BodyLine::Cells {
                    cells: texts(summary_line(aggregation).as_slice()),
                    summary: true,
                });
            }
            if let Some(text) = other.placeholder() {
                lines.push(BodyLine::Placeholder {
                    text,
                    failed: matches!(other, TableView::Failed(_)),
                });
            }
            lines
        }
    }
}

#[component]
pub fn ReportTable(state: RwSignal<DashboardState>, kind: ReportKind) -> impl IntoView {
    let header = move || {
        let (top, leaves) = state.with(|s| header_cells(kind, s.columns()));
        view! {
            <tr>
                {top
                    .into_iter()
                    .map(|cell| match cell {
                        HeaderCell::Plain(title) => view! { <th rowspan="2">{title}</th> }.into_any(),
                        HeaderCell::Group { title, colspan } => {
                            view! { <th colspan=colspan.to_string()>{title}</th> }.into_any()
                        }
                    })
                    .collect_view()}
            </tr>
            <tr>{leaves.into_iter().map(|title| view! { <th>{title}</th> }).collect_view()}</tr>
        }
    };

    let body = move || {
        state
            .with(|s| body_lines(kind, s))
            .into_iter()
            .map(|line| match line {
                BodyLine::Placeholder { text, failed } => {
                    let class = if failed { "text-center text-danger" } else { "text-center text-muted" };
                    view! {
                        <tr>
                            <td colspan=kind.column_count().to_string() class=class>{text}</td>
                        </tr>
                    }
                    .into_any()
                }
                BodyLine::Cells { cells, summary } => {
                    let class = if summary { "summary-row font-bold" } else { "" };
                    view! { <tr class=class>{cells.into_iter().map(|c| view! { <td>{c}</td> }).collect_view()}</tr> }
                        .into_any()
                }
            })
            .collect_view()
    };

    view! {
        <div class="overflow-x-auto">
            <table class="report-table">
                <thead>{header}</thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
}
