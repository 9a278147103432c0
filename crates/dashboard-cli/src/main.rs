//! Transaction analysis dashboard CLI
//!
//! Runs the dashboard's filter and report cycles against a live service:
//! reconciles the cascading facets for a selection, fetches and aggregates the
//! two reports, and exports them as CSV. Saved report responses can also be
//! aggregated offline.

mod client;
mod config;
mod constants;
mod reports;
mod session;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use dashboard_core::render::TableView;
use dashboard_core::wire::decode_report_rows;
use dashboard_core::{CycleOutcome, DashboardState, Metric, ReportKind, StalePolicy, TimeRange, default_catalog};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client::ServiceClient;
use config::{Config, FileConfig};
use session::Selection;

#[derive(Parser, Debug)]
#[command(name = "dashboard-cli")]
#[command(about = "Cascading filters and report aggregation for the transaction analysis dashboard")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = constants::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Service base URL (overrides [service] base_url)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile the facets for a selection and list what is still offered
    Options {
        /// Facet value to keep checked, as key=value (repeatable)
        #[arg(long = "filter", value_parser = session::parse_filter)]
        filters: Vec<(String, String)>,

        /// Leave this facet unconstrained in the request
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Fetch and aggregate one report
    Report {
        #[arg(value_enum)]
        kind: ReportArg,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Export the visible columns to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Fetch both reports together, like the page's apply button
    Apply {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Directory for analysis.csv and transaction_time.csv
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },

    /// Aggregate a saved JSON report response offline
    Aggregate {
        #[arg(value_enum)]
        kind: ReportArg,

        /// JSON file holding the report response body
        #[arg(long)]
        input: PathBuf,

        /// Hide a metric column: qty, amt or avg (repeatable)
        #[arg(long)]
        hide: Vec<Metric>,

        /// Export the visible columns to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportArg {
    Analysis,
    Transaction,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Analysis => ReportKind::Analysis,
            ReportArg::Transaction => ReportKind::TransactionTime,
        }
    }
}

/// Selection flags shared by `report` and `apply`
#[derive(ClapArgs, Debug, Clone, Default)]
struct SelectionArgs {
    /// Facet value to keep checked, as key=value (repeatable)
    #[arg(long = "filter", value_parser = session::parse_filter)]
    filters: Vec<(String, String)>,

    /// Project ids to keep checked (comma separated); all by default
    #[arg(long, value_delimiter = ',')]
    projects: Option<Vec<String>>,

    /// Production month lower bound (YYYY-MM)
    #[arg(long, default_value = "")]
    production_start: String,

    /// Production month upper bound (YYYY-MM)
    #[arg(long, default_value = "")]
    production_end: String,

    /// Transaction date lower bound (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    transaction_start: String,

    /// Transaction date upper bound (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    transaction_end: String,

    /// Hide a metric column: qty, amt or avg (repeatable)
    #[arg(long)]
    hide: Vec<Metric>,
}

impl From<SelectionArgs> for Selection {
    fn from(args: SelectionArgs) -> Self {
        Selection {
            filters: args.filters,
            projects: args.projects,
            time_range: TimeRange {
                production_start_month: args.production_start,
                production_end_month: args.production_end,
                transaction_start_date: args.transaction_start,
                transaction_end_date: args.transaction_end,
            },
            hidden: args.hide,
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        constants::VERBOSE_LOG_FILTER
    } else {
        constants::DEFAULT_LOG_FILTER
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config file, or fall back to defaults when only --base-url is given
fn load_config(path: &Path, base_url: Option<String>) -> Result<Config> {
    if !path.exists() {
        if base_url.is_none() {
            anyhow::bail!(
                "Config file '{}' not found.\n\n\
                To get started:\n\
                1. Copy dashboard.toml.example to dashboard.toml\n\
                2. Set [service] base_url\n\n\
                Or pass --base-url to run with the built-in defaults.",
                path.display()
            );
        }
        return Config::from_file(FileConfig::default(), base_url);
    }

    Config::from_file(FileConfig::load(path)?, base_url)
}

fn print_generated_at() {
    println!("Generated {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Options { filters, exclude } => {
            let config = load_config(&args.config, args.base_url)?;
            info!(service = %config.base_url, "loading filter options");
            let client = ServiceClient::new(config)?;

            let mut state = session::initial_state(&client).await?;
            let narrowed = session::apply_filters(&mut state, &filters)?;
            if narrowed || exclude.is_some() {
                session::refresh_filters(&client, &mut state, exclude.as_deref()).await?;
            }

            reports::print_facets(&state);
            Ok(())
        }

        Command::Report { kind, selection, csv } => {
            let kind = ReportKind::from(kind);
            let config = load_config(&args.config, args.base_url)?;
            let client = ServiceClient::new(config)?;

            let mut state = session::prepare(&client, &selection.into()).await?;
            let outcome = session::load_report(&client, &mut state, kind).await;

            print_generated_at();
            reports::print_table(&state, kind);

            if let (Some(path), CycleOutcome::Applied) = (csv, outcome) {
                reports::write_csv(&path, &state, kind)?;
                println!("\nWrote {}", path.display());
            }
            Ok(())
        }

        Command::Apply { selection, csv_dir } => {
            let config = load_config(&args.config, args.base_url)?;
            let client = ServiceClient::new(config)?;

            let mut state = session::prepare(&client, &selection.into()).await?;
            session::load_reports(&client, &mut state).await;

            print_generated_at();
            for kind in ReportKind::ALL {
                reports::print_table(&state, kind);
            }

            if let Some(dir) = csv_dir {
                export_all(&dir, &state)?;
            }
            Ok(())
        }

        Command::Aggregate { kind, input, hide, csv } => {
            let kind = ReportKind::from(kind);
            let body = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let rows = decode_report_rows(&body).with_context(|| format!("Failed to decode {}", input.display()))?;
            info!(rows = rows.len(), input = %input.display(), "aggregating saved report");

            let mut state = DashboardState::new(&default_catalog(), StalePolicy::default());
            if args.config.exists() {
                let file_config = FileConfig::load(&args.config)?;
                state.set_columns(file_config.columns);
            }
            for metric in hide {
                state.set_column(metric, false);
            }

            let request = state.begin_report(kind);
            state.finish_report(kind, request.ticket, Ok(rows));
            reports::print_table(&state, kind);

            if let Some(path) = csv {
                reports::write_csv(&path, &state, kind)?;
                println!("\nWrote {}", path.display());
            }
            Ok(())
        }
    }
}

/// CSV for each report that loaded; failed reports are skipped
fn export_all(dir: &Path, state: &DashboardState) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    for kind in ReportKind::ALL {
        if matches!(state.report_view(kind), TableView::Failed(_)) {
            continue;
        }
        let path = dir.join(csv_file_name(kind));
        reports::write_csv(&path, state, kind)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn csv_file_name(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Analysis => "analysis.csv",
        ReportKind::TransactionTime => "transaction_time.csv",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_args_parse() {
        let args = Args::try_parse_from([
            "dashboard-cli",
            "report",
            "analysis",
            "--filter",
            "province=Gansu",
            "--filter",
            "is_uhv_support=1",
            "--projects",
            "3,7",
            "--production-start",
            "2024-01",
            "--hide",
            "avg",
        ])
        .unwrap();

        match args.command {
            Command::Report { kind, selection, csv } => {
                assert_eq!(ReportKind::from(kind), ReportKind::Analysis);
                assert!(csv.is_none());
                let selection = Selection::from(selection);
                assert_eq!(selection.filters.len(), 2);
                assert_eq!(selection.filters[1], ("is_uhv_support".to_string(), "1".to_string()));
                assert_eq!(selection.projects, Some(vec!["3".to_string(), "7".to_string()]));
                assert_eq!(selection.time_range.production_start_month, "2024-01");
                assert!(selection.time_range.transaction_end_date.is_empty());
                assert_eq!(selection.hidden, vec![Metric::Avg]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_filter_rejected() {
        assert!(Args::try_parse_from(["dashboard-cli", "options", "--filter", "province"]).is_err());
    }

    #[test]
    fn test_missing_config_needs_base_url() {
        let path = std::env::temp_dir().join("dashboard-cli-no-such-config.toml");
        assert!(load_config(&path, None).is_err());
        let config = load_config(&path, Some("http://localhost:5000".into())).unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");
    }
}
