//! Centralized constants for the dashboard CLI

/// Default config file path
pub const CONFIG_FILE: &str = "dashboard.toml";

/// Request timeout when the config does not set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "dashboard_cli=info,dashboard_core=info";

/// Log filter for `--verbose`
pub const VERBOSE_LOG_FILTER: &str = "dashboard_cli=debug,dashboard_core=debug";

/// Separator width for console tables and headings
pub const RULE_WIDTH: usize = 60;
