//! Configuration for the dashboard CLI

use anyhow::{Context, Result};
use dashboard_core::{ColumnVisibility, Endpoints, FacetSpec, ReportKind, StalePolicy, default_catalog};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::constants;

// =============================================================================
// File-based Configuration (dashboard.toml)
// =============================================================================

/// Configuration loaded from dashboard.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub filters: FiltersSection,
    /// Catalogue override; the built-in catalogue is used when absent
    #[serde(default)]
    pub facets: Option<Vec<FacetSpec>>,
    #[serde(default)]
    pub columns: ColumnVisibility,
}

/// Where the dashboard service lives
#[derive(Debug, Default, Deserialize)]
pub struct ServiceSection {
    pub base_url: Option<String>,
    #[serde(default)]
    pub endpoints: Endpoints,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FiltersSection {
    #[serde(default = "default_discard_stale")]
    pub discard_stale_responses: bool,
}

impl Default for FiltersSection {
    fn default() -> Self {
        Self {
            discard_stale_responses: default_discard_stale(),
        }
    }
}

fn default_discard_stale() -> bool {
    true
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    /// Service root, without a trailing slash
    pub base_url: String,
    pub endpoints: Endpoints,
    pub timeout: Duration,
    pub stale_policy: StalePolicy,
    pub catalog: Vec<FacetSpec>,
    /// Column toggles before any `--hide`
    pub columns: ColumnVisibility,
}

impl Config {
    /// Create config from file config and optional base URL override
    pub fn from_file(file_config: FileConfig, base_url: Option<String>) -> Result<Self> {
        let base_url = base_url.or(file_config.service.base_url).context(
            "No service URL configured.\n\n\
            Set [service] base_url in dashboard.toml or pass --base-url.",
        )?;

        let catalog = match file_config.facets {
            Some(facets) if !facets.is_empty() => facets,
            _ => default_catalog(),
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints: file_config.service.endpoints,
            timeout: Duration::from_secs(
                file_config
                    .service
                    .timeout_secs
                    .unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
            stale_policy: StalePolicy::from_discard_flag(file_config.filters.discard_stale_responses),
            catalog,
            columns: file_config.columns,
        })
    }

    pub fn filter_options_url(&self) -> String {
        self.url(&self.endpoints.dynamic_filter_options)
    }

    pub fn report_url(&self, kind: ReportKind) -> String {
        match kind {
            ReportKind::Analysis => self.url(&self.endpoints.analysis),
            ReportKind::TransactionTime => self.url(&self.endpoints.transaction_time),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::FacetKind;

    #[test]
    fn test_full_config() {
        let file = FileConfig::parse(
            r#"
            [service]
            base_url = "http://dash.local:5000/"
            timeout_secs = 5

            [service.endpoints]
            analysis = "/v2/analysis"

            [filters]
            discard_stale_responses = false

            [columns]
            avg = false

            [[facets]]
            key = "province"
            label = "Province"

            [[facets]]
            key = "has_subsidy"
            label = "Subsidized"
            kind = "boolean"
            "#,
        )
        .unwrap();

        let config = Config::from_file(file, None).unwrap();
        assert_eq!(config.base_url, "http://dash.local:5000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.stale_policy, StalePolicy::AcceptAll);
        assert_eq!(config.report_url(ReportKind::Analysis), "http://dash.local:5000/v2/analysis");
        assert_eq!(
            config.filter_options_url(),
            "http://dash.local:5000/get_dynamic_filter_options"
        );
        assert!(config.columns.qty && !config.columns.avg);
        assert_eq!(config.catalog.len(), 2);
        assert_eq!(config.catalog[0].kind, FacetKind::Categorical);
        assert_eq!(config.catalog[1].kind, FacetKind::Boolean);
    }

    #[test]
    fn test_defaults_with_base_url_override() {
        let config = Config::from_file(FileConfig::default(), Some("http://localhost:8000".into())).unwrap();
        assert_eq!(config.stale_policy, StalePolicy::DiscardStale);
        assert_eq!(config.timeout, Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.catalog.len(), 8);
        assert_eq!(
            config.report_url(ReportKind::TransactionTime),
            "http://localhost:8000/get_transaction_time_data"
        );
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        let file = FileConfig::parse("[filters]\ndiscard_stale_responses = true\n").unwrap();
        assert!(Config::from_file(file, None).is_err());
    }

    #[test]
    fn test_override_wins_over_file() {
        let file = FileConfig::parse("[service]\nbase_url = \"http://a\"\n").unwrap();
        let config = Config::from_file(file, Some("http://b".into())).unwrap();
        assert_eq!(config.base_url, "http://b");
    }
}
