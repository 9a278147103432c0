use dashboard_core::catalog::DEFAULT_FACETS;
use dashboard_core::wire::{ANALYSIS_DATA_PATH, DYNAMIC_FILTER_OPTIONS_PATH, TRANSACTION_TIME_DATA_PATH};
use dashboard_core::{FacetKind, FacetSpec, ReportKind, StalePolicy};

/// Static dashboard configuration
pub struct Config {
    pub title: &'static str,

    /// Prefix for the service paths; empty means same origin
    pub base_url: &'static str,
    pub endpoints: Endpoints,

    pub facets: &'static [(&'static str, &'static str, FacetKind)],
    pub stale_policy: StalePolicy,
}

pub struct Endpoints {
    pub dynamic_filter_options: &'static str,
    pub analysis: &'static str,
    pub transaction_time: &'static str,
}

impl Config {
    pub fn catalog(&self) -> Vec<FacetSpec> {
        self.facets
            .iter()
            .map(|(key, label, kind)| FacetSpec::new(key, label, *kind))
            .collect()
    }

    pub fn filter_options_url(&self) -> String {
        format!("{}{}", self.base_url, self.endpoints.dynamic_filter_options)
    }

    pub fn report_url(&self, kind: ReportKind) -> String {
        let path = match kind {
            ReportKind::Analysis => self.endpoints.analysis,
            ReportKind::TransactionTime => self.endpoints.transaction_time,
        };
        format!("{}{}", self.base_url, path)
    }
}

pub static CONFIG: Config = Config {
    title: "Green certificate transaction analysis",

    base_url: "",
    endpoints: Endpoints {
        dynamic_filter_options: DYNAMIC_FILTER_OPTIONS_PATH,
        analysis: ANALYSIS_DATA_PATH,
        transaction_time: TRANSACTION_TIME_DATA_PATH,
    },

    facets: DEFAULT_FACETS,
    stale_policy: StalePolicy::DiscardStale,
};
