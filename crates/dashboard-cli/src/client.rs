//! HTTP client for the three dashboard services

use anyhow::{Context, Result};
use dashboard_core::wire::{decode_filter_options, decode_report_rows};
use dashboard_core::{CombinedSelection, FetchError, FilterOptionsResponse, RawReportRow, ReportKind, SelectionDocument};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;

pub struct ServiceClient {
    http: reqwest::Client,
    config: Config,
}

impl ServiceClient {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Option sets for `selection`
    pub async fn filter_options(&self, selection: &SelectionDocument) -> Result<FilterOptionsResponse, FetchError> {
        let body = self.post_json(&self.config.filter_options_url(), selection).await?;
        decode_filter_options(&body)
    }

    /// Rows of one report
    pub async fn report(&self, kind: ReportKind, selection: &CombinedSelection) -> Result<Vec<RawReportRow>, FetchError> {
        let body = self.post_json(&self.config.report_url(kind), selection).await?;
        decode_report_rows(&body)
    }

    /// POST `body` as JSON, returning the raw response text
    async fn post_json<B: Serialize>(&self, url: &str, body: &B) -> Result<String, FetchError> {
        debug!(url, "POST");

        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        debug!(url, bytes = text.len(), "response received");
        Ok(text)
    }
}
