//! Request / response contracts of the three dashboard services
//!
//! All three are `POST` with a JSON body equal to the selection document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::FetchError;

/// Dynamic filter options endpoint
pub const DYNAMIC_FILTER_OPTIONS_PATH: &str = "/get_dynamic_filter_options";
/// Monthly analysis report endpoint
pub const ANALYSIS_DATA_PATH: &str = "/get_analysis_data";
/// Transaction-time report endpoint
pub const TRANSACTION_TIME_DATA_PATH: &str = "/get_transaction_time_data";

/// Endpoint paths, relative to the service base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub dynamic_filter_options: String,
    pub analysis: String,
    pub transaction_time: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            dynamic_filter_options: DYNAMIC_FILTER_OPTIONS_PATH.to_string(),
            analysis: ANALYSIS_DATA_PATH.to_string(),
            transaction_time: TRANSACTION_TIME_DATA_PATH.to_string(),
        }
    }
}

/// One project offered by the dynamic-filter service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub project_name: String,
}

/// Ids come back as numbers; checkbox values are strings
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unsupported project id: {}", other))),
    }
}

/// Dynamic-filter response: option entries per facet plus matching projects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptionsResponse {
    /// Raw entries per facet key: plain values, or `[bool, ...]` tuples
    pub options: HashMap<String, Vec<Value>>,
    pub projects: Vec<ProjectEntry>,
}

/// Lenient shape: missing / null sections read as empty
#[derive(Debug, Deserialize)]
struct RawFilterOptionsResponse {
    #[serde(default)]
    options: Option<HashMap<String, Value>>,
    #[serde(default)]
    projects: Option<Vec<ProjectEntry>>,
}

impl From<RawFilterOptionsResponse> for FilterOptionsResponse {
    fn from(raw: RawFilterOptionsResponse) -> Self {
        let options = raw
            .options
            .unwrap_or_default()
            .into_iter()
            .map(|(key, entries)| match entries {
                Value::Array(items) => (key, items),
                _ => (key, Vec::new()),
            })
            .collect();

        Self {
            options,
            projects: raw.projects.unwrap_or_default(),
        }
    }
}

impl<'de> Deserialize<'de> for FilterOptionsResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawFilterOptionsResponse::deserialize(deserializer).map(Into::into)
    }
}

/// Untyped report row as returned by either report service
pub type RawReportRow = Map<String, Value>;

/// Decode a dynamic-filter response body
pub fn decode_filter_options(body: &str) -> Result<FilterOptionsResponse, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Decode a report response body.
///
/// An empty body or `null` means "no data". Entries that are not objects are
/// kept as empty records so every returned row is still counted.
pub fn decode_report_rows(body: &str) -> Result<Vec<RawReportRow>, FetchError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(body)?;
    report_rows_from_value(value)
}

/// Same as [`decode_report_rows`] for an already parsed body
pub fn report_rows_from_value(value: Value) -> Result<Vec<RawReportRow>, FetchError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => map,
                _ => Map::new(),
            })
            .collect()),
        other => Err(FetchError::Decode(format!(
            "expected an array of report rows, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_filter_options() {
        let body = r#"{
            "options": {"province": ["Gansu", "Hebei"], "is_uhv_support": [[true, 2]], "region": null},
            "projects": [{"id": 7, "project_name": "Gansu Wind"}, {"id": "8", "project_name": "Hebei PV"}]
        }"#;
        let response = decode_filter_options(body).unwrap();

        assert_eq!(response.options["province"], vec![json!("Gansu"), json!("Hebei")]);
        assert!(response.options["region"].is_empty());
        assert_eq!(response.projects[0].id, "7");
        assert_eq!(response.projects[1].id, "8");
    }

    #[test]
    fn test_decode_filter_options_missing_sections() {
        let response = decode_filter_options("{}").unwrap();
        assert!(response.options.is_empty());
        assert!(response.projects.is_empty());
    }

    #[test]
    fn test_decode_report_rows_null_and_empty() {
        assert!(decode_report_rows("null").unwrap().is_empty());
        assert!(decode_report_rows("[]").unwrap().is_empty());
        assert!(decode_report_rows("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_report_rows_keeps_malformed_entries() {
        let rows = decode_report_rows(r#"[{"online_qty": "5"}, 3]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].is_empty());
    }

    #[test]
    fn test_decode_report_rows_rejects_object() {
        let err = decode_report_rows(r#"{"error": "boom"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(decode_report_rows("not json").is_err());
    }

    #[test]
    fn test_endpoint_defaults() {
        let endpoints: Endpoints = serde_json::from_str(r#"{"analysis": "/v2/analysis"}"#).unwrap();
        assert_eq!(endpoints.analysis, "/v2/analysis");
        assert_eq!(endpoints.dynamic_filter_options, DYNAMIC_FILTER_OPTIONS_PATH);
    }
}
