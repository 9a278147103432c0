//! JSON POST helper over gloo-net

use dashboard_core::FetchError;
use gloo_net::http::Request;
use serde::Serialize;

/// POST `body` as JSON and return the raw response text.
/// Non-2xx statuses are errors; decoding is left to the caller.
pub async fn post_json<B: Serialize>(url: &str, body: &B) -> Result<String, FetchError> {
    let payload = serde_json::to_string(body)?;

    let response = Request::post(url)
        .header("Content-Type", "application/json")
        .body(payload)
        .map_err(|e| FetchError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if !response.ok() {
        web_sys::console::error_1(&format!("HTTP error from {}: {}", url, response.status()).into());
        return Err(FetchError::Status(response.status()));
    }

    response.text().await.map_err(|e| FetchError::Transport(e.to_string()))
}
