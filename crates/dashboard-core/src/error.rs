//! Fetch error taxonomy shared by the web and CLI transports

use thiserror::Error;

/// Failure of one remote request.
///
/// None of these are fatal: a failed dynamic-filter cycle leaves the facets
/// untouched and a failed report fetch becomes a "load failed" table row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (connection, DNS, timeout)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Service returned status: {0}")]
    Status(u16),

    /// The response body was not the expected JSON shape
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::Status(502).to_string(), "Service returned status: 502");
        assert_eq!(
            FetchError::Transport("connection refused".into()).to_string(),
            "Request failed: connection refused"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::Decode(_)));
    }
}
