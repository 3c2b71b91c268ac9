#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the geospatial accident-history search service.
//!
//! The service is an Elasticsearch-style `_search` endpoint holding
//! historical accident records. The scoring pipeline treats it as a black
//! box: given a coordinate, it returns the records within a fixed 1 km
//! radius, each exposing the four scored attributes.

pub mod elastic;

use accident_risk_models::AccidentRecord;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Fixed geo filter radius sent with every search.
pub const SEARCH_RADIUS: &str = "1km";

/// Errors from the accident-history data source.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response body did not have the expected shape.
    #[error("Malformed search response: {message}")]
    Response {
        /// Description of what was missing or unexpected.
        message: String,
    },

    /// Configuration parsing failed.
    #[error("Invalid search config: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

/// Connection settings for the search service, deserializable from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Full URL of the `_search` endpoint.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl SearchConfig {
    /// Parses a configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the document is not valid TOML
    /// or is missing required keys.
    pub fn from_toml_str(document: &str) -> Result<Self, SearchError> {
        toml::from_str(document).map_err(|e| SearchError::Config {
            message: e.to_string(),
        })
    }
}

const fn default_request_timeout_secs() -> u64 {
    30
}

/// A source of accident records near a coordinate.
///
/// Implemented by [`elastic::SearchClient`] for the real service and by
/// stubs in tests.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns the accident records within [`SEARCH_RADIUS`] of a point.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request or response parsing fails.
    async fn records_near(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<AccidentRecord>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_from_toml() {
        let config = SearchConfig::from_toml_str(
            r#"
            endpoint = "http://search.example.com/accidents/_search"
            request_timeout_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://search.example.com/accidents/_search");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn config_timeout_defaults_when_omitted() {
        let config = SearchConfig::from_toml_str(
            r#"endpoint = "http://search.example.com/accidents/_search""#,
        )
        .unwrap();
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn config_requires_an_endpoint() {
        assert!(matches!(
            SearchConfig::from_toml_str("request_timeout_secs = 10"),
            Err(SearchError::Config { .. })
        ));
    }
}
