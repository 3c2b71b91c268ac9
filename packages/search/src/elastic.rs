//! Elasticsearch-style search client.
//!
//! Every query is a `POST` to the configured `_search` endpoint with a
//! `geo_distance` filter and an explicit field list, so the service only
//! returns the four attributes the scoring pipeline reads. Matching
//! records come back under `hits.hits[].fields`, each field value wrapped
//! in a single-element array.

use std::time::Duration;

use accident_risk_models::{AccidentRecord, RECORD_FIELDS};
use async_trait::async_trait;
use serde_json::Value;

use crate::{RecordSource, SEARCH_RADIUS, SearchConfig, SearchError};

/// HTTP client for the accident-history search service.
pub struct SearchClient {
    client: reqwest::Client,
    config: SearchConfig,
}

impl SearchClient {
    /// Builds a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl RecordSource for SearchClient {
    async fn records_near(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<AccidentRecord>, SearchError> {
        log::debug!("searching accident records near ({latitude}, {longitude})");

        let resp = self
            .client
            .post(&self.config.endpoint)
            .json(&build_query(latitude, longitude))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SearchError::Response {
                message: format!("search service returned status {}", resp.status()),
            });
        }

        let body: Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Builds the search envelope: match-all scoped by a `geo_distance` filter
/// with the fixed radius, requesting exactly the four scored fields.
fn build_query(latitude: f64, longitude: f64) -> Value {
    serde_json::json!({
        "fields": RECORD_FIELDS,
        "query": {
            "bool": {
                "must": { "match_all": {} },
                "filter": {
                    "geo_distance": {
                        "distance": SEARCH_RADIUS,
                        "location": format!("{latitude},{longitude}"),
                    }
                }
            }
        }
    })
}

/// Extracts the matched records from a search response.
///
/// Hits without a `fields` object carry nothing scoreable and are skipped.
fn parse_response(body: &Value) -> Result<Vec<AccidentRecord>, SearchError> {
    let hits = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Response {
            message: "response missing 'hits.hits' array".to_string(),
        })?;

    let mut records = Vec::with_capacity(hits.len());
    for hit in hits {
        let Some(fields) = hit.get("fields").and_then(Value::as_object) else {
            log::debug!("skipping hit without 'fields'");
            continue;
        };
        records.push(AccidentRecord::from(fields.clone()));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_requests_the_four_fields_at_fixed_radius() {
        let query = build_query(53.4808, -2.2426);
        assert_eq!(
            query["fields"],
            serde_json::json!([
                "accidentSeverity",
                "numberofVehicles",
                "numberofCasualties",
                "year"
            ])
        );
        let geo = query.pointer("/query/bool/filter/geo_distance").unwrap();
        assert_eq!(geo["distance"], "1km");
        assert_eq!(geo["location"], "53.4808,-2.2426");
        assert_eq!(
            query.pointer("/query/bool/must"),
            Some(&serde_json::json!({ "match_all": {} }))
        );
    }

    #[test]
    fn parses_hits_into_records() {
        let body = serde_json::json!({
            "hits": {
                "total": 2,
                "max_score": 1,
                "hits": [
                    {
                        "_index": "accidents",
                        "_id": "AVNB0yY4TNrM-79sYhPC",
                        "_score": 1,
                        "fields": {
                            "accidentSeverity": ["Serious"],
                            "year": [2005],
                            "numberofCasualties": [1],
                            "numberofVehicles": [1]
                        }
                    },
                    {
                        "_index": "accidents",
                        "_id": "AVNB0yY4TNrM-79sYhPD",
                        "_score": 1,
                        "fields": {
                            "accidentSeverity": ["Slight"],
                            "year": [2012],
                            "numberofCasualties": [2],
                            "numberofVehicles": [3]
                        }
                    }
                ]
            }
        });
        let records = parse_response(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].fields.get("accidentSeverity"),
            Some(&serde_json::json!(["Serious"]))
        );
        assert_eq!(
            records[1].fields.get("year"),
            Some(&serde_json::json!([2012]))
        );
    }

    #[test]
    fn parses_empty_hit_list() {
        let body = serde_json::json!({ "hits": { "total": 0, "hits": [] } });
        assert!(parse_response(&body).unwrap().is_empty());
    }

    #[test]
    fn skips_hits_without_fields() {
        let body = serde_json::json!({
            "hits": {
                "hits": [
                    { "_id": "a" },
                    { "_id": "b", "fields": { "year": [2019] } }
                ]
            }
        });
        let records = parse_response(&body).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn rejects_bodies_without_hits() {
        let body = serde_json::json!({ "error": "index_not_found_exception" });
        assert!(matches!(
            parse_response(&body),
            Err(SearchError::Response { .. })
        ));
    }
}
