#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Concurrent risk assessment across a batch of locations.
//!
//! Each location gets its own pipeline: fetch the accident history from
//! the record source, score it, pair the score with the location's
//! identifier. Pipelines share no state and run concurrently; the batch
//! result is complete only once every pipeline has settled. A failed or
//! stalled location lands in the `failed` list instead of blocking the
//! rest.

use std::time::Duration;

use accident_risk_models::{Location, RiskResult};
use accident_risk_scoring::ScoreError;
use accident_risk_search::{RecordSource, SearchError};
use chrono::Datelike as _;
use futures::stream::{self, StreamExt as _};
use thiserror::Error;

/// Deterministic fallback score for a location with no usable accident
/// history. Neutral by definition: no data, no judged risk.
pub const NEUTRAL_RISK: f64 = 0.0;

/// Errors that fail a single location's pipeline.
#[derive(Debug, Error)]
pub enum RiskError {
    /// The record source request or response parsing failed.
    #[error("data source failure: {0}")]
    DataSource(#[from] SearchError),

    /// The record source did not respond within the per-location timeout.
    #[error("data source timed out after {0:?}")]
    Timeout(Duration),
}

/// Tuning knobs for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum number of in-flight record source requests. `None` starts
    /// every location's pipeline immediately.
    pub concurrent_requests: Option<usize>,
    /// How long one location may wait on the record source before its
    /// pipeline is failed with [`RiskError::Timeout`].
    pub per_location_timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrent_requests: None,
            per_location_timeout: Duration::from_secs(30),
        }
    }
}

/// A location whose pipeline failed, with the error that failed it.
#[derive(Debug)]
pub struct FailedLocation {
    /// Identifier of the originating location.
    pub id: String,
    /// What went wrong.
    pub error: RiskError,
}

/// Outcome of a batch run. Every input location's identifier appears
/// exactly once, in `scored` or in `failed`.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Locations that produced a risk score, in completion order.
    pub scored: Vec<RiskResult>,
    /// Locations whose pipeline failed.
    pub failed: Vec<FailedLocation>,
}

/// Assesses every location against the current calendar year.
pub async fn assess_locations(
    source: &dyn RecordSource,
    locations: &[Location],
    options: &BatchOptions,
) -> BatchOutcome {
    let current_year = i64::from(chrono::Utc::now().year());
    assess_locations_at(source, locations, options, current_year).await
}

/// Assesses every location with the calendar year pinned.
///
/// Fans out one task per location, bounded by
/// [`BatchOptions::concurrent_requests`], and waits for all of them;
/// results are collected as pipelines complete, so their order carries no
/// relation to the input order.
pub async fn assess_locations_at(
    source: &dyn RecordSource,
    locations: &[Location],
    options: &BatchOptions,
    current_year: i64,
) -> BatchOutcome {
    let concurrency = options
        .concurrent_requests
        .unwrap_or_else(|| locations.len().max(1));

    log::info!(
        "assessing {} locations (concurrency={concurrency})",
        locations.len()
    );

    let settled: Vec<(String, Result<f64, RiskError>)> =
        stream::iter(locations.iter().map(|location| {
            let id = location.id.clone();
            async move {
                let result = assess_one(source, location, options, current_year).await;
                (id, result)
            }
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut outcome = BatchOutcome::default();
    for (id, result) in settled {
        match result {
            Ok(risk) => outcome.scored.push(RiskResult { id, risk }),
            Err(error) => {
                log::warn!("risk assessment failed for '{id}': {error}");
                outcome.failed.push(FailedLocation { id, error });
            }
        }
    }
    outcome
}

/// Runs one location's pipeline: fetch, score, fall back on degenerate
/// data.
async fn assess_one(
    source: &dyn RecordSource,
    location: &Location,
    options: &BatchOptions,
    current_year: i64,
) -> Result<f64, RiskError> {
    let records = tokio::time::timeout(
        options.per_location_timeout,
        source.records_near(location.latitude, location.longitude),
    )
    .await
    .map_err(|_| RiskError::Timeout(options.per_location_timeout))??;

    match accident_risk_scoring::score_records(&records, current_year) {
        Ok(risk) => Ok(risk),
        Err(error @ ScoreError::InsufficientData { .. }) => {
            log::warn!(
                "'{}': {error}; falling back to neutral risk",
                location.id
            );
            Ok(NEUTRAL_RISK)
        }
    }
}
