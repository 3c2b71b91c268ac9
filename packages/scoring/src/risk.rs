//! Sub-risk calculators and final aggregation.
//!
//! Four independent sub-risks feed the final score: recency of the most
//! recent accident year, mean casualties, severity category mix, and mean
//! vehicle count. Casualty and vehicle samples pass through the outlier
//! trimmer before averaging.

use std::str::FromStr as _;

use accident_risk_models::{
    AccidentRecord, CASUALTIES_FIELD, SEVERITY_FIELD, Severity, VEHICLES_FIELD, YEAR_FIELD,
};

use crate::{ScoreError, extract, trim};

/// Penalty per year elapsed since the most recent accident.
const YEAR_GAP_WEIGHT: f64 = 0.8;

/// Reward per accident in the most recent accident year.
const YEAR_FREQUENCY_WEIGHT: f64 = 1.5;

/// Multiplier on the mean casualty count.
const CASUALTY_WEIGHT: f64 = 1.5;

/// Multiplier on the mean vehicle count.
const VEHICLE_WEIGHT: f64 = 1.5;

/// Multiplier on the serious fraction when any serious accident exists.
const SERIOUS_WEIGHT: f64 = 2.0;

/// Scale applied to the summed sub-risks.
const AGGREGATE_SCALE: f64 = 10.0;

/// Recency sub-risk. A long gap since the latest accident year lowers the
/// score; many accidents in that latest year raise it. The count is an
/// exact integer-equality match against the latest year.
///
/// # Errors
///
/// Returns [`ScoreError::InsufficientData`] if `years` is empty.
#[allow(clippy::cast_precision_loss)]
pub fn year_risk(years: &[i64], current_year: i64) -> Result<f64, ScoreError> {
    let latest = years
        .iter()
        .copied()
        .max()
        .ok_or(ScoreError::InsufficientData { field: YEAR_FIELD })?;
    let gap = current_year - latest;
    let frequency = years.iter().filter(|&&year| year == latest).count();
    Ok(-(gap as f64 * YEAR_GAP_WEIGHT) + frequency as f64 * YEAR_FREQUENCY_WEIGHT)
}

/// Casualty sub-risk: mean of the outlier-trimmed casualty counts, scaled.
///
/// # Errors
///
/// Returns [`ScoreError::InsufficientData`] if `casualties` is empty.
pub fn casualties_risk(casualties: &[f64]) -> Result<f64, ScoreError> {
    let trimmed = trim::trim_outliers(casualties);
    mean(&trimmed)
        .map(|average| average * CASUALTY_WEIGHT)
        .ok_or(ScoreError::InsufficientData {
            field: CASUALTIES_FIELD,
        })
}

/// Vehicle sub-risk: mean of the outlier-trimmed vehicle counts, scaled.
///
/// # Errors
///
/// Returns [`ScoreError::InsufficientData`] if `vehicles` is empty.
pub fn vehicles_risk(vehicles: &[f64]) -> Result<f64, ScoreError> {
    let trimmed = trim::trim_outliers(vehicles);
    mean(&trimmed)
        .map(|average| average * VEHICLE_WEIGHT)
        .ok_or(ScoreError::InsufficientData {
            field: VEHICLES_FIELD,
        })
}

/// Severity sub-risk from the category mix.
///
/// Serious and slight accidents are counted case-insensitively against the
/// total. Fatal and unrecognized categories count only toward the total,
/// diluting both fractions. Any serious presence dominates: the serious
/// branch is taken whenever its fraction is nonzero.
///
/// # Errors
///
/// Returns [`ScoreError::InsufficientData`] if `severities` is empty.
#[allow(clippy::cast_precision_loss)]
pub fn severity_risk(severities: &[&str]) -> Result<f64, ScoreError> {
    if severities.is_empty() {
        return Err(ScoreError::InsufficientData {
            field: SEVERITY_FIELD,
        });
    }

    let mut serious = 0_usize;
    let mut slight = 0_usize;
    for raw in severities {
        match Severity::from_str(raw) {
            Ok(Severity::Serious) => serious += 1,
            Ok(Severity::Slight) => slight += 1,
            // Fatal and unrecognized categories only dilute the fractions
            Ok(Severity::Fatal) | Err(_) => {}
        }
    }

    let total = severities.len() as f64;
    let serious_fraction = serious as f64 / total;
    let slight_fraction = slight as f64 / total;

    if serious_fraction == 0.0 {
        Ok(slight_fraction + 1.0)
    } else {
        Ok(serious_fraction * SERIOUS_WEIGHT + 1.0)
    }
}

/// Combines the four sub-risks into the final score.
#[must_use]
pub fn aggregate(year: f64, casualties: f64, severity: f64, vehicles: f64) -> f64 {
    (year + casualties + severity + vehicles) * AGGREGATE_SCALE
}

/// Scores one location's record set: projects the four attributes, runs
/// each sub-risk, and aggregates.
///
/// `current_year` is the calendar year the recency sub-risk measures
/// against; production callers pass the actual current year, tests pin it.
///
/// # Errors
///
/// Returns [`ScoreError::InsufficientData`] if any attribute has no usable
/// values (empty record set, or every value malformed).
pub fn score_records(records: &[AccidentRecord], current_year: i64) -> Result<f64, ScoreError> {
    let years = extract::extract_integers(records, YEAR_FIELD);
    let casualties = extract::extract_numbers(records, CASUALTIES_FIELD);
    let vehicles = extract::extract_numbers(records, VEHICLES_FIELD);
    let severities = extract::extract_strings(records, SEVERITY_FIELD);

    let year = year_risk(&years, current_year)?;
    let casualties = casualties_risk(&casualties)?;
    let severity = severity_risk(&severities)?;
    let vehicles = vehicles_risk(&vehicles)?;

    Ok(aggregate(year, casualties, severity, vehicles))
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
