//! Field extraction from heterogeneous accident records.
//!
//! The search service returns each attribute either as a bare scalar or as
//! a single-element array wrapping the scalar. Extraction normalizes both
//! forms to the scalar and projects one attribute across a whole record
//! set, preserving record order.

use accident_risk_models::AccidentRecord;
use serde_json::Value;

/// Projects one attribute's normalized value out of each record, in record
/// order. Missing attributes appear as `None`; shape handling is left to
/// the typed projections below.
#[must_use]
pub fn extract_field<'a>(records: &'a [AccidentRecord], field: &str) -> Vec<Option<&'a Value>> {
    records
        .iter()
        .map(|record| record.fields.get(field).map(normalize))
        .collect()
}

/// Unwraps a single-element array to its element; everything else passes
/// through unchanged.
fn normalize(value: &Value) -> &Value {
    match value {
        Value::Array(items) if items.len() == 1 => &items[0],
        other => other,
    }
}

/// Projects an attribute as floats. Records whose attribute is missing or
/// not numeric are excluded from the sample rather than corrupting it.
#[must_use]
pub fn extract_numbers(records: &[AccidentRecord], field: &str) -> Vec<f64> {
    let mut values = Vec::with_capacity(records.len());
    for (index, value) in extract_field(records, field).into_iter().enumerate() {
        match value.and_then(Value::as_f64) {
            Some(number) => values.push(number),
            None => log::debug!("record {index}: skipping malformed '{field}' value"),
        }
    }
    values
}

/// Projects an attribute as integers, excluding malformed values.
#[must_use]
pub fn extract_integers(records: &[AccidentRecord], field: &str) -> Vec<i64> {
    let mut values = Vec::with_capacity(records.len());
    for (index, value) in extract_field(records, field).into_iter().enumerate() {
        match value.and_then(Value::as_i64) {
            Some(number) => values.push(number),
            None => log::debug!("record {index}: skipping malformed '{field}' value"),
        }
    }
    values
}

/// Projects an attribute as strings, excluding malformed values.
#[must_use]
pub fn extract_strings<'a>(records: &'a [AccidentRecord], field: &str) -> Vec<&'a str> {
    let mut values = Vec::with_capacity(records.len());
    for (index, value) in extract_field(records, field).into_iter().enumerate() {
        match value.and_then(Value::as_str) {
            Some(text) => values.push(text),
            None => log::debug!("record {index}: skipping malformed '{field}' value"),
        }
    }
    values
}
