#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Shared data model for the accident risk pipeline.
//!
//! Defines the location and risk result types exchanged with callers, the
//! raw accident record shape returned by the search service, and the
//! canonical severity categories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity category field name in the search service schema.
pub const SEVERITY_FIELD: &str = "accidentSeverity";

/// Vehicle count field name in the search service schema.
pub const VEHICLES_FIELD: &str = "numberofVehicles";

/// Casualty count field name in the search service schema.
pub const CASUALTIES_FIELD: &str = "numberofCasualties";

/// Accident year field name in the search service schema.
pub const YEAR_FIELD: &str = "year";

/// The four record attributes requested from the search service, in the
/// order they appear in the query envelope.
pub const RECORD_FIELDS: [&str; 4] =
    [SEVERITY_FIELD, VEHICLES_FIELD, CASUALTIES_FIELD, YEAR_FIELD];

/// A point of interest to assess, identified by an opaque caller-supplied
/// token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Opaque identifier echoed back on the matching [`RiskResult`].
    pub id: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

/// One historical accident near a location, as returned by the search
/// service.
///
/// The service returns each requested attribute either as a bare scalar or
/// as a single-element array wrapping that scalar; both forms are
/// equivalent. Records are kept heterogeneous here and normalized at
/// extraction time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccidentRecord {
    /// Attribute name to raw value, exactly as the service returned it.
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl From<serde_json::Map<String, serde_json::Value>> for AccidentRecord {
    fn from(object: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: object.into_iter().collect(),
        }
    }
}

/// Severity category of an accident record.
///
/// Parsing is ASCII-case-insensitive (`"Serious"`, `"serious"`, and
/// `"SERIOUS"` are the same category). Strings outside these three
/// categories fail to parse and are treated as unrecognized by the
/// severity scoring.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Severity {
    /// Minor injuries only.
    Slight,
    /// Serious injury, no fatality.
    Serious,
    /// At least one fatality.
    Fatal,
}

/// The aggregate risk score computed for one input [`Location`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Identifier of the originating location.
    pub id: String,
    /// Final risk score; higher means judged riskier.
    pub risk: f64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!(Severity::from_str("Serious").unwrap(), Severity::Serious);
        assert_eq!(Severity::from_str("serious").unwrap(), Severity::Serious);
        assert_eq!(Severity::from_str("SERIOUS").unwrap(), Severity::Serious);
        assert_eq!(Severity::from_str("slight").unwrap(), Severity::Slight);
        assert_eq!(Severity::from_str("FATAL").unwrap(), Severity::Fatal);
    }

    #[test]
    fn severity_rejects_unknown_categories() {
        assert!(Severity::from_str("catastrophic").is_err());
        assert!(Severity::from_str("").is_err());
    }

    #[test]
    fn record_from_json_object_keeps_raw_values() {
        let serde_json::Value::Object(object) = serde_json::json!({
            "year": [2015],
            "accidentSeverity": "Slight",
        }) else {
            panic!("expected object");
        };
        let record = AccidentRecord::from(object);
        assert_eq!(record.fields.len(), 2);
        assert_eq!(
            record.fields.get(YEAR_FIELD),
            Some(&serde_json::json!([2015]))
        );
        assert_eq!(
            record.fields.get(SEVERITY_FIELD),
            Some(&serde_json::json!("Slight"))
        );
    }
}
