#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk scoring over a set of accident records.
//!
//! Given the accident history near one location, projects the four scored
//! attributes out of the raw records, trims outliers from the count-based
//! samples, computes the four sub-risks (recency, casualties, severity,
//! vehicles), and combines them into the final score.

pub mod extract;
pub mod risk;
pub mod trim;

pub use risk::score_records;

use thiserror::Error;

/// Errors that can occur while scoring a record set.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// An attribute had no usable values, so its sub-risk is undefined
    /// (empty record set, or every record's value was malformed).
    #[error("insufficient data: no usable '{field}' values")]
    InsufficientData {
        /// Name of the attribute that came up empty.
        field: &'static str,
    },
}
