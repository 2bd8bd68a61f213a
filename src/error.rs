//! Definition of the crate's error and result.

use thiserror::Error;

use crate::aggregation::AggregationError;

/// The library's failure based error enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermsPlannerError {
    /// Invalid argument was passed by the user.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),
    /// An aggregation could not be built from its request.
    #[error("Aggregation error: {0}")]
    AggregationError(#[from] AggregationError),
}

impl From<serde_json::Error> for TermsPlannerError {
    fn from(error: serde_json::Error) -> TermsPlannerError {
        TermsPlannerError::InvalidArgument(format!("Failed to parse request: {error}"))
    }
}

impl From<regex::Error> for TermsPlannerError {
    fn from(error: regex::Error) -> TermsPlannerError {
        TermsPlannerError::InvalidArgument(format!("Invalid regex: {error}"))
    }
}
