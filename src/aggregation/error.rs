use thiserror::Error;

use super::bucket::ExecutionMode;
use crate::column::ColumnType;

/// Error that may occur when building an aggregation collector.
///
/// All of them are static misconfigurations, detected before any document is collected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// The `execution_hint` does not name a known execution mode.
    #[error("Unknown `execution_hint`: [{hint}], expected any of {expected:?}")]
    UnknownExecutionHint {
        /// The hint as received.
        hint: String,
        /// The valid hints.
        expected: Vec<&'static str>,
    },
    /// Include/exclude was requested on a column that does not hold terms.
    #[error(
        "Aggregation [{agg_name}] cannot support the include/exclude settings on field \
         [{field}] as it can only be applied to string values"
    )]
    FilterNotSupported {
        /// Name of the aggregation.
        agg_name: String,
        /// Name of the field.
        field: String,
    },
    /// An execution mode was forced which cannot apply include/exclude.
    #[error("The `{mode}` execution mode of aggregation [{agg_name}] cannot filter terms")]
    OrdinalsIncompatibleWithFilter {
        /// Name of the aggregation.
        agg_name: String,
        /// The forced execution mode.
        mode: ExecutionMode,
    },
    /// The column is neither string-like nor numeric.
    #[error(
        "terms aggregation cannot be applied to field [{field}] of type {column_type:?}. It can \
         only be applied to numeric or string fields"
    )]
    UnsupportedFieldKind {
        /// Name of the field.
        field: String,
        /// Type of the column found for the field.
        column_type: ColumnType,
    },
}
