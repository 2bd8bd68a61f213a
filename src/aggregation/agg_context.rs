use serde::{Deserialize, Serialize};

use crate::index::Searcher;
use crate::DocId;

/// Initial bucket capacity used when the number of distinct values is unknown.
pub const DEFAULT_BUCKET_CAPACITY: usize = 50;

/// Upper bound of the initial bucket capacity.
///
/// Some columns only know a loose upper bound of their number of distinct values. Growing a
/// table on demand is cheaper than allocating a table that will rarely be filled.
pub const MAX_INITIAL_BUCKET_CAPACITY: usize = 512;

/// Ordinals are only used by default if the number of distinct values is at most
/// `max_doc >> ORDINALS_MAX_DOC_SHIFT` on the largest segment. This is a rule of thumb.
pub const ORDINALS_MAX_DOC_SHIFT: u32 = 4;

/// Tunables of the terms execution mode selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsExecutionSettings {
    /// Initial bucket capacity when the cardinality of the column is unknown.
    pub default_bucket_capacity: usize,
    /// Cap on the initial bucket capacity.
    pub max_initial_bucket_capacity: usize,
    /// See [`ORDINALS_MAX_DOC_SHIFT`].
    pub ordinals_max_doc_shift: u32,
}

impl Default for TermsExecutionSettings {
    fn default() -> Self {
        Self {
            default_bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            max_initial_bucket_capacity: MAX_INITIAL_BUCKET_CAPACITY,
            ordinals_max_doc_shift: ORDINALS_MAX_DOC_SHIFT,
        }
    }
}

/// Context parameters for aggregation execution
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggContextParams {
    /// Execution mode selection tunables.
    #[serde(default)]
    pub terms_execution: TermsExecutionSettings,
}

/// Everything an aggregation build may read besides its own request.
#[derive(Clone, Debug)]
pub struct AggregationContext {
    searcher: Searcher,
    params: AggContextParams,
}

impl AggregationContext {
    /// Creates a context over a searcher snapshot.
    pub fn new(searcher: Searcher, params: AggContextParams) -> Self {
        Self { searcher, params }
    }

    /// The segments the aggregation runs on.
    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// The execution parameters.
    pub fn params(&self) -> &AggContextParams {
        &self.params
    }

    /// Document count of the largest open segment.
    pub fn max_doc_in_largest_segment(&self) -> DocId {
        self.searcher.max_doc_in_largest_segment()
    }
}
