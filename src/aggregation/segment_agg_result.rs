//! Contains the collectors used during collection in a segment.

use std::fmt::Debug;

use super::agg_result::TermsResult;
use super::bucket::ExecutionMode;
use crate::DocId;

/// The concrete collector a terms aggregation was built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectorKind {
    /// Hash map over term bytes.
    StringMap,
    /// Table indexed by term ordinal.
    StringOrdinals,
    /// Hash map over integers.
    Long,
    /// Hash map over floating point numbers.
    Double,
    /// Field missing from the segment, nothing is collected.
    Unmapped,
}

impl CollectorKind {
    /// The execution mode of string collectors, `None` for other collectors.
    pub fn execution_mode(self) -> Option<ExecutionMode> {
        match self {
            CollectorKind::StringMap => Some(ExecutionMode::Map),
            CollectorKind::StringOrdinals => Some(ExecutionMode::Ordinals),
            CollectorKind::Long | CollectorKind::Double | CollectorKind::Unmapped => None,
        }
    }
}

/// A SegmentAggregationCollector is used to collect aggregation results.
pub trait SegmentAggregationCollector: Debug + Send {
    /// Name of the aggregation.
    fn name(&self) -> &str;

    /// Which collector this is.
    fn collector_kind(&self) -> CollectorKind;

    /// The capacity the bucket table was created with.
    fn initial_bucket_capacity(&self) -> usize;

    /// Collects a block of documents.
    fn collect(&mut self, docs: &[DocId]) -> crate::Result<()>;

    /// The result of an aggregation which collected no document.
    fn build_empty_result(&self) -> TermsResult;

    /// Finalize method. Turns the collected buckets into a result.
    fn into_terms_result(self: Box<Self>) -> crate::Result<TermsResult>;
}
