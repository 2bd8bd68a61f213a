use std::sync::Arc;

use super::SegmentReader;
use crate::{DocId, SegmentOrdinal};

/// A snapshot of the segments open at some point in time.
#[derive(Clone, Debug, Default)]
pub struct Searcher {
    segment_readers: Arc<[SegmentReader]>,
}

impl Searcher {
    /// Creates a snapshot over the given segments.
    pub fn new(segment_readers: Vec<SegmentReader>) -> Searcher {
        Searcher {
            segment_readers: segment_readers.into(),
        }
    }

    /// Return the list of segment readers
    pub fn segment_readers(&self) -> &[SegmentReader] {
        &self.segment_readers
    }

    /// Returns the segment reader associated with the given segment ordinal
    pub fn segment_reader(&self, segment_ord: SegmentOrdinal) -> Option<&SegmentReader> {
        self.segment_readers.get(segment_ord as usize)
    }

    /// Document count of the largest segment, 0 for an empty snapshot.
    ///
    /// Ordinals are local to a segment, so this is the max over segments, not the sum.
    pub fn max_doc_in_largest_segment(&self) -> DocId {
        self.segment_readers
            .iter()
            .map(SegmentReader::max_doc)
            .max()
            .unwrap_or(0)
    }
}
