use rustc_hash::FxHashMap;

use crate::column::DynamicColumn;
use crate::{DocId, SegmentOrdinal};

/// The fast field columns of a segment, by field name.
#[derive(Clone, Debug, Default)]
pub struct FastFieldReaders {
    columns: FxHashMap<String, DynamicColumn>,
}

impl FastFieldReaders {
    /// Returns the column of a field, or `None` if the field is not present in the segment.
    pub fn column(&self, field_name: &str) -> Option<&DynamicColumn> {
        self.columns.get(field_name)
    }
}

/// Entry point to access the data of a segment.
#[derive(Clone, Debug)]
pub struct SegmentReader {
    segment_ord: SegmentOrdinal,
    max_doc: DocId,
    fast_fields: FastFieldReaders,
}

impl SegmentReader {
    /// Starts building a segment with the given ordinal and document count.
    pub fn builder(segment_ord: SegmentOrdinal, max_doc: DocId) -> SegmentReaderBuilder {
        SegmentReaderBuilder {
            segment_ord,
            max_doc,
            columns: FxHashMap::default(),
        }
    }

    /// Returns the highest document id ever attributed in this segment + 1.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// The ordinal of the segment within its searcher.
    pub fn segment_ord(&self) -> SegmentOrdinal {
        self.segment_ord
    }

    /// Accessor to the segment's fast field columns.
    pub fn fast_fields(&self) -> &FastFieldReaders {
        &self.fast_fields
    }
}

/// Builder for [`SegmentReader`].
pub struct SegmentReaderBuilder {
    segment_ord: SegmentOrdinal,
    max_doc: DocId,
    columns: FxHashMap<String, DynamicColumn>,
}

impl SegmentReaderBuilder {
    /// Registers a fast field column under `field_name`.
    pub fn add_column(mut self, field_name: &str, column: impl Into<DynamicColumn>) -> Self {
        self.columns.insert(field_name.to_string(), column.into());
        self
    }

    /// Finalizes the segment.
    pub fn build(self) -> SegmentReader {
        SegmentReader {
            segment_ord: self.segment_ord,
            max_doc: self.max_doc,
            fast_fields: FastFieldReaders {
                columns: self.columns,
            },
        }
    }
}
