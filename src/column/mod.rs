//! In-memory fast field columns.
//!
//! A column stores, for every document of a segment, zero or more values. Terms aggregations
//! read their values from these columns through a
//! [`ValuesSource`](crate::aggregation::ValuesSource).

mod bytes_column;
mod column_type;
mod dictionary;
mod dynamic_column;
mod str_column;

use std::sync::Arc;

pub use bytes_column::BytesColumn;
pub use column_type::ColumnType;
pub use dictionary::Dictionary;
pub use dynamic_column::DynamicColumn;
pub use str_column::StrColumn;

use crate::DocId;

/// A multivalued column.
///
/// `start_index[doc]..start_index[doc + 1]` is the range of `values` holding the values of
/// `doc`.
#[derive(Clone, Debug)]
pub struct Column<T> {
    start_index: Arc<[u32]>,
    values: Arc<[T]>,
}

impl<T: Clone> Column<T> {
    /// Builds a column from the values of each document, in doc id order.
    pub fn from_docs(docs: &[Vec<T>]) -> Self {
        let mut start_index = Vec::with_capacity(docs.len() + 1);
        let mut values = Vec::new();
        start_index.push(0u32);
        for doc_values in docs {
            values.extend_from_slice(doc_values);
            start_index.push(values.len() as u32);
        }
        Column {
            start_index: start_index.into(),
            values: values.into(),
        }
    }
}

impl<T> Column<T> {
    /// Returns the values associated to a given document.
    ///
    /// Documents beyond the end of the column have no values.
    #[inline]
    pub fn values_for_doc(&self, doc: DocId) -> &[T] {
        let doc = doc as usize;
        if doc + 1 >= self.start_index.len() {
            return &[];
        }
        let start = self.start_index[doc] as usize;
        let end = self.start_index[doc + 1] as usize;
        &self.values[start..end]
    }

    /// Total number of values, over all documents.
    pub fn num_vals(&self) -> u32 {
        self.values.len() as u32
    }
}
