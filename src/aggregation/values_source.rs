//! Values sources: the per-document field values an aggregation reads, independent of how the
//! column is encoded.

use crate::column::{ColumnType, DynamicColumn};

/// Cardinality information about a values source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValuesSourceMetadata {
    max_unique_values_per_segment: Option<u64>,
}

impl ValuesSourceMetadata {
    /// Metadata of a source whose number of distinct values is unknown.
    pub fn unknown() -> Self {
        ValuesSourceMetadata::default()
    }

    /// Metadata of a source with at most `max_unique_values` distinct values per segment.
    pub fn with_max_unique_values(max_unique_values: u64) -> Self {
        ValuesSourceMetadata {
            max_unique_values_per_segment: Some(max_unique_values),
        }
    }

    /// Builds metadata from a raw count, where any negative value (usually `-1`) means unknown.
    pub fn from_raw_count(raw_count: i64) -> Self {
        ValuesSourceMetadata {
            max_unique_values_per_segment: u64::try_from(raw_count).ok(),
        }
    }

    /// Upper bound of the number of distinct values observable in one segment.
    pub fn max_unique_values_per_segment(&self) -> Option<u64> {
        self.max_unique_values_per_segment
    }

    fn for_column(column: &DynamicColumn) -> Self {
        match column {
            DynamicColumn::Str(str_column) => {
                Self::with_max_unique_values(str_column.dictionary().num_terms() as u64)
            }
            // Without a dictionary, the number of values is the best bound we have.
            DynamicColumn::Bytes(_)
            | DynamicColumn::I64(_)
            | DynamicColumn::U64(_)
            | DynamicColumn::F64(_) => Self::with_max_unique_values(column.num_vals() as u64),
            DynamicColumn::Bool(_) => Self::with_max_unique_values(2),
            DynamicColumn::IpAddr(_) => Self::unknown(),
        }
    }
}

/// The field values of one segment an aggregation reads from.
#[derive(Clone, Debug)]
pub struct ValuesSource {
    column: DynamicColumn,
    metadata: ValuesSourceMetadata,
}

impl ValuesSource {
    /// Creates a values source, deriving its metadata from the column.
    pub fn from_column(column: DynamicColumn) -> Self {
        let metadata = ValuesSourceMetadata::for_column(&column);
        ValuesSource { column, metadata }
    }

    /// Replaces the metadata derived from the column.
    pub fn with_metadata(mut self, metadata: ValuesSourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The underlying column.
    pub fn column(&self) -> &DynamicColumn {
        &self.column
    }

    /// Cardinality information.
    pub fn metadata(&self) -> &ValuesSourceMetadata {
        &self.metadata
    }

    /// The type of the underlying column.
    pub fn column_type(&self) -> ColumnType {
        self.column.column_type()
    }

    /// True for term-like sources, with or without ordinals.
    pub fn is_bytes(&self) -> bool {
        self.column_type().is_bytes()
    }

    /// True if the source exposes dense per-segment term ordinals.
    pub fn supports_ordinals(&self) -> bool {
        matches!(self.column, DynamicColumn::Str(_))
    }
}

impl From<DynamicColumn> for ValuesSource {
    fn from(column: DynamicColumn) -> Self {
        ValuesSource::from_column(column)
    }
}
