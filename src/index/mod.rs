//! Segments and searcher snapshots.
//!
//! Segments are immutable once visible. A [`Searcher`] is a cheap to clone snapshot of the
//! segments open at a given point in time, which concurrent aggregation builds can read
//! without coordination.

mod searcher;
mod segment_reader;

pub use searcher::Searcher;
pub use segment_reader::{FastFieldReaders, SegmentReader, SegmentReaderBuilder};
