#![warn(missing_docs)]

//! `terms-planner` decides how a terms bucket aggregation collects documents on a segment.
//!
//! Given the column a terms aggregation runs on, the crate picks between a hash map based
//! collector and an ordinal based collector, sizes the collector's initial bucket table, and
//! builds it. The decision happens once per aggregation build, before any document is
//! visited.
//!
//! ```rust
//! use terms_planner::aggregation::bucket::{ExecutionMode, TermsAggregation, TermsAggregatorConfig, TermsAggregatorFactory};
//! use terms_planner::aggregation::{AggContextParams, AggregationContext};
//! use terms_planner::column::{DynamicColumn, StrColumn};
//! use terms_planner::index::{Searcher, SegmentReader};
//!
//! # fn main() -> terms_planner::Result<()> {
//! let genres = StrColumn::from_docs(&[vec!["jazz"], vec!["rock"], vec!["jazz"]]);
//! let segment = SegmentReader::builder(0, 1_000)
//!     .add_column("genre", DynamicColumn::Str(genres))
//!     .build();
//! let searcher = Searcher::new(vec![segment]);
//! let context = AggregationContext::new(searcher, AggContextParams::default());
//!
//! let req: TermsAggregation = serde_json::from_str(r#"{ "field": "genre" }"#)?;
//! let factory = TermsAggregatorFactory::new(TermsAggregatorConfig::from_req("genres", &req)?);
//! let mut collector = factory.create_for_segment(&context, 0, None)?;
//! assert_eq!(collector.collector_kind().execution_mode(), Some(ExecutionMode::Ordinals));
//!
//! collector.collect(&[0, 1, 2])?;
//! let result = collector.into_terms_result()?;
//! assert_eq!(result.buckets[0].doc_count, 2);
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod column;
mod error;
pub mod index;

pub use crate::error::TermsPlannerError;

/// The result type returned by fallible operations of this crate.
pub type Result<T> = std::result::Result<T, TermsPlannerError>;

/// A `u32` identifying a document within a segment.
pub type DocId = u32;

/// A `u32` identifying a segment within a searcher snapshot.
pub type SegmentOrdinal = u32;
