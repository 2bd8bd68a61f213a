//! # Aggregations
//!
//! A terms aggregation creates one bucket per distinct value of a field and counts the
//! documents falling in each bucket.
//!
//! ## Usage
//! Build a [`TermsAggregation`](bucket::TermsAggregation) request, validate it into a
//! [`TermsAggregatorConfig`](bucket::TermsAggregatorConfig) and hand it to a
//! [`TermsAggregatorFactory`](bucket::TermsAggregatorFactory). The factory creates one
//! [`SegmentAggregationCollector`] per segment of an [`AggregationContext`]. Segment results
//! are merged with [`TermsResult::merge_fruits`] and finalized with
//! [`TermsResult::into_final`].
//!
//! ## JSON Format
//! Requests and results de/serialize into elasticsearch compatible JSON.
//!
//! ```
//! use terms_planner::aggregation::bucket::TermsAggregation;
//!
//! let req: TermsAggregation = serde_json::from_str(
//!     r#"{ "field": "genre", "size": 5, "order": { "_key": "asc" }, "exclude": ["pop"] }"#,
//! )
//! .unwrap();
//! assert_eq!(req.size, Some(5));
//! ```
//!
//! ## Execution mode
//! String columns are collected either in a hash map or through their term ordinals. The
//! choice is made when the collector is created, see
//! [`ExecutionModeInputs::resolve`](bucket::ExecutionModeInputs::resolve). Its inputs are the
//! request, the cardinality metadata of the [`ValuesSource`], the enclosing aggregators
//! ([`AggregatorNode`]) and the size of the largest segment.

mod agg_context;
mod agg_result;
mod agg_tree;
pub mod bucket;
mod error;
mod segment_agg_result;
mod values_source;

pub use agg_context::{
    AggContextParams, AggregationContext, TermsExecutionSettings, DEFAULT_BUCKET_CAPACITY,
    MAX_INITIAL_BUCKET_CAPACITY, ORDINALS_MAX_DOC_SHIFT,
};
pub use agg_result::{BucketEntry, Key, TermsResult};
pub use agg_tree::{has_unbounded_ancestor, AggregatorNode, BucketAggregationMode};
pub use error::AggregationError;
pub use segment_agg_result::{CollectorKind, SegmentAggregationCollector};
pub use values_source::{ValuesSource, ValuesSourceMetadata};
