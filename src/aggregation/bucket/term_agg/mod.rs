//! The terms aggregation and the selection of its execution strategy.
//!
//! A terms aggregation creates a bucket for every distinct value of a field. On string
//! columns, it can be collected in two ways:
//! - [`ExecutionMode::Map`]: every term is hashed into a map. Always applicable.
//! - [`ExecutionMode::Ordinals`]: terms are bucketed by their segment-local ordinal through a
//!   table built once per collector. Only applicable to dictionary encoded columns without
//!   include/exclude filter, and only cheaper when the collector sees many documents per
//!   distinct term.
//!
//! [`TermsAggregatorFactory`] makes that choice and builds the collector. Numeric columns are
//! always collected in a hash map.

mod capacity;
mod collectors;
mod execution_mode;
mod factory;
mod include_exclude;

pub use capacity::estimate_bucket_capacity;
pub use execution_mode::{resolve_execution_mode, ExecutionMode, ExecutionModeInputs};
pub use factory::TermsAggregatorFactory;
pub use include_exclude::{IncludeExclude, IncludeExcludeParam};
use serde::{Deserialize, Serialize};

use super::CustomOrder;

/// Creates a bucket for every unique term and counts the number of occurrences.
/// Note that doc_count in the response buckets equals term count here.
///
/// If the text is untokenized and single value, that means one term per document and therefore it
/// is in fact doc count.
///
/// # Request JSON Format
/// ```json
/// {
///     "genres": {
///         "terms":{ "field": "genre", "execution_hint": "map" }
///     }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TermsAggregation {
    /// The field to aggregate on.
    pub field: String,
    /// By default, the top 10 terms with the most documents are returned.
    /// Larger values for size are more expensive.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size: Option<u32>,

    /// To get more accurate results, we fetch more than `size` from each segment.
    ///
    /// Defaults to 10 * size.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[serde(alias = "segment_size")]
    pub shard_size: Option<u32>,

    /// Filter all terms that are lower than `min_doc_count`. Defaults to 1.
    ///
    /// **Expensive**: When set to 0, this will return all terms in the field.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_doc_count: Option<u64>,

    /// Set the order. Either `{ "_count": "desc" }` (the default) or `{ "_key": "asc" }`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub order: Option<CustomOrder>,

    /// Include terms by either regex (single string) or exact values (array).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub include: Option<IncludeExcludeParam>,
    /// Exclude terms by either regex (single string) or exact values (array).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exclude: Option<IncludeExcludeParam>,

    /// Forces the execution mode on string fields: `"map"` or `"ordinals"`.
    ///
    /// The hint is ignored where it cannot apply, e.g. `"ordinals"` on a column without term
    /// ordinals.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub execution_hint: Option<String>,
}

/// The validated configuration of a terms aggregation, with populated defaults.
///
/// Built once per aggregation definition and handed to a [`TermsAggregatorFactory`].
#[derive(Clone, Debug)]
pub struct TermsAggregatorConfig {
    /// The name of the aggregation.
    pub name: String,
    /// The field to aggregate on.
    pub field: String,
    /// Bucket order.
    pub order: CustomOrder,
    /// Number of buckets to return.
    pub required_size: u32,
    /// Number of buckets kept per segment. Expected to be at least `required_size`.
    pub shard_size: u32,
    /// Buckets with fewer documents are dropped.
    pub min_doc_count: u64,
    /// Optional term filter.
    pub include_exclude: Option<IncludeExclude>,
    /// Optional execution mode hint, parsed when the collector is built.
    pub execution_hint: Option<String>,
}

impl TermsAggregatorConfig {
    /// Validates a request and populates its defaults.
    pub fn from_req(name: &str, req: &TermsAggregation) -> crate::Result<Self> {
        let required_size = req.size.unwrap_or(10);
        let shard_size = req
            .shard_size
            .unwrap_or(required_size.saturating_mul(10))
            .max(required_size);
        let include_exclude = IncludeExclude::new(req.include.as_ref(), req.exclude.as_ref())?;
        Ok(TermsAggregatorConfig {
            name: name.to_string(),
            field: req.field.to_string(),
            order: req.order.clone().unwrap_or_default(),
            required_size,
            shard_size,
            min_doc_count: req.min_doc_count.unwrap_or(1),
            include_exclude,
            execution_hint: req.execution_hint.clone(),
        })
    }
}
