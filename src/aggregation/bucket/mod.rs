//! Module for bucket aggregations.
//!
//! BucketAggregations create buckets of documents. The only bucket aggregation of this crate
//! is the [terms aggregation](TermsAggregation), whose collectors are selected and built by
//! the [`TermsAggregatorFactory`].

mod term_agg;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
pub use term_agg::*;

/// Order for buckets in a bucket aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Order {
    /// Asc order
    #[serde(rename = "asc")]
    Asc,
    /// Desc order
    #[serde(rename = "desc")]
    #[default]
    Desc,
}

/// Order property by which to apply the order
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum OrderTarget {
    /// The key of the bucket
    Key,
    /// The doc count of the bucket
    #[default]
    Count,
}

impl fmt::Display for OrderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderTarget::Key => f.write_str("_key"),
            OrderTarget::Count => f.write_str("_count"),
        }
    }
}

/// Set the order. target is either "_count", "_key".
///
/// Examples in JSON format:
/// { "_count": "asc" }
/// { "_key": "asc" }
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CustomOrder {
    /// The target property by which to sort by
    pub target: OrderTarget,
    /// The order asc or desc
    pub order: Order,
}

impl Serialize for CustomOrder {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        let mut map = HashMap::with_capacity(1);
        map.insert(self.target.to_string(), self.order);
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CustomOrder {
    fn deserialize<D>(deserializer: D) -> Result<CustomOrder, D::Error>
    where D: Deserializer<'de> {
        let map = HashMap::<String, Order>::deserialize(deserializer)?;
        let num_entries = map.len();
        let mut entries = map.into_iter();
        let (target, order) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(serde::de::Error::custom(format!(
                    "expected exactly one order entry, got {num_entries}"
                )))
            }
        };
        let target = match target.as_str() {
            "_key" => OrderTarget::Key,
            "_count" => OrderTarget::Count,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unsupported order target `{other}`, expected `_key` or `_count`"
                )))
            }
        };
        Ok(CustomOrder { target, order })
    }
}
