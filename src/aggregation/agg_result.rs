//! Contains the result of a terms aggregation on a segment.
//!
//! Results serialize into the elasticsearch compatible JSON format.

use std::cmp::Ordering;
use std::fmt::Display;

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};

use super::bucket::{CustomOrder, Order, OrderTarget};

/// The key to identify a bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// String key
    Str(String),
    /// `u64` key
    U64(u64),
    /// `i64` key
    I64(i64),
    /// `f64` key
    F64(f64),
    /// Raw bytes of a term that is not valid UTF-8.
    Bytes(Vec<u8>),
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Key::Str(text) => text.hash(state),
            Key::U64(val) => val.hash(state),
            Key::I64(val) => val.hash(state),
            Key::F64(val) => val.to_bits().hash(state),
            Key::Bytes(bytes) => bytes.hash(state),
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Str(left), Key::Str(right)) => left.cmp(right),
            (Key::U64(left), Key::U64(right)) => left.cmp(right),
            (Key::I64(left), Key::I64(right)) => left.cmp(right),
            (Key::F64(left), Key::F64(right)) => left.total_cmp(right),
            (Key::Bytes(left), Key::Bytes(right)) => left.cmp(right),
            // A column only produces one kind of key.
            _ => discriminant_rank(self).cmp(&discriminant_rank(other)),
        }
    }
}

fn discriminant_rank(key: &Key) -> u8 {
    match key {
        Key::Str(_) => 0,
        Key::U64(_) => 1,
        Key::I64(_) => 2,
        Key::F64(_) => 3,
        Key::Bytes(_) => 4,
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Str(val) => f.write_str(val),
            Key::U64(val) => write!(f, "{val}"),
            Key::I64(val) => write!(f, "{val}"),
            Key::F64(val) => write!(f, "{val}"),
            Key::Bytes(bytes) => write!(f, "{bytes:?}"),
        }
    }
}

/// A bucket of a terms aggregation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BucketEntry {
    /// The term.
    pub key: Key,
    /// Number of documents in the bucket.
    pub doc_count: u64,
}

/// The result of a terms aggregation on a segment.
///
/// # JSON Format
/// ```json
/// {
///     "doc_count_error_upper_bound": 0,
///     "sum_other_doc_count": 0,
///     "buckets": [
///         { "key": "drumnbass", "doc_count": 6 },
///         { "key": "raggae", "doc_count": 4 }
///     ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TermsResult {
    /// Name of the aggregation.
    #[serde(skip)]
    pub name: String,
    /// The buckets, in the requested order.
    pub buckets: Vec<BucketEntry>,
    /// Number of documents in buckets that were cut off.
    pub sum_other_doc_count: u64,
    /// Upper bound of the doc count of any bucket that was cut off.
    pub doc_count_error_upper_bound: u64,
    /// The requested order.
    #[serde(skip)]
    pub order: CustomOrder,
    /// Number of buckets to return once results are final.
    #[serde(skip)]
    pub required_size: u32,
    /// Buckets with fewer documents are dropped.
    #[serde(skip)]
    pub min_doc_count: u64,
}

impl TermsResult {
    /// An empty result.
    pub fn empty(name: &str, order: CustomOrder, required_size: u32, min_doc_count: u64) -> Self {
        TermsResult {
            name: name.to_string(),
            buckets: Vec::new(),
            sum_other_doc_count: 0,
            doc_count_error_upper_bound: 0,
            order,
            required_size,
            min_doc_count,
        }
    }

    /// Keeps the `required_size` first buckets.
    pub fn into_final(mut self) -> Self {
        let (_, sum_other_doc_count) = cut_off_buckets(&mut self.buckets, self.required_size);
        self.sum_other_doc_count += sum_other_doc_count;
        self
    }

    /// Merges the result of another segment into this one.
    ///
    /// Doc counts of buckets sharing a key are summed and buckets are sorted in the requested
    /// order again. Nothing is cut off until [`TermsResult::into_final`].
    pub fn merge_fruits(&mut self, other: TermsResult) {
        let mut left = std::mem::take(&mut self.buckets);
        let mut right = other.buckets;
        left.sort_unstable_by(|left, right| left.key.cmp(&right.key));
        right.sort_unstable_by(|left, right| left.key.cmp(&right.key));
        self.buckets = left
            .into_iter()
            .merge_join_by(right, |left, right| left.key.cmp(&right.key))
            .map(|either| match either {
                EitherOrBoth::Both(mut left, right) => {
                    left.doc_count += right.doc_count;
                    left
                }
                EitherOrBoth::Left(bucket) | EitherOrBoth::Right(bucket) => bucket,
            })
            .collect();
        sort_buckets(&mut self.buckets, &self.order);
        self.sum_other_doc_count += other.sum_other_doc_count;
        self.doc_count_error_upper_bound += other.doc_count_error_upper_bound;
    }

    /// The bucket with the given key, if any.
    pub fn bucket(&self, key: &Key) -> Option<&BucketEntry> {
        self.buckets.iter().find(|bucket| &bucket.key == key)
    }
}

/// Sorts the buckets according to `order`. Ties are broken by ascending key.
pub(crate) fn sort_buckets(buckets: &mut [BucketEntry], order: &CustomOrder) {
    match (&order.target, order.order) {
        (OrderTarget::Count, Order::Desc) => buckets.sort_unstable_by(|left, right| {
            right
                .doc_count
                .cmp(&left.doc_count)
                .then_with(|| left.key.cmp(&right.key))
        }),
        (OrderTarget::Count, Order::Asc) => buckets.sort_unstable_by(|left, right| {
            left.doc_count
                .cmp(&right.doc_count)
                .then_with(|| left.key.cmp(&right.key))
        }),
        (OrderTarget::Key, Order::Asc) => {
            buckets.sort_unstable_by(|left, right| left.key.cmp(&right.key))
        }
        (OrderTarget::Key, Order::Desc) => {
            buckets.sort_unstable_by(|left, right| right.key.cmp(&left.key))
        }
    }
}

/// Truncates `buckets` to `num_elem` entries.
///
/// Returns the doc count of the first bucket cut off and the sum of the doc counts of all
/// buckets cut off.
pub(crate) fn cut_off_buckets(buckets: &mut Vec<BucketEntry>, num_elem: u32) -> (u64, u64) {
    let num_elem = num_elem as usize;
    let term_doc_count_before_cutoff = buckets
        .get(num_elem)
        .map(|bucket| bucket.doc_count)
        .unwrap_or(0);

    let sum_other_doc_count = buckets
        .get(num_elem..)
        .map(|cut_off_range| cut_off_range.iter().map(|bucket| bucket.doc_count).sum())
        .unwrap_or(0);

    buckets.truncate(num_elem);
    (term_doc_count_before_cutoff, sum_other_doc_count)
}
