//! The concrete collectors a terms aggregation can be built with.
//!
//! The factory is the only place deciding which one runs. They share the conversion of the
//! collected counts into a [`TermsResult`].

use rustc_hash::FxHashMap;

use super::{IncludeExclude, TermsAggregatorConfig};
use crate::aggregation::agg_result::{cut_off_buckets, sort_buckets, BucketEntry, Key, TermsResult};
use crate::aggregation::bucket::CustomOrder;
use crate::aggregation::segment_agg_result::{CollectorKind, SegmentAggregationCollector};
use crate::column::{BytesColumn, Column, StrColumn};
use crate::DocId;

/// The request parameters all collectors need to build their result.
#[derive(Clone, Debug)]
pub(crate) struct BucketParams {
    name: String,
    order: CustomOrder,
    required_size: u32,
    shard_size: u32,
    min_doc_count: u64,
}

impl BucketParams {
    pub(crate) fn from_config(config: &TermsAggregatorConfig) -> Self {
        BucketParams {
            name: config.name.clone(),
            order: config.order.clone(),
            required_size: config.required_size,
            shard_size: config.shard_size,
            min_doc_count: config.min_doc_count,
        }
    }

    fn empty_result(&self) -> TermsResult {
        TermsResult::empty(
            &self.name,
            self.order.clone(),
            self.required_size,
            self.min_doc_count,
        )
    }

    /// Drops buckets under `min_doc_count`, sorts, and keeps `shard_size` buckets.
    fn into_result(&self, mut buckets: Vec<BucketEntry>) -> TermsResult {
        buckets.retain(|bucket| bucket.doc_count >= self.min_doc_count);
        sort_buckets(&mut buckets, &self.order);
        let (doc_count_error_upper_bound, sum_other_doc_count) =
            cut_off_buckets(&mut buckets, self.shard_size);
        TermsResult {
            buckets,
            sum_other_doc_count,
            doc_count_error_upper_bound,
            ..self.empty_result()
        }
    }
}

fn str_bucket(term: &str, doc_count: u64) -> BucketEntry {
    BucketEntry {
        key: Key::Str(term.to_string()),
        doc_count,
    }
}

/// Terms that are not valid UTF-8 keep their raw bytes.
fn term_key(term: Box<[u8]>) -> Key {
    match String::from_utf8(term.into_vec()) {
        Ok(text) => Key::Str(text),
        Err(err) => Key::Bytes(err.into_bytes()),
    }
}

/// The term columns a [`MapTermsCollector`] can read.
#[derive(Clone, Debug)]
pub(crate) enum TermColumn {
    /// Raw terms.
    Bytes(BytesColumn),
    /// Dictionary encoded terms, resolved to their text for every value.
    Str(StrColumn),
}

/// Counts terms in a hash map keyed by the term bytes.
#[derive(Debug)]
pub(crate) struct MapTermsCollector {
    params: BucketParams,
    column: TermColumn,
    include_exclude: Option<IncludeExclude>,
    initial_bucket_capacity: usize,
    buckets: FxHashMap<Box<[u8]>, u64>,
}

impl MapTermsCollector {
    pub(crate) fn new(
        params: BucketParams,
        column: TermColumn,
        include_exclude: Option<IncludeExclude>,
        bucket_capacity: usize,
    ) -> Self {
        MapTermsCollector {
            params,
            column,
            include_exclude,
            initial_bucket_capacity: bucket_capacity,
            buckets: FxHashMap::with_capacity_and_hasher(bucket_capacity, Default::default()),
        }
    }

    #[inline]
    fn add_term(
        buckets: &mut FxHashMap<Box<[u8]>, u64>,
        include_exclude: Option<&IncludeExclude>,
        term: &[u8],
    ) {
        if let Some(include_exclude) = include_exclude {
            if !include_exclude.accepts(term) {
                return;
            }
        }
        if let Some(doc_count) = buckets.get_mut(term) {
            *doc_count += 1;
        } else {
            buckets.insert(term.into(), 1);
        }
    }
}

impl SegmentAggregationCollector for MapTermsCollector {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn collector_kind(&self) -> CollectorKind {
        CollectorKind::StringMap
    }

    fn initial_bucket_capacity(&self) -> usize {
        self.initial_bucket_capacity
    }

    fn collect(&mut self, docs: &[DocId]) -> crate::Result<()> {
        let include_exclude = self.include_exclude.as_ref();
        match &self.column {
            TermColumn::Bytes(bytes_column) => {
                for &doc in docs {
                    for term in bytes_column.terms_for_doc(doc) {
                        Self::add_term(&mut self.buckets, include_exclude, term);
                    }
                }
            }
            TermColumn::Str(str_column) => {
                let dictionary = str_column.dictionary();
                for &doc in docs {
                    for &term_ord in str_column.term_ords(doc) {
                        if let Some(term) = dictionary.ord_to_str(term_ord) {
                            Self::add_term(&mut self.buckets, include_exclude, term.as_bytes());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn build_empty_result(&self) -> TermsResult {
        self.params.empty_result()
    }

    fn into_terms_result(self: Box<Self>) -> crate::Result<TermsResult> {
        let MapTermsCollector {
            params,
            column,
            include_exclude,
            buckets,
            ..
        } = *self;
        let mut entries: Vec<BucketEntry> = Vec::with_capacity(buckets.len());
        // Unseen terms can only be listed when there is a dictionary.
        if let (0, TermColumn::Str(str_column)) = (params.min_doc_count, &column) {
            let unseen_terms = str_column
                .dictionary()
                .iter()
                .map(|(_, term)| term)
                .filter(|term| !buckets.contains_key(term.as_bytes()))
                .filter(|term| {
                    include_exclude
                        .as_ref()
                        .map_or(true, |include_exclude| include_exclude.accepts(term.as_bytes()))
                })
                .take(params.shard_size as usize);
            entries.extend(unseen_terms.map(|term| str_bucket(term, 0)));
        }
        entries.extend(buckets.into_iter().map(|(term, doc_count)| BucketEntry {
            key: term_key(term),
            doc_count,
        }));
        Ok(params.into_result(entries))
    }
}

const NO_BUCKET: u32 = u32::MAX;

/// Counts terms by their ordinal.
///
/// The ordinal to bucket table is allocated once for all the terms of the segment's
/// dictionary; buckets are only created for the ordinals actually seen.
#[derive(Debug)]
pub(crate) struct OrdinalsTermsCollector {
    params: BucketParams,
    column: StrColumn,
    initial_bucket_capacity: usize,
    ord_to_bucket: Vec<u32>,
    /// `(term ordinal, doc count)`
    buckets: Vec<(u64, u64)>,
}

impl OrdinalsTermsCollector {
    pub(crate) fn new(params: BucketParams, column: StrColumn, bucket_capacity: usize) -> Self {
        let num_terms = column.dictionary().num_terms();
        OrdinalsTermsCollector {
            params,
            column,
            initial_bucket_capacity: bucket_capacity,
            ord_to_bucket: vec![NO_BUCKET; num_terms],
            buckets: Vec::with_capacity(bucket_capacity),
        }
    }
}

impl SegmentAggregationCollector for OrdinalsTermsCollector {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn collector_kind(&self) -> CollectorKind {
        CollectorKind::StringOrdinals
    }

    fn initial_bucket_capacity(&self) -> usize {
        self.initial_bucket_capacity
    }

    #[inline]
    fn collect(&mut self, docs: &[DocId]) -> crate::Result<()> {
        for &doc in docs {
            for &term_ord in self.column.term_ords(doc) {
                let bucket_idx = &mut self.ord_to_bucket[term_ord as usize];
                if *bucket_idx == NO_BUCKET {
                    *bucket_idx = self.buckets.len() as u32;
                    self.buckets.push((term_ord, 0));
                }
                self.buckets[*bucket_idx as usize].1 += 1;
            }
        }
        Ok(())
    }

    fn build_empty_result(&self) -> TermsResult {
        self.params.empty_result()
    }

    fn into_terms_result(self: Box<Self>) -> crate::Result<TermsResult> {
        let dictionary = self.column.dictionary();
        let mut entries: Vec<BucketEntry> = Vec::with_capacity(self.buckets.len());
        if self.params.min_doc_count == 0 {
            let unseen_terms = dictionary
                .iter()
                .filter(|(term_ord, _)| self.ord_to_bucket[*term_ord as usize] == NO_BUCKET)
                .take(self.params.shard_size as usize);
            entries.extend(unseen_terms.map(|(_, term)| str_bucket(term, 0)));
        }
        entries.extend(self.buckets.iter().filter_map(|&(term_ord, doc_count)| {
            let term = dictionary.ord_to_str(term_ord)?;
            Some(str_bucket(term, doc_count))
        }));
        Ok(self.params.into_result(entries))
    }
}

/// Integer columns a [`LongTermsCollector`] can read.
#[derive(Clone, Debug)]
pub(crate) enum IntegerColumn {
    I64(Column<i64>),
    U64(Column<u64>),
}

fn count_values<T: Copy>(
    column: &Column<T>,
    docs: &[DocId],
    buckets: &mut FxHashMap<u64, u64>,
    to_bucket_key: impl Fn(T) -> u64,
) {
    for &doc in docs {
        for &val in column.values_for_doc(doc) {
            *buckets.entry(to_bucket_key(val)).or_insert(0) += 1;
        }
    }
}

/// Counts integers in a hash map.
#[derive(Debug)]
pub(crate) struct LongTermsCollector {
    params: BucketParams,
    column: IntegerColumn,
    initial_bucket_capacity: usize,
    /// Keyed by the value's bit pattern.
    buckets: FxHashMap<u64, u64>,
}

impl LongTermsCollector {
    pub(crate) fn new(params: BucketParams, column: IntegerColumn, bucket_capacity: usize) -> Self {
        LongTermsCollector {
            params,
            column,
            initial_bucket_capacity: bucket_capacity,
            buckets: FxHashMap::with_capacity_and_hasher(bucket_capacity, Default::default()),
        }
    }
}

impl SegmentAggregationCollector for LongTermsCollector {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn collector_kind(&self) -> CollectorKind {
        CollectorKind::Long
    }

    fn initial_bucket_capacity(&self) -> usize {
        self.initial_bucket_capacity
    }

    fn collect(&mut self, docs: &[DocId]) -> crate::Result<()> {
        match &self.column {
            IntegerColumn::I64(column) => {
                count_values(column, docs, &mut self.buckets, |val| val as u64)
            }
            IntegerColumn::U64(column) => count_values(column, docs, &mut self.buckets, |val| val),
        }
        Ok(())
    }

    fn build_empty_result(&self) -> TermsResult {
        self.params.empty_result()
    }

    fn into_terms_result(self: Box<Self>) -> crate::Result<TermsResult> {
        let is_signed = matches!(self.column, IntegerColumn::I64(_));
        let entries = self
            .buckets
            .into_iter()
            .map(|(val, doc_count)| BucketEntry {
                key: if is_signed {
                    Key::I64(val as i64)
                } else {
                    Key::U64(val)
                },
                doc_count,
            })
            .collect();
        Ok(self.params.into_result(entries))
    }
}

/// Counts floating point numbers in a hash map.
#[derive(Debug)]
pub(crate) struct DoubleTermsCollector {
    params: BucketParams,
    column: Column<f64>,
    initial_bucket_capacity: usize,
    /// Keyed by `f64::to_bits`.
    buckets: FxHashMap<u64, u64>,
}

impl DoubleTermsCollector {
    pub(crate) fn new(params: BucketParams, column: Column<f64>, bucket_capacity: usize) -> Self {
        DoubleTermsCollector {
            params,
            column,
            initial_bucket_capacity: bucket_capacity,
            buckets: FxHashMap::with_capacity_and_hasher(bucket_capacity, Default::default()),
        }
    }
}

impl SegmentAggregationCollector for DoubleTermsCollector {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn collector_kind(&self) -> CollectorKind {
        CollectorKind::Double
    }

    fn initial_bucket_capacity(&self) -> usize {
        self.initial_bucket_capacity
    }

    fn collect(&mut self, docs: &[DocId]) -> crate::Result<()> {
        count_values(&self.column, docs, &mut self.buckets, f64::to_bits);
        Ok(())
    }

    fn build_empty_result(&self) -> TermsResult {
        self.params.empty_result()
    }

    fn into_terms_result(self: Box<Self>) -> crate::Result<TermsResult> {
        let entries = self
            .buckets
            .into_iter()
            .map(|(bits, doc_count)| BucketEntry {
                key: Key::F64(f64::from_bits(bits)),
                doc_count,
            })
            .collect();
        Ok(self.params.into_result(entries))
    }
}

/// Stands in for a terms aggregation on a field the segment does not have.
///
/// It never visits documents and always returns the same empty result.
#[derive(Debug)]
pub(crate) struct UnmappedTermsAggregator {
    result: TermsResult,
}

impl UnmappedTermsAggregator {
    pub(crate) fn new(params: &BucketParams) -> Self {
        UnmappedTermsAggregator {
            result: params.empty_result(),
        }
    }
}

impl SegmentAggregationCollector for UnmappedTermsAggregator {
    fn name(&self) -> &str {
        &self.result.name
    }

    fn collector_kind(&self) -> CollectorKind {
        CollectorKind::Unmapped
    }

    fn initial_bucket_capacity(&self) -> usize {
        0
    }

    fn collect(&mut self, _docs: &[DocId]) -> crate::Result<()> {
        Ok(())
    }

    fn build_empty_result(&self) -> TermsResult {
        self.result.clone()
    }

    fn into_terms_result(self: Box<Self>) -> crate::Result<TermsResult> {
        Ok(self.result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::aggregation::bucket::term_agg::tests::config_from_json;

    fn bucket_params(
        req: serde_json::Value,
    ) -> crate::Result<(BucketParams, Option<IncludeExclude>)> {
        let config = config_from_json("genres", req)?;
        Ok((BucketParams::from_config(&config), config.include_exclude))
    }

    fn genres() -> Vec<Vec<&'static str>> {
        vec![
            vec!["jazz"],
            vec!["rock", "jazz"],
            vec![],
            vec!["blues"],
            vec!["jazz"],
        ]
    }

    #[test]
    fn test_map_collector_on_bytes() -> crate::Result<()> {
        let (params, include_exclude) = bucket_params(json!({ "field": "genre" }))?;
        let column = TermColumn::Bytes(BytesColumn::from_docs(&genres()));
        let mut collector = Box::new(MapTermsCollector::new(params, column, include_exclude, 8));
        assert_eq!(collector.initial_bucket_capacity(), 8);
        assert!(collector.buckets.capacity() >= 8);
        collector.collect(&[0, 1, 2, 3])?;
        collector.collect(&[4])?;
        let result = collector.into_terms_result()?;
        assert_eq!(
            result.buckets,
            vec![str_bucket("jazz", 3), str_bucket("blues", 1), str_bucket("rock", 1)]
        );
        assert_eq!(result.sum_other_doc_count, 0);
        Ok(())
    }

    #[test]
    fn test_map_collector_keeps_invalid_utf8_terms_apart() -> crate::Result<()> {
        let (params, include_exclude) = bucket_params(json!({ "field": "genre" }))?;
        let column =
            TermColumn::Bytes(BytesColumn::from_docs(&[vec![vec![0xffu8]], vec![vec![0xfe]]]));
        let mut collector = Box::new(MapTermsCollector::new(params, column, include_exclude, 8));
        collector.collect(&[0, 1])?;
        let mut result = collector.into_terms_result()?;
        assert_eq!(
            result.buckets,
            vec![
                BucketEntry {
                    key: Key::Bytes(vec![0xfe]),
                    doc_count: 1,
                },
                BucketEntry {
                    key: Key::Bytes(vec![0xff]),
                    doc_count: 1,
                },
            ]
        );

        let other_segment = result.clone();
        result.merge_fruits(other_segment);
        assert_eq!(result.buckets.len(), 2);
        assert_eq!(result.bucket(&Key::Bytes(vec![0xff])).map(|b| b.doc_count), Some(2));
        assert_eq!(result.bucket(&Key::Bytes(vec![0xfe])).map(|b| b.doc_count), Some(2));
        Ok(())
    }

    #[test]
    fn test_map_collector_applies_filter() -> crate::Result<()> {
        let (params, include_exclude) =
            bucket_params(json!({ "field": "genre", "exclude": ["jazz"] }))?;
        let column = TermColumn::Str(StrColumn::from_docs(&genres()));
        let mut collector = Box::new(MapTermsCollector::new(params, column, include_exclude, 50));
        collector.collect(&[0, 1, 2, 3, 4])?;
        let result = collector.into_terms_result()?;
        assert_eq!(result.buckets, vec![str_bucket("blues", 1), str_bucket("rock", 1)]);
        Ok(())
    }

    #[test]
    fn test_map_collector_min_doc_count_zero() -> crate::Result<()> {
        let (params, include_exclude) = bucket_params(json!({
            "field": "genre",
            "min_doc_count": 0,
            "exclude": ["rock"],
        }))?;
        let column = TermColumn::Str(StrColumn::from_docs(&genres()));
        let mut collector = Box::new(MapTermsCollector::new(params, column, include_exclude, 50));
        collector.collect(&[0])?;
        let result = collector.into_terms_result()?;
        assert_eq!(result.buckets, vec![str_bucket("jazz", 1), str_bucket("blues", 0)]);
        Ok(())
    }

    #[test]
    fn test_ordinals_collector() -> crate::Result<()> {
        let (params, _) =
            bucket_params(json!({ "field": "genre", "size": 1, "shard_size": 2 }))?;
        let column = StrColumn::from_docs(&genres());
        let mut collector = Box::new(OrdinalsTermsCollector::new(params, column, 3));
        assert_eq!(collector.ord_to_bucket.len(), 3);
        assert!(collector.buckets.capacity() >= 3);
        collector.collect(&[0, 1, 2, 3, 4])?;
        let result = collector.into_terms_result()?;
        assert_eq!(result.buckets, vec![str_bucket("jazz", 3), str_bucket("blues", 1)]);
        assert_eq!(result.sum_other_doc_count, 1);
        assert_eq!(result.doc_count_error_upper_bound, 1);

        let result = result.into_final();
        assert_eq!(result.buckets, vec![str_bucket("jazz", 3)]);
        assert_eq!(result.sum_other_doc_count, 2);
        Ok(())
    }

    #[test]
    fn test_ordinals_collector_min_doc_count_zero() -> crate::Result<()> {
        let (params, _) = bucket_params(json!({
            "field": "genre",
            "min_doc_count": 0,
            "order": { "_key": "asc" },
        }))?;
        let column = StrColumn::from_docs(&genres());
        let mut collector = Box::new(OrdinalsTermsCollector::new(params, column, 3));
        collector.collect(&[3])?;
        let result = collector.into_terms_result()?;
        assert_eq!(
            result.buckets,
            vec![str_bucket("blues", 1), str_bucket("jazz", 0), str_bucket("rock", 0)]
        );
        Ok(())
    }

    #[test]
    fn test_long_collector() -> crate::Result<()> {
        let (params, _) =
            bucket_params(json!({ "field": "score", "order": { "_key": "asc" } }))?;
        let column = IntegerColumn::I64(Column::from_docs(&[vec![-5], vec![3, -5], vec![]]));
        let mut collector = Box::new(LongTermsCollector::new(params, column, 50));
        collector.collect(&[0, 1, 2])?;
        let result = collector.into_terms_result()?;
        assert_eq!(
            result.buckets,
            vec![
                BucketEntry {
                    key: Key::I64(-5),
                    doc_count: 2,
                },
                BucketEntry {
                    key: Key::I64(3),
                    doc_count: 1,
                },
            ]
        );

        let (params, _) = bucket_params(json!({ "field": "score" }))?;
        let column = IntegerColumn::U64(Column::from_docs(&[vec![u64::MAX]]));
        let mut collector = Box::new(LongTermsCollector::new(params, column, 50));
        collector.collect(&[0])?;
        let result = collector.into_terms_result()?;
        assert_eq!(result.buckets[0].key, Key::U64(u64::MAX));
        Ok(())
    }

    #[test]
    fn test_double_collector() -> crate::Result<()> {
        let (params, _) = bucket_params(json!({ "field": "price" }))?;
        let column = Column::from_docs(&[vec![1.5], vec![1.5], vec![-0.25]]);
        let mut collector = Box::new(DoubleTermsCollector::new(params, column, 50));
        assert_eq!(collector.collector_kind(), CollectorKind::Double);
        collector.collect(&[0, 1, 2])?;
        let result = collector.into_terms_result()?;
        assert_eq!(
            result.buckets,
            vec![
                BucketEntry {
                    key: Key::F64(1.5),
                    doc_count: 2,
                },
                BucketEntry {
                    key: Key::F64(-0.25),
                    doc_count: 1,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_unmapped_aggregator() -> crate::Result<()> {
        let (params, _) =
            bucket_params(json!({ "field": "missing", "size": 3, "min_doc_count": 2 }))?;
        let mut collector = Box::new(UnmappedTermsAggregator::new(&params));
        collector.collect(&[0, 1, 2])?;
        assert_eq!(collector.name(), "genres");
        assert_eq!(collector.initial_bucket_capacity(), 0);
        let empty = collector.build_empty_result();
        let result = collector.into_terms_result()?;
        assert_eq!(result, empty);
        assert!(result.buckets.is_empty());
        assert_eq!(result.required_size, 3);
        assert_eq!(result.min_doc_count, 2);
        assert_eq!(result.order, CustomOrder::default());
        Ok(())
    }
}
