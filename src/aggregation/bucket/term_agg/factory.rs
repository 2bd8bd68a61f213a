use log::debug;

use super::collectors::{
    BucketParams, DoubleTermsCollector, IntegerColumn, LongTermsCollector, MapTermsCollector,
    OrdinalsTermsCollector, TermColumn, UnmappedTermsAggregator,
};
use super::{ExecutionMode, ExecutionModeInputs, IncludeExclude, TermsAggregatorConfig};
use crate::aggregation::{
    has_unbounded_ancestor, AggregationContext, AggregationError, AggregatorNode,
    BucketAggregationMode, SegmentAggregationCollector, TermsExecutionSettings, ValuesSource,
};
use crate::column::{ColumnType, DynamicColumn};
use crate::{SegmentOrdinal, TermsPlannerError};

/// Builds the segment collectors of one terms aggregation.
///
/// The factory sizes the collector's bucket table from the values source metadata, picks the
/// [`ExecutionMode`] of string columns and instantiates the matching collector:
///
/// | column                     | collector                         |
/// |----------------------------|-----------------------------------|
/// | missing from the segment   | unmapped, never collects          |
/// | `Str`                      | ordinals or hash map              |
/// | `Bytes`                    | hash map                          |
/// | `I64`, `U64`               | integer hash map                  |
/// | `F64`                      | floating point hash map           |
/// | anything else              | [`AggregationError::UnsupportedFieldKind`] |
#[derive(Clone, Debug)]
pub struct TermsAggregatorFactory {
    config: TermsAggregatorConfig,
}

impl TermsAggregatorFactory {
    /// Creates a factory for the given aggregation.
    pub fn new(config: TermsAggregatorConfig) -> Self {
        TermsAggregatorFactory { config }
    }

    /// The configuration collectors are built with.
    pub fn config(&self) -> &TermsAggregatorConfig {
        &self.config
    }

    /// The node of this terms aggregation in the aggregation tree, nested under `parent`.
    ///
    /// A terms aggregation runs its sub aggregations once per term bucket, so the node is
    /// [`BucketAggregationMode::PerBucket`].
    pub fn node<'a>(&'a self, parent: Option<&'a AggregatorNode<'a>>) -> AggregatorNode<'a> {
        let mode = BucketAggregationMode::PerBucket;
        match parent {
            Some(parent) => AggregatorNode::child_of(parent, &self.config.name, mode),
            None => AggregatorNode::root(&self.config.name, mode),
        }
    }

    /// Builds the collector for a segment of the context's searcher.
    ///
    /// A segment without a column for the field gets the unmapped collector.
    pub fn create_for_segment(
        &self,
        context: &AggregationContext,
        segment_ord: SegmentOrdinal,
        parent: Option<&AggregatorNode<'_>>,
    ) -> crate::Result<Box<dyn SegmentAggregationCollector>> {
        let segment_reader = context
            .searcher()
            .segment_reader(segment_ord)
            .ok_or_else(|| {
                TermsPlannerError::InvalidArgument(format!(
                    "Segment {segment_ord} does not exist, the searcher has {} segments",
                    context.searcher().segment_readers().len()
                ))
            })?;
        let values_source = segment_reader
            .fast_fields()
            .column(&self.config.field)
            .cloned()
            .map(ValuesSource::from_column);
        self.create(values_source.as_ref(), context, parent)
    }

    /// Builds the collector reading from `values_source`, `None` if the field is unmapped.
    ///
    /// `parent` is the aggregator the terms aggregation is nested in, `None` at the top level.
    pub fn create(
        &self,
        values_source: Option<&ValuesSource>,
        context: &AggregationContext,
        parent: Option<&AggregatorNode<'_>>,
    ) -> crate::Result<Box<dyn SegmentAggregationCollector>> {
        let config = &self.config;
        let params = BucketParams::from_config(config);
        let Some(values_source) = values_source else {
            debug!(
                "terms aggregation [{}]: field [{}] is unmapped",
                config.name, config.field
            );
            return Ok(Box::new(UnmappedTermsAggregator::new(&params)));
        };

        let settings = &context.params().terms_execution;
        let bucket_capacity = settings
            .estimate_bucket_capacity(values_source.metadata().max_unique_values_per_segment());

        if values_source.is_bytes() {
            let hint = config
                .execution_hint
                .as_deref()
                .map(ExecutionMode::from_name)
                .transpose()?;
            let inputs = ExecutionModeInputs {
                has_ordinals_support: values_source.supports_ordinals(),
                has_filter: config.include_exclude.is_some(),
                has_unbounded_ancestor: has_unbounded_ancestor(parent),
                estimated_unique_count: values_source.metadata().max_unique_values_per_segment(),
                max_doc_in_largest_segment: context.max_doc_in_largest_segment(),
            };
            let execution_mode =
                inputs.resolve(&config.name, hint, settings.ordinals_max_doc_shift)?;
            debug!(
                "terms aggregation [{}]: execution mode {execution_mode} ({}), bucket capacity \
                 {bucket_capacity}",
                config.name,
                resolution_reason(&inputs, hint, settings)
            );
            return create_string_collector(
                execution_mode,
                params,
                values_source.column(),
                config.include_exclude.clone(),
                bucket_capacity,
                &config.field,
            );
        }

        if config.include_exclude.is_some() {
            return Err(AggregationError::FilterNotSupported {
                agg_name: config.name.to_string(),
                field: config.field.to_string(),
            }
            .into());
        }
        let collector: Box<dyn SegmentAggregationCollector> = match values_source.column() {
            DynamicColumn::F64(column) => Box::new(DoubleTermsCollector::new(
                params,
                column.clone(),
                bucket_capacity,
            )),
            DynamicColumn::I64(column) => Box::new(LongTermsCollector::new(
                params,
                IntegerColumn::I64(column.clone()),
                bucket_capacity,
            )),
            DynamicColumn::U64(column) => Box::new(LongTermsCollector::new(
                params,
                IntegerColumn::U64(column.clone()),
                bucket_capacity,
            )),
            _ => return Err(unsupported_field_kind(&config.field, values_source.column_type())),
        };
        debug!(
            "terms aggregation [{}]: {:?} collector, bucket capacity {bucket_capacity}",
            config.name,
            collector.collector_kind()
        );
        Ok(collector)
    }
}

fn unsupported_field_kind(field: &str, column_type: ColumnType) -> TermsPlannerError {
    AggregationError::UnsupportedFieldKind {
        field: field.to_string(),
        column_type,
    }
    .into()
}

/// Instantiates the string collector of an execution mode.
fn create_string_collector(
    execution_mode: ExecutionMode,
    params: BucketParams,
    column: &DynamicColumn,
    include_exclude: Option<IncludeExclude>,
    bucket_capacity: usize,
    field: &str,
) -> crate::Result<Box<dyn SegmentAggregationCollector>> {
    match (execution_mode, column) {
        (ExecutionMode::Ordinals, DynamicColumn::Str(str_column)) => Ok(Box::new(
            OrdinalsTermsCollector::new(params, str_column.clone(), bucket_capacity),
        )),
        (ExecutionMode::Map, DynamicColumn::Str(str_column)) => Ok(Box::new(
            MapTermsCollector::new(
                params,
                TermColumn::Str(str_column.clone()),
                include_exclude,
                bucket_capacity,
            ),
        )),
        (ExecutionMode::Map, DynamicColumn::Bytes(bytes_column)) => Ok(Box::new(
            MapTermsCollector::new(
                params,
                TermColumn::Bytes(bytes_column.clone()),
                include_exclude,
                bucket_capacity,
            ),
        )),
        (_, column) => Err(unsupported_field_kind(field, column.column_type())),
    }
}

fn resolution_reason(
    inputs: &ExecutionModeInputs,
    hint: Option<ExecutionMode>,
    settings: &TermsExecutionSettings,
) -> &'static str {
    if !inputs.has_ordinals_support {
        "no term ordinals"
    } else if inputs.has_filter {
        "include/exclude filter"
    } else if hint.is_some() {
        "execution hint"
    } else {
        inputs.heuristic(settings.ordinals_max_doc_shift).1
    }
}
