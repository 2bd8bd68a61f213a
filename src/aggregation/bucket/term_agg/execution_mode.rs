use std::fmt;
use std::str::FromStr;

use crate::aggregation::{AggregationError, ORDINALS_MAX_DOC_SHIFT};
use crate::DocId;

/// How a terms aggregation collects a string column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Terms are hashed into a map.
    Map,
    /// Terms are bucketed by their segment-local ordinal.
    Ordinals,
}

impl ExecutionMode {
    /// All execution modes.
    pub const ALL: [ExecutionMode; 2] = [ExecutionMode::Map, ExecutionMode::Ordinals];

    /// The name used in `execution_hint`.
    pub fn name(self) -> &'static str {
        match self {
            ExecutionMode::Map => "map",
            ExecutionMode::Ordinals => "ordinals",
        }
    }

    /// Looks up an execution mode by its exact, case-sensitive name.
    pub fn from_name(name: &str) -> Result<ExecutionMode, AggregationError> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == name)
            .ok_or_else(|| AggregationError::UnknownExecutionHint {
                hint: name.to_string(),
                expected: Self::ALL.into_iter().map(ExecutionMode::name).collect(),
            })
    }
}

impl FromStr for ExecutionMode {
    type Err = AggregationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ExecutionMode::from_name(name)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What is known about a string column and its surroundings when picking its execution mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionModeInputs {
    /// The column exposes term ordinals.
    pub has_ordinals_support: bool,
    /// An include/exclude filter is attached.
    pub has_filter: bool,
    /// An enclosing aggregator instantiates this aggregator once per bucket.
    pub has_unbounded_ancestor: bool,
    /// Upper bound of distinct values in a segment, `None` if unknown.
    pub estimated_unique_count: Option<u64>,
    /// Document count of the largest open segment.
    pub max_doc_in_largest_segment: DocId,
}

impl ExecutionModeInputs {
    /// Picks the execution mode. The first applicable rule wins:
    /// 1. no ordinals on the column: `Map`,
    /// 2. a filter is attached: `Map`, and a forced `Ordinals` is an error,
    /// 3. an explicit hint: the hint,
    /// 4. otherwise the outcome of the ordinals heuristic.
    pub fn resolve(
        &self,
        agg_name: &str,
        hint: Option<ExecutionMode>,
        ordinals_max_doc_shift: u32,
    ) -> Result<ExecutionMode, AggregationError> {
        if !self.has_ordinals_support {
            return Ok(ExecutionMode::Map);
        }
        if self.has_filter {
            if hint == Some(ExecutionMode::Ordinals) {
                return Err(AggregationError::OrdinalsIncompatibleWithFilter {
                    agg_name: agg_name.to_string(),
                    mode: ExecutionMode::Ordinals,
                });
            }
            return Ok(ExecutionMode::Map);
        }
        if let Some(hint) = hint {
            return Ok(hint);
        }
        Ok(self.heuristic(ordinals_max_doc_shift).0)
    }

    /// The default choice when nothing forces a mode, along with the reason for logging.
    pub(crate) fn heuristic(&self, ordinals_max_doc_shift: u32) -> (ExecutionMode, &'static str) {
        // Many short-lived instances seeing few documents each do not amortize the ordinal
        // table.
        if self.has_unbounded_ancestor {
            return (ExecutionMode::Map, "per-bucket ancestor");
        }
        let Some(estimated_unique_count) = self.estimated_unique_count else {
            return (ExecutionMode::Map, "unknown cardinality");
        };
        let max_unique_count_for_ordinals = self
            .max_doc_in_largest_segment
            .checked_shr(ordinals_max_doc_shift)
            .unwrap_or(0);
        if estimated_unique_count > max_unique_count_for_ordinals as u64 {
            return (ExecutionMode::Map, "high cardinality");
        }
        (ExecutionMode::Ordinals, "low cardinality")
    }
}

/// [`ExecutionModeInputs::resolve`] with the default cardinality threshold.
pub fn resolve_execution_mode(
    agg_name: &str,
    hint: Option<ExecutionMode>,
    inputs: &ExecutionModeInputs,
) -> Result<ExecutionMode, AggregationError> {
    inputs.resolve(agg_name, hint, ORDINALS_MAX_DOC_SHIFT)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn eligible(estimated_unique_count: u64, max_doc: DocId) -> ExecutionModeInputs {
        ExecutionModeInputs {
            has_ordinals_support: true,
            has_filter: false,
            has_unbounded_ancestor: false,
            estimated_unique_count: Some(estimated_unique_count),
            max_doc_in_largest_segment: max_doc,
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ExecutionMode::from_name("map"), Ok(ExecutionMode::Map));
        assert_eq!("ordinals".parse::<ExecutionMode>(), Ok(ExecutionMode::Ordinals));
        assert_eq!(ExecutionMode::Ordinals.to_string(), "ordinals");
        for mode in ExecutionMode::ALL {
            assert_eq!(ExecutionMode::from_name(mode.name()), Ok(mode));
        }
    }

    #[test]
    fn test_from_name_unknown() {
        for hint in ["MAP", "Ordinals", "global_ordinals", "", " map"] {
            let err = ExecutionMode::from_name(hint).unwrap_err();
            assert_eq!(
                err,
                AggregationError::UnknownExecutionHint {
                    hint: hint.to_string(),
                    expected: vec!["map", "ordinals"],
                }
            );
        }
        let message = ExecutionMode::from_name("hash").unwrap_err().to_string();
        assert!(message.contains("[hash]"));
        assert!(message.contains("\"map\""));
        assert!(message.contains("\"ordinals\""));
    }

    #[test]
    fn test_high_cardinality_uses_map() {
        // 512 >> 4 = 32
        let mode = resolve_execution_mode("agg", None, &eligible(40, 512)).unwrap();
        assert_eq!(mode, ExecutionMode::Map);
    }

    #[test]
    fn test_low_cardinality_uses_ordinals() {
        let mode = resolve_execution_mode("agg", None, &eligible(20, 512)).unwrap();
        assert_eq!(mode, ExecutionMode::Ordinals);
        let mode = resolve_execution_mode("agg", None, &eligible(40, 1024)).unwrap();
        assert_eq!(mode, ExecutionMode::Ordinals);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mode = resolve_execution_mode("agg", None, &eligible(32, 512)).unwrap();
        assert_eq!(mode, ExecutionMode::Ordinals);
        let mode = resolve_execution_mode("agg", None, &eligible(33, 512)).unwrap();
        assert_eq!(mode, ExecutionMode::Map);
    }

    #[test]
    fn test_custom_shift() {
        let inputs = eligible(40, 512);
        assert_eq!(
            inputs.resolve("agg", None, 3).unwrap(),
            ExecutionMode::Ordinals
        );
        assert_eq!(inputs.resolve("agg", None, 64).unwrap(), ExecutionMode::Map);
    }

    #[test]
    fn test_unknown_cardinality_uses_map() {
        let inputs = ExecutionModeInputs {
            estimated_unique_count: None,
            ..eligible(0, 1_000_000)
        };
        assert_eq!(
            resolve_execution_mode("agg", None, &inputs).unwrap(),
            ExecutionMode::Map
        );
    }

    #[test]
    fn test_empty_segments() {
        let inputs = eligible(0, 0);
        assert_eq!(
            resolve_execution_mode("agg", None, &inputs).unwrap(),
            ExecutionMode::Ordinals
        );
        let inputs = eligible(1, 0);
        assert_eq!(
            resolve_execution_mode("agg", None, &inputs).unwrap(),
            ExecutionMode::Map
        );
    }

    #[test]
    fn test_explicit_hint_wins_over_heuristic() {
        let high_cardinality = eligible(10_000, 512);
        assert_eq!(
            resolve_execution_mode("agg", Some(ExecutionMode::Ordinals), &high_cardinality)
                .unwrap(),
            ExecutionMode::Ordinals
        );
        let low_cardinality = eligible(1, 512);
        assert_eq!(
            resolve_execution_mode("agg", Some(ExecutionMode::Map), &low_cardinality).unwrap(),
            ExecutionMode::Map
        );
        let under_per_bucket = ExecutionModeInputs {
            has_unbounded_ancestor: true,
            ..low_cardinality
        };
        assert_eq!(
            resolve_execution_mode("agg", Some(ExecutionMode::Ordinals), &under_per_bucket)
                .unwrap(),
            ExecutionMode::Ordinals
        );
    }

    #[test]
    fn test_ordinals_hint_with_filter_is_an_error() {
        let inputs = ExecutionModeInputs {
            has_filter: true,
            ..eligible(1, 512)
        };
        let err =
            resolve_execution_mode("genres", Some(ExecutionMode::Ordinals), &inputs).unwrap_err();
        assert_eq!(
            err,
            AggregationError::OrdinalsIncompatibleWithFilter {
                agg_name: "genres".to_string(),
                mode: ExecutionMode::Ordinals,
            }
        );
        assert!(err.to_string().contains("genres"));
        assert!(err.to_string().contains("ordinals"));
    }

    #[test]
    fn test_no_ordinals_support_ignores_ordinals_hint_even_with_filter() {
        let inputs = ExecutionModeInputs {
            has_ordinals_support: false,
            has_filter: true,
            ..eligible(1, 512)
        };
        assert_eq!(
            resolve_execution_mode("agg", Some(ExecutionMode::Ordinals), &inputs).unwrap(),
            ExecutionMode::Map
        );
    }

    fn any_hint() -> impl Strategy<Value = Option<ExecutionMode>> {
        prop_oneof![
            Just(None),
            Just(Some(ExecutionMode::Map)),
            Just(Some(ExecutionMode::Ordinals)),
        ]
    }

    fn any_inputs() -> impl Strategy<Value = ExecutionModeInputs> {
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            proptest::option::of(0u64..100_000),
            0u32..1_000_000,
        )
            .prop_map(
                |(
                    has_ordinals_support,
                    has_filter,
                    has_unbounded_ancestor,
                    estimated_unique_count,
                    max_doc_in_largest_segment,
                )| ExecutionModeInputs {
                    has_ordinals_support,
                    has_filter,
                    has_unbounded_ancestor,
                    estimated_unique_count,
                    max_doc_in_largest_segment,
                },
            )
    }

    proptest! {
        #[test]
        fn test_no_ordinals_support_always_map(hint in any_hint(), inputs in any_inputs()) {
            let inputs = ExecutionModeInputs { has_ordinals_support: false, ..inputs };
            prop_assert_eq!(resolve_execution_mode("agg", hint, &inputs), Ok(ExecutionMode::Map));
        }

        #[test]
        fn test_filter_never_ordinals(hint in any_hint(), inputs in any_inputs()) {
            let inputs = ExecutionModeInputs { has_filter: true, ..inputs };
            match resolve_execution_mode("agg", hint, &inputs) {
                Ok(mode) => prop_assert_eq!(mode, ExecutionMode::Map),
                Err(err) => {
                    prop_assert!(inputs.has_ordinals_support);
                    prop_assert_eq!(hint, Some(ExecutionMode::Ordinals));
                    let is_filter_error =
                        matches!(err, AggregationError::OrdinalsIncompatibleWithFilter { .. });
                    prop_assert!(is_filter_error);
                }
            }
        }

        #[test]
        fn test_unbounded_ancestor_without_hint_is_map(inputs in any_inputs()) {
            let inputs = ExecutionModeInputs { has_unbounded_ancestor: true, ..inputs };
            prop_assert_eq!(resolve_execution_mode("agg", None, &inputs), Ok(ExecutionMode::Map));
        }

        #[test]
        fn test_resolution_is_idempotent(hint in any_hint(), inputs in any_inputs()) {
            prop_assert_eq!(
                resolve_execution_mode("agg", hint, &inputs),
                resolve_execution_mode("agg", hint, &inputs)
            );
        }
    }
}
