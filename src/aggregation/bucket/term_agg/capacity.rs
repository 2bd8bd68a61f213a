use crate::aggregation::TermsExecutionSettings;

/// Initial capacity of the bucket table of a terms collector, with the default settings.
///
/// `max_unique_values` is the cardinality hint of the values source, `None` when unknown.
/// See [`TermsExecutionSettings::estimate_bucket_capacity`].
pub fn estimate_bucket_capacity(max_unique_values: Option<u64>) -> usize {
    TermsExecutionSettings::default().estimate_bucket_capacity(max_unique_values)
}

impl TermsExecutionSettings {
    /// Initial capacity of the bucket table of a terms collector.
    ///
    /// Unknown cardinality falls back to `default_bucket_capacity`. Known cardinality is
    /// capped at `max_initial_bucket_capacity`: some columns only report a loose upper bound,
    /// and not every term is necessarily hit by the matching documents.
    pub fn estimate_bucket_capacity(&self, max_unique_values: Option<u64>) -> usize {
        match max_unique_values {
            None => self.default_bucket_capacity,
            Some(max_unique_values) => {
                let max_unique_values = usize::try_from(max_unique_values).unwrap_or(usize::MAX);
                max_unique_values.min(self.max_initial_bucket_capacity)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::aggregation::{ValuesSourceMetadata, DEFAULT_BUCKET_CAPACITY};

    #[test]
    fn test_estimate_bucket_capacity() {
        assert_eq!(estimate_bucket_capacity(None), 50);
        assert_eq!(estimate_bucket_capacity(Some(0)), 0);
        assert_eq!(estimate_bucket_capacity(Some(10)), 10);
        assert_eq!(estimate_bucket_capacity(Some(512)), 512);
        assert_eq!(estimate_bucket_capacity(Some(513)), 512);
        assert_eq!(estimate_bucket_capacity(Some(u64::MAX)), 512);
    }

    #[test]
    fn test_estimate_bucket_capacity_custom_settings() {
        let settings = TermsExecutionSettings {
            default_bucket_capacity: 16,
            max_initial_bucket_capacity: 64,
            ..Default::default()
        };
        assert_eq!(settings.estimate_bucket_capacity(None), 16);
        assert_eq!(settings.estimate_bucket_capacity(Some(1_000)), 64);
        assert_eq!(settings.estimate_bucket_capacity(Some(3)), 3);
    }

    proptest! {
        #[test]
        fn test_negative_raw_hint_uses_default(raw_count in i64::MIN..0) {
            let metadata = ValuesSourceMetadata::from_raw_count(raw_count);
            prop_assert_eq!(
                estimate_bucket_capacity(metadata.max_unique_values_per_segment()),
                DEFAULT_BUCKET_CAPACITY
            );
        }

        #[test]
        fn test_known_hint_is_clamped(raw_count in 0i64..=i64::MAX) {
            let metadata = ValuesSourceMetadata::from_raw_count(raw_count);
            let capacity = estimate_bucket_capacity(metadata.max_unique_values_per_segment());
            prop_assert_eq!(capacity as i64, raw_count.min(512));
            prop_assert!(capacity <= 512);
        }
    }
}
