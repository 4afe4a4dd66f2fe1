use crate::prelude::is_out_of_range;

/// Summaries that never treat the out-of-range sentinel as a value.
pub struct StatsHelper;

impl StatsHelper {
    /// Mean of the samples that are neither NaN nor the sentinel.
    pub fn valid_mean<'a, I>(samples: I) -> Option<f64>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let (sum, count) = samples
            .into_iter()
            .filter(|&&v| Self::is_valid(v))
            .fold((0.0, 0usize), |(sum, count), &v| (sum + v, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    pub fn out_of_range_count<'a, I>(samples: I) -> usize
    where
        I: IntoIterator<Item = &'a f64>,
    {
        samples
            .into_iter()
            .filter(|&&v| is_out_of_range(v))
            .count()
    }

    pub fn is_valid(value: f64) -> bool {
        !value.is_nan() && !is_out_of_range(value)
    }
}
