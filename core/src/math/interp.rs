use crate::prelude::OUT_OF_RANGE;

/// Piecewise-linear interpolation and bracket search over a monotone column.
pub struct InterpHelper;

impl InterpHelper {
    /// Interpolates `x` over the samples `(xp, fp)`.
    ///
    /// `xp` must be non-decreasing. Inputs strictly outside `[xp[0], xp[n-1]]`
    /// map to [`OUT_OF_RANGE`]; NaN propagates.
    pub fn linear(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
        let n = xp.len();
        if x.is_nan() {
            return f64::NAN;
        }
        if n == 0 || x < xp[0] || x > xp[n - 1] {
            return OUT_OF_RANGE;
        }
        if x == xp[n - 1] {
            return fp[n - 1];
        }

        // Last sample at or below x; xp[lo + 1] > x so the width is positive.
        let lo = xp.partition_point(|&v| v <= x) - 1;
        let hi = lo + 1;
        let slope = (fp[hi] - fp[lo]) / (xp[hi] - xp[lo]);
        slope * (x - xp[lo]) + fp[lo]
    }

    /// Index of the sample nearest to `x`, lowest index on ties.
    ///
    /// Equivalent to an arg-min over `|xp - x|` for a non-decreasing column.
    pub fn nearest_index(xp: &[f64], x: f64) -> usize {
        let n = xp.len();
        let above = Self::first_at_or_above(xp, x);
        if above == 0 {
            return 0;
        }
        if above == n {
            return Self::first_at_or_above(xp, xp[n - 1]);
        }

        let below = above - 1;
        if x - xp[below] <= xp[above] - x {
            Self::first_at_or_above(xp, xp[below])
        } else {
            above
        }
    }

    fn first_at_or_above(xp: &[f64], x: f64) -> usize {
        xp.partition_point(|&v| v < x)
    }
}
