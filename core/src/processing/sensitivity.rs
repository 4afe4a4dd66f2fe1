use crate::lut::CalibrationLut;
use crate::math::interp::InterpHelper;
use crate::prelude::{Channel, ConvertError, ConvertResult};
use ndarray::{Array, ArrayBase, Data, Dimension};

/// Local slope dBT/dL for every radiance sample.
///
/// Each sample is matched to its nearest tabulated radiance. When that sample
/// lies above the input the bracket is `[idx - 1, idx]`, otherwise
/// `[idx, idx + 1]`. At either end of the table the bracket is clamped onto
/// the only neighbour available, so the first and last samples use the first
/// and last table segments respectively. The slope is a finite difference over
/// the bracket, not a tangent.
pub fn bt_sensitivity<S, D>(
    radiance: &ArrayBase<S, D>,
    channel: Channel,
    lut: &CalibrationLut,
) -> ConvertResult<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let xp = lut.radiance(channel);
    let fp = lut.bt(channel);

    let mut slopes = Array::zeros(radiance.raw_dim());
    for (slope, &value) in slopes.iter_mut().zip(radiance.iter()) {
        *slope = local_slope(value, xp, fp)?;
    }
    Ok(slopes)
}

fn local_slope(value: f64, xp: &[f64], fp: &[f64]) -> ConvertResult<f64> {
    if value.is_nan() {
        return Ok(f64::NAN);
    }

    let (lo, hi) = bracket(value, xp)?;
    Ok((fp[hi] - fp[lo]) / (xp[hi] - xp[lo]))
}

/// Bracket `[lo, lo + 1]` with positive width around `value`.
///
/// A run of repeated samples is stepped over toward the side `value` lies
/// on, falling back to the other side. Only a constant column fails.
fn bracket(value: f64, xp: &[f64]) -> ConvertResult<(usize, usize)> {
    let len = xp.len();
    let idx = InterpHelper::nearest_index(xp, value);
    let lo = if xp[idx] > value {
        idx.saturating_sub(1)
    } else {
        idx.min(len - 2)
    };
    if xp[lo + 1] > xp[lo] {
        return Ok((lo, lo + 1));
    }

    let upward = (lo + 1..len - 1).find(|&i| xp[i + 1] > xp[i]);
    let downward = (0..lo).rev().find(|&i| xp[i + 1] > xp[i]);
    let nearest = if value >= xp[lo] {
        upward.or(downward)
    } else {
        downward.or(upward)
    };
    nearest
        .map(|start| (start, start + 1))
        .ok_or(ConvertError::IndexBounds { index: lo, len })
}
