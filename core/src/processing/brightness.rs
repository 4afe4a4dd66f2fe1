use crate::lut::CalibrationLut;
use crate::math::interp::InterpHelper;
use crate::prelude::Channel;
use ndarray::{Array, ArrayBase, Data, Dimension};

/// Radiance to brightness temperature by piecewise-linear LUT interpolation.
///
/// The output has the shape of `radiance`. Samples outside the tabulated
/// radiance range become [`crate::prelude::OUT_OF_RANGE`].
pub fn radiance_to_bt<S, D>(
    radiance: &ArrayBase<S, D>,
    channel: Channel,
    lut: &CalibrationLut,
) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let xp = lut.radiance(channel);
    let fp = lut.bt(channel);
    radiance.mapv(|value| InterpHelper::linear(value, xp, fp))
}

/// Brightness temperature to radiance, the inverse of [`radiance_to_bt`].
pub fn bt_to_radiance<S, D>(bt: &ArrayBase<S, D>, channel: Channel, lut: &CalibrationLut) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let xp = lut.bt(channel);
    let fp = lut.radiance(channel);
    bt.mapv(|value| InterpHelper::linear(value, xp, fp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::OUT_OF_RANGE;
    use ndarray::{array, Array1};

    fn example_lut() -> CalibrationLut {
        CalibrationLut::uniform(&[1.0, 2.0, 3.0, 4.0], &[200.0, 210.0, 220.0, 230.0]).unwrap()
    }

    #[test]
    fn radiance_to_bt_interpolates_between_samples() {
        let bt = radiance_to_bt(&array![2.5], Channel::Ch3, &example_lut());
        assert_eq!(bt, array![215.0]);
    }

    #[test]
    fn radiance_outside_table_gives_sentinel() {
        let bt = radiance_to_bt(&array![0.5, 4.5], Channel::Ch3, &example_lut());
        assert_eq!(bt, array![OUT_OF_RANGE, OUT_OF_RANGE]);
    }

    #[test]
    fn bt_to_radiance_mirrors_forward_table() {
        let lut = example_lut();
        let radiance = bt_to_radiance(&array![[205.0, 230.0], [199.0, 231.0]], Channel::Ch4, &lut);
        assert_eq!(radiance, array![[1.5, 4.0], [OUT_OF_RANGE, OUT_OF_RANGE]]);
    }

    #[test]
    fn output_keeps_input_shape() {
        let lut = example_lut();
        let input = Array1::linspace(1.0, 4.0, 24).into_shape((2, 3, 4)).unwrap();
        let bt = radiance_to_bt(&input, Channel::Ch5, &lut);
        assert_eq!(bt.shape(), &[2, 3, 4]);
    }

    #[test]
    fn round_trip_stays_within_one_sampling_interval() {
        let radiance = [0.1, 0.4, 0.9, 1.6, 2.5, 3.6];
        let bt = [180.0, 200.0, 230.0, 250.0, 280.0, 300.0];
        let lut = CalibrationLut::uniform(&radiance, &bt).unwrap();
        let samples = Array1::linspace(0.11, 3.59, 97);

        let there = radiance_to_bt(&samples, Channel::Ch4, &lut);
        let back = bt_to_radiance(&there, Channel::Ch4, &lut);
        for (original, returned) in samples.iter().zip(back.iter()) {
            assert!((original - returned).abs() <= 1.1, "{} vs {}", original, returned);
        }
    }

    #[test]
    fn forward_conversion_is_monotone() {
        let lut = CalibrationLut::uniform(&[0.2, 0.5, 1.5, 3.0], &[190.0, 220.0, 260.0, 290.0]).unwrap();
        let samples = Array1::linspace(0.2, 2.99, 200);
        let bt = radiance_to_bt(&samples, Channel::Ch3, &lut);
        assert!(bt.iter().zip(bt.iter().skip(1)).all(|(a, b)| a <= b));
    }
}
