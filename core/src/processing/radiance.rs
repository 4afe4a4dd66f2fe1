use crate::lut::Sensor;
use crate::prelude::{Channel, ConvertError, ConvertResult};
use log::debug;
use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

/// Fixed calibration offset applied to the ICT radiance term.
pub const ICT_RADIANCE_OFFSET: f64 = 0.985140;

/// Harmonisation coefficients `a0..a4` of the measurement equation.
///
/// Which coefficients are used depends on the channel and the
/// instrument-temperature flag, see [`MeasurementEquation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonisationCoefficients {
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub a4: f64,
}

/// The four algebraic variants of the radiance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementEquation {
    /// Long-wave, no instrument-temperature term.
    Eq101,
    /// Long-wave with `a3 * Tstar`.
    Eq102,
    /// Short-wave, no instrument-temperature term.
    Eq105,
    /// Short-wave with `a2 * Tstar`.
    Eq106,
}

impl MeasurementEquation {
    pub fn select(channel: Channel, no_t: bool) -> Self {
        match (channel.is_short_wave(), no_t) {
            (true, true) => MeasurementEquation::Eq105,
            (true, false) => MeasurementEquation::Eq106,
            (false, true) => MeasurementEquation::Eq101,
            (false, false) => MeasurementEquation::Eq102,
        }
    }

    pub fn number(self) -> u32 {
        match self {
            MeasurementEquation::Eq101 => 101,
            MeasurementEquation::Eq102 => 102,
            MeasurementEquation::Eq105 => 105,
            MeasurementEquation::Eq106 => 106,
        }
    }
}

/// Per-pixel counts and ICT radiance shared by the model and its derivatives.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationView<'a> {
    /// Earth-view counts, `Ce`.
    pub earth_counts: ArrayView2<'a, f64>,
    /// Space-view counts, `Cs`.
    pub space_counts: ArrayView2<'a, f64>,
    /// ICT-view counts, `Cict`.
    pub ict_counts: ArrayView2<'a, f64>,
    /// ICT radiance, `Lict`.
    pub ict_radiance: ArrayView2<'a, f64>,
}

impl<'a> CalibrationView<'a> {
    pub fn new(
        earth_counts: ArrayView2<'a, f64>,
        space_counts: ArrayView2<'a, f64>,
        ict_counts: ArrayView2<'a, f64>,
        ict_radiance: ArrayView2<'a, f64>,
    ) -> Self {
        Self {
            earth_counts,
            space_counts,
            ict_counts,
            ict_radiance,
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.earth_counts.dim()
    }

    fn check_shapes(&self, extra: &[(&str, (usize, usize))]) -> ConvertResult<()> {
        let expected = self.dim();
        let mut shapes = vec![
            ("Cs", self.space_counts.dim()),
            ("Cict", self.ict_counts.dim()),
            ("Lict", self.ict_radiance.dim()),
        ];
        shapes.extend_from_slice(extra);

        for (name, dim) in shapes {
            if dim != expected {
                return Err(ConvertError::InvalidInput(format!(
                    "{} has shape {:?}, expected {:?} to match Ce",
                    name, dim, expected
                )));
            }
        }
        Ok(())
    }

    /// `Lict / (Cict - Cs)`, the ICT gain term.
    fn gain(&self) -> Array2<f64> {
        Zip::from(&self.ict_radiance)
            .and(&self.ict_counts)
            .and(&self.space_counts)
            .map_collect(|&lict, &cict, &cs| lict / (cict - cs))
    }
}

/// Partial derivatives of radiance with respect to the harmonisation coefficients.
///
/// The short-wave set has one fewer term: its `d_a3` is the instrument
/// temperature and its `d_a4` the water-vapour placeholder, whereas the
/// long-wave set has the non-linear term in `d_a3`.
#[derive(Debug, Clone, PartialEq)]
pub enum RadianceSensitivity {
    ShortWave {
        d_a2: Array2<f64>,
        d_a3: Array2<f64>,
        d_a4: Array2<f64>,
    },
    LongWave {
        d_a2: Array2<f64>,
        d_a3: Array2<f64>,
        d_a4: Array2<f64>,
        d_a5: Array2<f64>,
    },
}

impl RadianceSensitivity {
    /// Number of coefficient derivatives: 3 short-wave, 4 long-wave.
    pub fn term_count(&self) -> usize {
        match self {
            RadianceSensitivity::ShortWave { .. } => 3,
            RadianceSensitivity::LongWave { .. } => 4,
        }
    }

    /// Derivatives in coefficient order, each paired with its coefficient name.
    pub fn terms(&self) -> Vec<(&'static str, &Array2<f64>)> {
        match self {
            RadianceSensitivity::ShortWave { d_a2, d_a3, d_a4 } => {
                vec![("a2", d_a2), ("a3", d_a3), ("a4", d_a4)]
            }
            RadianceSensitivity::LongWave {
                d_a2,
                d_a3,
                d_a4,
                d_a5,
            } => vec![("a2", d_a2), ("a3", d_a3), ("a4", d_a4), ("a5", d_a5)],
        }
    }
}

/// Radiance from counts using the measurement equation picked by `channel` and `no_t`.
///
/// `tstar` is the normalised instrument temperature (see
/// [`normalized_temperature`]). `water_vapour` is accepted for interface
/// stability and does not enter the model yet.
pub fn radiance_from_counts(
    view: &CalibrationView,
    tstar: ArrayView2<f64>,
    water_vapour: ArrayView2<f64>,
    channel: Channel,
    coeffs: &HarmonisationCoefficients,
    no_t: bool,
) -> ConvertResult<Array2<f64>> {
    view.check_shapes(&[("Tstar", tstar.dim()), ("WV", water_vapour.dim())])?;

    let equation = MeasurementEquation::select(channel, no_t);
    debug!("radiance model for {} uses equation {}", channel, equation.number());

    let a0 = coeffs.a0;
    let scale = ICT_RADIANCE_OFFSET + coeffs.a1;
    let counts = Zip::from(&view.earth_counts)
        .and(&view.space_counts)
        .and(&view.ict_counts)
        .and(&view.ict_radiance);

    let radiance = match equation {
        MeasurementEquation::Eq105 => counts.map_collect(|&ce, &cs, &cict, &lict| {
            a0 + ((lict * scale) / (cict - cs)) * (ce - cs)
        }),
        MeasurementEquation::Eq106 => counts.and(&tstar).map_collect(|&ce, &cs, &cict, &lict, &t| {
            a0 + ((lict * scale) / (cict - cs)) * (ce - cs) + coeffs.a2 * t
        }),
        MeasurementEquation::Eq101 => counts.map_collect(|&ce, &cs, &cict, &lict| {
            a0 + ((lict * scale) / (cict - cs) + coeffs.a2 * (ce - cict)) * (ce - cs)
        }),
        MeasurementEquation::Eq102 => counts.and(&tstar).map_collect(|&ce, &cs, &cict, &lict, &t| {
            a0 + ((lict * scale) / (cict - cs) + coeffs.a2 * (ce - cict)) * (ce - cs) + coeffs.a3 * t
        }),
    };
    Ok(radiance)
}

/// Derivatives of the radiance model with respect to the harmonisation coefficients.
///
/// `water_vapour` is returned as its own derivative until a water-vapour term
/// exists in the model. `ict_temperature` and `sensor` do not enter the
/// current expressions.
pub fn radiance_sensitivity(
    view: &CalibrationView,
    ict_temperature: ArrayView2<f64>,
    instrument_temperature: ArrayView2<f64>,
    water_vapour: ArrayView2<f64>,
    channel: Channel,
    sensor: Sensor,
) -> ConvertResult<RadianceSensitivity> {
    view.check_shapes(&[
        ("Tict", ict_temperature.dim()),
        ("Tinst", instrument_temperature.dim()),
        ("WV", water_vapour.dim()),
    ])?;
    debug!("radiance sensitivities for {} {}", sensor, channel);

    let d_a2 = view.gain();
    if channel.is_short_wave() {
        return Ok(RadianceSensitivity::ShortWave {
            d_a2,
            d_a3: instrument_temperature.to_owned(),
            d_a4: water_vapour.to_owned(),
        });
    }

    let d_a3 = Zip::from(&view.earth_counts)
        .and(&view.ict_counts)
        .and(&view.space_counts)
        .map_collect(|&ce, &cict, &cs| (ce - cict) * (ce - cs));
    Ok(RadianceSensitivity::LongWave {
        d_a2,
        d_a3,
        d_a4: instrument_temperature.to_owned(),
        d_a5: water_vapour.to_owned(),
    })
}

/// `(T_inst - t_mean) / t_std`, the normalised instrument temperature.
pub fn normalized_temperature(
    instrument_temperature: ArrayView2<f64>,
    t_mean: f64,
    t_std: f64,
) -> ConvertResult<Array2<f64>> {
    if !t_std.is_finite() || t_std == 0.0 || !t_mean.is_finite() {
        return Err(ConvertError::InvalidInput(format!(
            "instrument temperature normalisation needs finite mean and non-zero std, got mean={} std={}",
            t_mean, t_std
        )));
    }
    Ok(instrument_temperature.mapv(|t| (t - t_mean) / t_std))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    struct Scan {
        ce: Array2<f64>,
        cs: Array2<f64>,
        cict: Array2<f64>,
        lict: Array2<f64>,
    }

    impl Scan {
        fn view(&self) -> CalibrationView<'_> {
            CalibrationView::new(self.ce.view(), self.cs.view(), self.cict.view(), self.lict.view())
        }
    }

    fn unit_gain_scan() -> Scan {
        Scan {
            ce: array![[0.0]],
            cs: array![[0.0]],
            cict: array![[1.0]],
            lict: array![[0.0]],
        }
    }

    fn scan() -> Scan {
        Scan {
            ce: array![[500.0, 600.0]],
            cs: array![[990.0, 1000.0]],
            cict: array![[390.0, 400.0]],
            lict: array![[60.0, 120.0]],
        }
    }

    #[test]
    fn long_wave_temperature_term_only() {
        let scan = unit_gain_scan();
        let coeffs = HarmonisationCoefficients {
            a3: 1.0,
            ..Default::default()
        };
        let tstar = array![[5.0]];
        let wv = array![[0.0]];
        let radiance =
            radiance_from_counts(&scan.view(), tstar.view(), wv.view(), Channel::Ch4, &coeffs, false).unwrap();
        assert_eq!(radiance, array![[5.0]]);
    }

    #[test]
    fn no_t_branch_is_not_overwritten() {
        let scan = unit_gain_scan();
        let coeffs = HarmonisationCoefficients {
            a2: 3.0,
            a3: 1.0,
            ..Default::default()
        };
        let tstar = array![[5.0]];
        let wv = array![[0.0]];
        for channel in [Channel::Ch3, Channel::Ch4] {
            let radiance =
                radiance_from_counts(&scan.view(), tstar.view(), wv.view(), channel, &coeffs, true).unwrap();
            assert_eq!(radiance, array![[0.0]], "{}", channel);
        }
        let short =
            radiance_from_counts(&scan.view(), tstar.view(), wv.view(), Channel::Ch3, &coeffs, false).unwrap();
        assert_eq!(short, array![[15.0]]);
    }

    #[test]
    fn short_wave_linear_calibration() {
        let scan = scan();
        let coeffs = HarmonisationCoefficients {
            a0: 0.5,
            a1: 0.014860,
            ..Default::default()
        };
        let zeros = Array2::zeros((1, 2));
        let radiance =
            radiance_from_counts(&scan.view(), zeros.view(), zeros.view(), Channel::Ch3, &coeffs, true).unwrap();
        // (0.985140 + 0.014860) == 1, gain = Lict / (Cict - Cs) = -0.1 and -0.2
        let expected = array![[0.5 + -0.1 * -490.0, 0.5 + -0.2 * -400.0]];
        for (got, want) in radiance.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "{} vs {}", got, want);
        }
    }

    #[test]
    fn long_wave_non_linear_term() {
        let scan = scan();
        let coeffs = HarmonisationCoefficients {
            a1: 0.014860,
            a2: 1e-6,
            a3: 2.0,
            ..Default::default()
        };
        let tstar = array![[0.5, -0.5]];
        let wv = Array2::zeros((1, 2));
        let radiance =
            radiance_from_counts(&scan.view(), tstar.view(), wv.view(), Channel::Ch5, &coeffs, false).unwrap();
        let first = (-0.1 + 1e-6 * 110.0) * -490.0 + 1.0;
        let second = (-0.2 + 1e-6 * 200.0) * -400.0 - 1.0;
        assert!((radiance[[0, 0]] - first).abs() < 1e-9);
        assert!((radiance[[0, 1]] - second).abs() < 1e-9);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let scan = scan();
        let tstar = Array2::zeros((2, 2));
        let wv = Array2::zeros((1, 2));
        let err = radiance_from_counts(
            &scan.view(),
            tstar.view(),
            wv.view(),
            Channel::Ch4,
            &HarmonisationCoefficients::default(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidInput(ref m) if m.contains("Tstar")));
    }

    #[test]
    fn equation_selection_covers_all_branches() {
        assert_eq!(MeasurementEquation::select(Channel::Ch3, true).number(), 105);
        assert_eq!(MeasurementEquation::select(Channel::Ch3, false).number(), 106);
        assert_eq!(MeasurementEquation::select(Channel::Ch4, true).number(), 101);
        assert_eq!(MeasurementEquation::select(Channel::Ch5, false).number(), 102);
    }

    #[test]
    fn short_wave_sensitivity_has_three_terms() {
        let scan = scan();
        let tict = array![[290.0, 291.0]];
        let tinst = array![[285.0, 286.0]];
        let wv = array![[1.5, 2.5]];
        let sens = radiance_sensitivity(
            &scan.view(),
            tict.view(),
            tinst.view(),
            wv.view(),
            Channel::Ch3,
            Sensor::Noaa17,
        )
        .unwrap();
        assert_eq!(sens.term_count(), 3);
        match sens {
            RadianceSensitivity::ShortWave { d_a2, d_a3, d_a4 } => {
                assert!((d_a2[[0, 0]] + 0.1).abs() < 1e-12);
                assert_eq!(d_a3, tinst);
                assert_eq!(d_a4, wv);
            }
            other => panic!("expected short-wave set, got {:?}", other),
        }
    }

    #[test]
    fn long_wave_sensitivity_has_four_terms() {
        let scan = scan();
        let tict = array![[290.0, 291.0]];
        let tinst = array![[285.0, 286.0]];
        let wv = array![[1.5, 2.5]];
        let sens = radiance_sensitivity(
            &scan.view(),
            tict.view(),
            tinst.view(),
            wv.view(),
            Channel::Ch4,
            Sensor::MetopA,
        )
        .unwrap();
        let names: Vec<&str> = sens.terms().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["a2", "a3", "a4", "a5"]);
        match sens {
            RadianceSensitivity::LongWave { d_a3, d_a4, d_a5, .. } => {
                assert_eq!(d_a3, array![[110.0 * -490.0, 200.0 * -400.0]]);
                assert_eq!(d_a4, tinst);
                assert_eq!(d_a5, wv);
            }
            other => panic!("expected long-wave set, got {:?}", other),
        }
    }

    fn model_with_scratch_tstar(view: &CalibrationView, wv: &Array2<f64>) -> ConvertResult<Array2<f64>> {
        let tstar = Array2::from_elem(wv.dim(), 0.5);
        radiance_from_counts(
            view,
            tstar.view(),
            wv.view(),
            Channel::Ch4,
            &HarmonisationCoefficients {
                a3: 2.0,
                ..Default::default()
            },
            false,
        )
    }

    #[test]
    fn per_pixel_views_may_borrow_from_unrelated_owners() {
        let scan = unit_gain_scan();
        let view = scan.view();
        let wv = array![[0.0]];
        assert_eq!(model_with_scratch_tstar(&view, &wv).unwrap(), array![[1.0]]);

        let tinst = array![[285.0]];
        let sens = {
            let tict = array![[290.0]];
            radiance_sensitivity(
                &view,
                tict.view(),
                tinst.view(),
                Array2::from_elem((1, 1), 3.0).view(),
                Channel::Ch3,
                Sensor::Noaa19,
            )
            .unwrap()
        };
        assert_eq!(
            sens,
            RadianceSensitivity::ShortWave {
                d_a2: array![[0.0]],
                d_a3: tinst,
                d_a4: array![[3.0]],
            }
        );
    }

    #[test]
    fn channel_two_never_reaches_the_model() {
        let err = Channel::try_from(2).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidChannel(2)));
    }

    #[test]
    fn normalized_temperature_rejects_zero_std() {
        let t = array![[290.0, 300.0]];
        assert_eq!(normalized_temperature(t.view(), 295.0, 5.0).unwrap(), array![[-1.0, 1.0]]);
        assert!(normalized_temperature(t.view(), 295.0, 0.0).is_err());
    }
}
