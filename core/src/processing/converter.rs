use crate::lut::{load_lut, CalibrationLut, LutSource, Sensor};
use crate::math::stats::StatsHelper;
use crate::prelude::{Channel, ConvertResult};
use crate::processing::brightness::{bt_to_radiance, radiance_to_bt};
use crate::processing::radiance::{
    radiance_from_counts, radiance_sensitivity, CalibrationView, HarmonisationCoefficients,
    RadianceSensitivity,
};
use crate::processing::sensitivity::bt_sensitivity;
use crate::telemetry::{ConversionMetrics, LogManager, MetricsSnapshot};
use ndarray::{Array, Array2, ArrayBase, ArrayView2, Data, Dimension};

/// Radiance and BT computed together from one scan of counts.
#[derive(Debug, Clone)]
pub struct BrightnessScan {
    pub radiance: Array2<f64>,
    pub bt: Array2<f64>,
}

/// One sensor's conversions bound to its lookup table.
pub struct RadiometricConverter {
    sensor: Sensor,
    lut: CalibrationLut,
    logger: LogManager,
    metrics: ConversionMetrics,
}

impl RadiometricConverter {
    pub fn new(sensor: Sensor, lut: CalibrationLut) -> Self {
        Self {
            sensor,
            lut,
            logger: LogManager::new(format!("converter {}", sensor)),
            metrics: ConversionMetrics::new(),
        }
    }

    pub fn from_source<S: LutSource + ?Sized>(source: &S, sensor: Sensor) -> ConvertResult<Self> {
        let lut = load_lut(source, sensor)?;
        let converter = Self::new(sensor, lut);
        converter
            .logger
            .record(&format!("loaded {} LUT samples", converter.lut.sample_count()));
        Ok(converter)
    }

    pub fn sensor(&self) -> Sensor {
        self.sensor
    }

    pub fn lut(&self) -> &CalibrationLut {
        &self.lut
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn radiance_to_bt<S, D>(&self, radiance: &ArrayBase<S, D>, channel: Channel) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let bt = radiance_to_bt(radiance, channel, &self.lut);
        self.tally(&bt, channel, "radiance -> BT");
        bt
    }

    pub fn bt_to_radiance<S, D>(&self, bt: &ArrayBase<S, D>, channel: Channel) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let radiance = bt_to_radiance(bt, channel, &self.lut);
        self.tally(&radiance, channel, "BT -> radiance");
        radiance
    }

    pub fn bt_sensitivity<S, D>(&self, radiance: &ArrayBase<S, D>, channel: Channel) -> ConvertResult<Array<f64, D>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.track(bt_sensitivity(radiance, channel, &self.lut))
    }

    pub fn radiance_from_counts(
        &self,
        view: &CalibrationView,
        tstar: ArrayView2<f64>,
        water_vapour: ArrayView2<f64>,
        channel: Channel,
        coeffs: &HarmonisationCoefficients,
        no_t: bool,
    ) -> ConvertResult<Array2<f64>> {
        self.track(radiance_from_counts(view, tstar, water_vapour, channel, coeffs, no_t))
    }

    pub fn radiance_sensitivity(
        &self,
        view: &CalibrationView,
        ict_temperature: ArrayView2<f64>,
        instrument_temperature: ArrayView2<f64>,
        water_vapour: ArrayView2<f64>,
        channel: Channel,
    ) -> ConvertResult<RadianceSensitivity> {
        self.track(radiance_sensitivity(
            view,
            ict_temperature,
            instrument_temperature,
            water_vapour,
            channel,
            self.sensor,
        ))
    }

    /// Counts to radiance, then radiance to BT through this sensor's table.
    pub fn counts_to_bt(
        &self,
        view: &CalibrationView,
        tstar: ArrayView2<f64>,
        water_vapour: ArrayView2<f64>,
        channel: Channel,
        coeffs: &HarmonisationCoefficients,
        no_t: bool,
    ) -> ConvertResult<BrightnessScan> {
        let radiance = self.radiance_from_counts(view, tstar, water_vapour, channel, coeffs, no_t)?;
        let bt = self.radiance_to_bt(&radiance, channel);
        Ok(BrightnessScan { radiance, bt })
    }

    fn tally<S, D>(&self, output: &ArrayBase<S, D>, channel: Channel, direction: &str)
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let out_of_range = StatsHelper::out_of_range_count(output);
        self.metrics.record_pixels(output.len(), out_of_range);
        self.logger
            .detail(&format!("{} {} for {} pixels", direction, channel, output.len()));
        if out_of_range > 0 {
            self.logger.flag(&format!(
                "{} {}: {} of {} pixels outside the calibrated range",
                direction,
                channel,
                out_of_range,
                output.len()
            ));
        }
    }

    fn track<T>(&self, result: ConvertResult<T>) -> ConvertResult<T> {
        result.map_err(|err| {
            self.metrics.record_failure();
            self.logger.flag(&format!("conversion failed: {}", err));
            err
        })
    }
}
