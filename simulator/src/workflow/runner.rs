use crate::generator::profile::SyntheticScan;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use thermalcore::lut::LutSource;
use thermalcore::math::StatsHelper;
use thermalcore::prelude::Channel;
use thermalcore::processing::{normalized_temperature, MeasurementEquation, RadiometricConverter};
use thermalcore::telemetry::MetricsSnapshot;
use thermalcore::Sensor;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub sensor: Sensor,
    pub channel: Channel,
    pub equation: u32,
    pub pixels: usize,
    pub out_of_range: usize,
    pub mean_radiance: Option<f64>,
    pub mean_bt: Option<f64>,
    /// Mean dBT/dL over the scan.
    pub mean_bt_sensitivity: Option<f64>,
    /// Mean dL/da per harmonisation coefficient.
    pub mean_radiance_sensitivity: BTreeMap<String, Option<f64>>,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute<S: LutSource + ?Sized>(
        &self,
        source: &S,
        scan: &SyntheticScan,
    ) -> anyhow::Result<WorkflowResult> {
        let config = &self.config;
        let converter = RadiometricConverter::from_source(source, config.sensor)
            .with_context(|| format!("loading LUT for {}", config.sensor))?;

        let tstar = normalized_temperature(
            scan.instrument_temperature.view(),
            config.t_inst_mean,
            config.t_inst_std,
        )
        .context("normalising instrument temperature")?;

        let view = scan.view();
        let brightness = converter
            .counts_to_bt(
                &view,
                tstar.view(),
                scan.water_vapour.view(),
                config.channel,
                &config.coefficients,
                config.no_t,
            )
            .context("converting counts to brightness temperature")?;

        let slopes = converter
            .bt_sensitivity(&brightness.radiance, config.channel)
            .context("computing dBT/dL")?;

        let sensitivity = converter
            .radiance_sensitivity(
                &view,
                scan.ict_temperature.view(),
                scan.instrument_temperature.view(),
                scan.water_vapour.view(),
                config.channel,
            )
            .context("computing dL/da")?;

        let mean_radiance_sensitivity = sensitivity
            .terms()
            .into_iter()
            .map(|(name, values)| (name.to_string(), StatsHelper::valid_mean(values)))
            .collect();

        Ok(WorkflowResult {
            sensor: config.sensor,
            channel: config.channel,
            equation: MeasurementEquation::select(config.channel, config.no_t).number(),
            pixels: brightness.bt.len(),
            out_of_range: StatsHelper::out_of_range_count(&brightness.bt),
            mean_radiance: StatsHelper::valid_mean(&brightness.radiance),
            mean_bt: StatsHelper::valid_mean(&brightness.bt),
            mean_bt_sensitivity: StatsHelper::valid_mean(&slopes),
            mean_radiance_sensitivity,
            metrics: converter.metrics(),
        })
    }
}
