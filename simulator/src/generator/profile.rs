use crate::generator::template::{central_wavenumber, planck_radiance};
use anyhow::{ensure, Context};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thermalcore::prelude::Channel;
use thermalcore::processing::CalibrationView;

/// Configuration for generating a synthetic scan of counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub cols: usize,
    pub seed: u64,
    /// Standard count jitter.
    pub noise: f64,
    pub space_counts: f64,
    pub ict_counts: f64,
    pub ict_temperature: f64,
    pub instrument_temperature: f64,
    /// Scene temperature range swept across each scan line.
    pub scene_min: f64,
    pub scene_max: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 16,
            cols: 409,
            seed: 0,
            noise: 0.5,
            space_counts: 990.0,
            ict_counts: 400.0,
            ict_temperature: 290.0,
            instrument_temperature: 286.0,
            scene_min: 210.0,
            scene_max: 305.0,
        }
    }
}

/// Per-pixel inputs for the radiance model and its sensitivities.
#[derive(Debug, Clone)]
pub struct SyntheticScan {
    pub earth_counts: Array2<f64>,
    pub space_counts: Array2<f64>,
    pub ict_counts: Array2<f64>,
    pub ict_radiance: Array2<f64>,
    pub ict_temperature: Array2<f64>,
    pub instrument_temperature: Array2<f64>,
    pub water_vapour: Array2<f64>,
}

impl SyntheticScan {
    pub fn view(&self) -> CalibrationView<'_> {
        CalibrationView::new(
            self.earth_counts.view(),
            self.space_counts.view(),
            self.ict_counts.view(),
            self.ict_radiance.view(),
        )
    }
}

fn jitter(rng: &mut StdRng, amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        rng.gen_range(-amplitude..amplitude)
    } else {
        0.0
    }
}

/// Generates counts whose linear calibration reproduces a swept scene temperature.
pub fn build_scan(config: &GeneratorConfig, channel: Channel) -> anyhow::Result<SyntheticScan> {
    ensure!(config.rows > 0 && config.cols > 0, "scan must have at least one pixel");
    ensure!(
        config.space_counts != config.ict_counts,
        "space and ICT counts must differ"
    );
    let pixels = config
        .rows
        .checked_mul(config.cols)
        .context("overflow computing pixel count for generator")?;

    let nu = central_wavenumber(channel);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let shape = (config.rows, config.cols);
    let span = config.scene_max - config.scene_min;

    let mut earth_counts = Vec::with_capacity(pixels);
    let mut space_counts = Vec::with_capacity(pixels);
    let mut ict_counts = Vec::with_capacity(pixels);
    let mut ict_radiance = Vec::with_capacity(pixels);
    let mut ict_temperature = Vec::with_capacity(pixels);
    let mut instrument_temperature = Vec::with_capacity(pixels);
    let mut water_vapour = Vec::with_capacity(pixels);

    for _row in 0..config.rows {
        let t_ict = config.ict_temperature + jitter(&mut rng, 0.05);
        let l_ict = planck_radiance(nu, t_ict);
        let t_inst = config.instrument_temperature + jitter(&mut rng, 0.2);
        for col in 0..config.cols {
            let fraction = if config.cols > 1 {
                col as f64 / (config.cols - 1) as f64
            } else {
                0.5
            };
            let scene = planck_radiance(nu, config.scene_min + fraction * span);

            let cs = config.space_counts + jitter(&mut rng, config.noise);
            let cict = config.ict_counts + jitter(&mut rng, config.noise);
            let ce = cs + (cict - cs) * scene / l_ict + jitter(&mut rng, config.noise);

            earth_counts.push(ce);
            space_counts.push(cs);
            ict_counts.push(cict);
            ict_radiance.push(l_ict);
            ict_temperature.push(t_ict);
            instrument_temperature.push(t_inst);
            water_vapour.push(rng.gen_range(0.0..5.0));
        }
    }

    let to_array = |values: Vec<f64>| {
        Array2::from_shape_vec(shape, values).context("shaping synthetic scan")
    };
    Ok(SyntheticScan {
        earth_counts: to_array(earth_counts)?,
        space_counts: to_array(space_counts)?,
        ict_counts: to_array(ict_counts)?,
        ict_radiance: to_array(ict_radiance)?,
        ict_temperature: to_array(ict_temperature)?,
        instrument_temperature: to_array(instrument_temperature)?,
        water_vapour: to_array(water_vapour)?,
    })
}
