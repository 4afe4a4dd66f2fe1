use anyhow::Context;
use ndarray::Array2;
use thermalcore::lut::{LutStore, Sensor};
use thermalcore::prelude::Channel;

/// First radiation constant, mW m-2 sr-1 (cm-1)-4.
const C1: f64 = 1.191_042_7e-5;
/// Second radiation constant, K cm.
const C2: f64 = 1.438_775_2;

const BT_MIN: f64 = 180.0;
const BT_MAX: f64 = 340.0;
const BT_STEP: f64 = 0.1;

/// Nominal central wavenumber (cm-1) of each thermal channel.
pub fn central_wavenumber(channel: Channel) -> f64 {
    match channel {
        Channel::Ch3 => 2669.3,
        Channel::Ch4 => 928.0,
        Channel::Ch5 => 833.2,
    }
}

/// Planck radiance in mW m-2 sr-1 cm at wavenumber `nu` (cm-1).
pub fn planck_radiance(nu: f64, temperature: f64) -> f64 {
    C1 * nu.powi(3) / ((C2 * nu / temperature).exp_m1())
}

/// Builds a Planck-derived table for every thermal channel of `sensor`.
pub fn planck_store(sensor: Sensor) -> anyhow::Result<LutStore> {
    let rows = ((BT_MAX - BT_MIN) / BT_STEP).round() as usize + 1;
    let columns = Channel::ALL
        .iter()
        .map(|channel| channel.lut_column())
        .max()
        .context("no thermal channels defined")?
        + 1;

    let mut radiance = Array2::zeros((rows, columns));
    let mut bt = Array2::zeros((rows, columns));
    for row in 0..rows {
        let temperature = BT_MIN + row as f64 * BT_STEP;
        for channel in Channel::ALL {
            let column = channel.lut_column();
            bt[[row, column]] = temperature;
            radiance[[row, column]] = planck_radiance(central_wavenumber(channel), temperature);
        }
    }

    let mut store = LutStore::new();
    store.insert(sensor, radiance, bt);
    Ok(store)
}
