use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thermalcore::lut::Sensor;
use thermalcore::prelude::Channel;
use thermalcore::processing::HarmonisationCoefficients;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub sensor: Sensor,
    pub channel: Channel,
    /// Drop the instrument-temperature term from the measurement equation.
    pub no_t: bool,
    pub coefficients: HarmonisationCoefficients,
    /// Mean and spread used to normalise the instrument temperature.
    pub t_inst_mean: f64,
    pub t_inst_std: f64,
    /// JSON LUT store; a Planck-derived table is used when absent.
    pub lut_path: Option<PathBuf>,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            sensor: Sensor::Noaa18,
            channel: Channel::Ch4,
            no_t: false,
            coefficients: HarmonisationCoefficients {
                a1: 0.014860,
                ..Default::default()
            },
            t_inst_mean: 286.0,
            t_inst_std: 1.5,
            lut_path: None,
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(sensor: Sensor, channel: Channel, rows: usize, cols: usize, seed: u64) -> Self {
        let defaults = Self::default();
        Self {
            sensor,
            channel,
            generator: GeneratorConfig {
                rows,
                cols,
                seed,
                ..defaults.generator.clone()
            },
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_sets_scan_shape() {
        let cfg = WorkflowConfig::from_args(Sensor::MetopA, Channel::Ch3, 8, 32, 7);
        assert_eq!(cfg.generator.rows, 8);
        assert_eq!(cfg.generator.cols, 32);
        assert_eq!(cfg.channel, Channel::Ch3);
        assert!((cfg.coefficients.a1 - 0.014860).abs() < 1e-12);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"sensor: N15\nchannel: 5\nno_t: true\ncoefficients:\n  a0: 0.1\n  a2: 2.0e-6\ngenerator:\n  rows: 4\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.sensor, Sensor::Noaa15);
        assert_eq!(cfg.channel, Channel::Ch5);
        assert!(cfg.no_t);
        assert_eq!(cfg.coefficients.a0, 0.1);
        assert_eq!(cfg.coefficients.a1, 0.0);
        assert_eq!(cfg.generator.rows, 4);
        assert_eq!(cfg.generator.cols, GeneratorConfig::default().cols);
    }

    #[test]
    fn config_load_rejects_non_thermal_channel() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"channel: 2\n").unwrap();
        let path = temp.into_temp_path();
        let err = WorkflowConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("channel=2"));
    }
}
