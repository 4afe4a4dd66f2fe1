use crate::prelude::{Channel, ConvertError, ConvertResult};
use ndarray::Array2;

/// Smallest number of columns a table may have: columns are indexed by channel number.
pub const MIN_COLUMNS: usize = 6;

/// One thermal channel's samples, stored contiguously.
#[derive(Debug, Clone, PartialEq)]
struct ChannelSamples {
    radiance: Vec<f64>,
    bt: Vec<f64>,
}

/// Paired radiance / brightness-temperature samples for one sensor.
///
/// Built from tables whose rows are samples and whose columns are channel
/// numbers. Construction validates and keeps only the thermal columns, so
/// every accessor below is infallible.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationLut {
    channels: [ChannelSamples; 3],
}

impl CalibrationLut {
    pub fn new(radiance: Array2<f64>, bt: Array2<f64>) -> ConvertResult<Self> {
        if radiance.dim() != bt.dim() {
            return Err(ConvertError::MalformedLut(format!(
                "radiance table is {:?} but BT table is {:?}",
                radiance.dim(),
                bt.dim()
            )));
        }

        let (rows, cols) = radiance.dim();
        if rows < 2 {
            return Err(ConvertError::MalformedLut(format!(
                "need at least 2 samples, found {}",
                rows
            )));
        }
        if cols < MIN_COLUMNS {
            return Err(ConvertError::MalformedLut(format!(
                "need at least {} channel columns, found {}",
                MIN_COLUMNS, cols
            )));
        }

        let extract = |channel: Channel| -> ConvertResult<ChannelSamples> {
            let column = channel.lut_column();
            let samples = ChannelSamples {
                radiance: radiance.column(column).to_vec(),
                bt: bt.column(column).to_vec(),
            };
            check_column(&samples.radiance, "radiance", channel)?;
            check_column(&samples.bt, "BT", channel)?;
            Ok(samples)
        };

        Ok(Self {
            channels: [
                extract(Channel::Ch3)?,
                extract(Channel::Ch4)?,
                extract(Channel::Ch5)?,
            ],
        })
    }

    /// Builds a table whose thermal channels all share the same samples.
    pub fn uniform(radiance: &[f64], bt: &[f64]) -> ConvertResult<Self> {
        if radiance.len() != bt.len() {
            return Err(ConvertError::MalformedLut(format!(
                "{} radiance samples but {} BT samples",
                radiance.len(),
                bt.len()
            )));
        }
        let rows = radiance.len();
        let radiance = Array2::from_shape_fn((rows, MIN_COLUMNS), |(row, _)| radiance[row]);
        let bt = Array2::from_shape_fn((rows, MIN_COLUMNS), |(row, _)| bt[row]);
        Self::new(radiance, bt)
    }

    fn samples(&self, channel: Channel) -> &ChannelSamples {
        match channel {
            Channel::Ch3 => &self.channels[0],
            Channel::Ch4 => &self.channels[1],
            Channel::Ch5 => &self.channels[2],
        }
    }

    pub fn radiance(&self, channel: Channel) -> &[f64] {
        &self.samples(channel).radiance
    }

    pub fn bt(&self, channel: Channel) -> &[f64] {
        &self.samples(channel).bt
    }

    /// Samples per channel; always at least 2.
    pub fn sample_count(&self) -> usize {
        self.channels[0].radiance.len()
    }

    /// Tabulated radiance range `(min, max)` for `channel`.
    pub fn radiance_range(&self, channel: Channel) -> (f64, f64) {
        let column = self.radiance(channel);
        (column[0], column[column.len() - 1])
    }

    pub fn bt_range(&self, channel: Channel) -> (f64, f64) {
        let column = self.bt(channel);
        (column[0], column[column.len() - 1])
    }
}

fn check_column(column: &[f64], name: &str, channel: Channel) -> ConvertResult<()> {
    if let Some(row) = column.iter().position(|v| !v.is_finite()) {
        return Err(ConvertError::MalformedLut(format!(
            "{} column for {} has a non-finite value at row {}",
            name, channel, row
        )));
    }
    if let Some(row) = column.windows(2).position(|pair| pair[1] < pair[0]) {
        return Err(ConvertError::MalformedLut(format!(
            "{} column for {} decreases between rows {} and {}",
            name,
            channel,
            row,
            row + 1
        )));
    }
    Ok(())
}
