use serde::{Deserialize, Serialize};
use std::fmt;

/// Value written wherever an input falls outside the tabulated calibration range.
///
/// This is a valid numeric result, not an error, but it must never be averaged
/// or compared as if it were a temperature or radiance.
pub const OUT_OF_RANGE: f64 = -999.9;

/// Returns true when `value` is the out-of-range sentinel.
pub fn is_out_of_range(value: f64) -> bool {
    value == OUT_OF_RANGE
}

/// Common error type for every conversion.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("unknown AVHRR sensor: {0}")]
    UnknownSensor(String),
    #[error("no thermal channel selected: channel={0} (expected 3, 4 or 5)")]
    InvalidChannel(i64),
    #[error("malformed lookup table: {0}")]
    MalformedLut(String),
    #[error("derivative bracket at index {index} is unusable for a table of {len} samples")]
    IndexBounds { index: usize, len: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Thermal AVHRR channel.
///
/// The discriminant doubles as the column index into the lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Channel {
    /// 3.7 µm, short-wave thermal.
    Ch3 = 3,
    /// 11 µm.
    Ch4 = 4,
    /// 12 µm.
    Ch5 = 5,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Ch3, Channel::Ch4, Channel::Ch5];

    pub fn number(self) -> i64 {
        self as i64
    }

    /// Column of the radiance and BT tables holding this channel.
    pub fn lut_column(self) -> usize {
        self as usize
    }

    pub fn is_short_wave(self) -> bool {
        matches!(self, Channel::Ch3)
    }
}

impl TryFrom<i64> for Channel {
    type Error = ConvertError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Channel::Ch3),
            4 => Ok(Channel::Ch4),
            5 => Ok(Channel::Ch5),
            other => Err(ConvertError::InvalidChannel(other)),
        }
    }
}

impl From<Channel> for i64 {
    fn from(channel: Channel) -> Self {
        channel.number()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.number())
    }
}
