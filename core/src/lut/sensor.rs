use crate::prelude::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AVHRR instruments with a calibration lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sensor {
    #[serde(rename = "N12")]
    Noaa12,
    #[serde(rename = "N14")]
    Noaa14,
    #[serde(rename = "N15")]
    Noaa15,
    #[serde(rename = "N16")]
    Noaa16,
    #[serde(rename = "N17")]
    Noaa17,
    #[serde(rename = "N18")]
    Noaa18,
    #[serde(rename = "N19")]
    Noaa19,
    #[serde(rename = "MTA")]
    MetopA,
    #[serde(rename = "MTB")]
    MetopB,
}

impl Sensor {
    pub const ALL: [Sensor; 9] = [
        Sensor::Noaa12,
        Sensor::Noaa14,
        Sensor::Noaa15,
        Sensor::Noaa16,
        Sensor::Noaa17,
        Sensor::Noaa18,
        Sensor::Noaa19,
        Sensor::MetopA,
        Sensor::MetopB,
    ];

    /// Canonical token used by the table store.
    pub fn token(self) -> &'static str {
        match self {
            Sensor::Noaa12 => "N12",
            Sensor::Noaa14 => "N14",
            Sensor::Noaa15 => "N15",
            Sensor::Noaa16 => "N16",
            Sensor::Noaa17 => "N17",
            Sensor::Noaa18 => "N18",
            Sensor::Noaa19 => "N19",
            Sensor::MetopA => "MTA",
            Sensor::MetopB => "MTB",
        }
    }
}

impl FromStr for Sensor {
    type Err = ConvertError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Sensor::ALL
            .iter()
            .copied()
            .find(|sensor| sensor.token() == token)
            .ok_or_else(|| ConvertError::UnknownSensor(token.to_string()))
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
