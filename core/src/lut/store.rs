use crate::lut::sensor::Sensor;
use crate::lut::table::CalibrationLut;
use crate::prelude::{ConvertError, ConvertResult};
use log::debug;
use ndarray::Array2;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Backing store of per-sensor radiance and BT tables.
pub trait LutSource {
    fn radiance_table(&self, sensor: Sensor) -> Option<&Array2<f64>>;
    fn bt_table(&self, sensor: Sensor) -> Option<&Array2<f64>>;
}

/// In-memory table store, populated once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct LutStore {
    radiance: HashMap<Sensor, Array2<f64>>,
    bt: HashMap<Sensor, Array2<f64>>,
}

/// On-disk layout: `{"radiance": {"N12": [[row], ...]}, "bt": {...}}`.
#[derive(Debug, Deserialize)]
struct StoreDocument {
    radiance: BTreeMap<String, Vec<Vec<f64>>>,
    bt: BTreeMap<String, Vec<Vec<f64>>>,
}

impl LutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sensor: Sensor, radiance: Array2<f64>, bt: Array2<f64>) {
        self.radiance.insert(sensor, radiance);
        self.bt.insert(sensor, bt);
    }

    /// Sensors present in both tables.
    pub fn sensors(&self) -> Vec<Sensor> {
        let mut sensors: Vec<Sensor> = self
            .radiance
            .keys()
            .filter(|sensor| self.bt.contains_key(*sensor))
            .copied()
            .collect();
        sensors.sort();
        sensors
    }

    pub fn from_json_reader<R: Read>(reader: R) -> ConvertResult<Self> {
        let document: StoreDocument = serde_json::from_reader(reader)?;
        Ok(Self {
            radiance: tables_from_rows(document.radiance, "radiance")?,
            bt: tables_from_rows(document.bt, "bt")?,
        })
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let file = File::open(path.as_ref())?;
        let store = Self::from_json_reader(BufReader::new(file))?;
        debug!(
            "loaded LUT store {} with {} sensors",
            path.as_ref().display(),
            store.sensors().len()
        );
        Ok(store)
    }
}

impl LutSource for LutStore {
    fn radiance_table(&self, sensor: Sensor) -> Option<&Array2<f64>> {
        self.radiance.get(&sensor)
    }

    fn bt_table(&self, sensor: Sensor) -> Option<&Array2<f64>> {
        self.bt.get(&sensor)
    }
}

fn tables_from_rows(
    raw: BTreeMap<String, Vec<Vec<f64>>>,
    name: &str,
) -> ConvertResult<HashMap<Sensor, Array2<f64>>> {
    let mut tables = HashMap::with_capacity(raw.len());
    for (token, rows) in raw {
        let sensor: Sensor = token.parse()?;
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(ConvertError::MalformedLut(format!(
                "{} table for {} has ragged row {}",
                name, sensor, bad
            )));
        }
        let height = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let table = Array2::from_shape_vec((height, width), flat).map_err(|err| {
            ConvertError::MalformedLut(format!("{} table for {}: {}", name, sensor, err))
        })?;
        tables.insert(sensor, table);
    }
    Ok(tables)
}

/// Fetches and validates the lookup table for `sensor`.
pub fn load_lut<S: LutSource + ?Sized>(source: &S, sensor: Sensor) -> ConvertResult<CalibrationLut> {
    let radiance = source
        .radiance_table(sensor)
        .ok_or_else(|| ConvertError::UnknownSensor(sensor.to_string()))?;
    let bt = source
        .bt_table(sensor)
        .ok_or_else(|| ConvertError::UnknownSensor(sensor.to_string()))?;
    CalibrationLut::new(radiance.clone(), bt.clone())
}

pub fn load_lut_by_name<S: LutSource + ?Sized>(source: &S, token: &str) -> ConvertResult<CalibrationLut> {
    load_lut(source, token.parse()?)
}
