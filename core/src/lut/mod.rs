pub mod sensor;
pub mod store;
pub mod table;

pub use sensor::Sensor;
pub use store::{load_lut, load_lut_by_name, LutSource, LutStore};
pub use table::CalibrationLut;
