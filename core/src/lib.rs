//! Radiance, brightness-temperature and count conversions for the AVHRR
//! thermal channels (3.7, 11 and 12 µm).
//!
//! Lookup tables are explicit values loaded from a [`lut::LutSource`];
//! every conversion takes the table it should use. Inputs outside the
//! tabulated range map to [`prelude::OUT_OF_RANGE`] rather than an error.

pub mod lut;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use lut::{load_lut, load_lut_by_name, CalibrationLut, LutSource, LutStore, Sensor};
pub use prelude::{is_out_of_range, Channel, ConvertError, ConvertResult, OUT_OF_RANGE};
pub use processing::{
    bt_sensitivity, bt_to_radiance, radiance_from_counts, radiance_sensitivity, radiance_to_bt,
    RadiometricConverter,
};
