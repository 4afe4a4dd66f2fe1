pub mod brightness;
pub mod converter;
pub mod radiance;
pub mod sensitivity;

pub use brightness::{bt_to_radiance, radiance_to_bt};
pub use converter::{BrightnessScan, RadiometricConverter};
pub use radiance::{
    normalized_temperature, radiance_from_counts, radiance_sensitivity, CalibrationView,
    HarmonisationCoefficients, MeasurementEquation, RadianceSensitivity, ICT_RADIANCE_OFFSET,
};
pub use sensitivity::bt_sensitivity;
