//! Sensor drivers
//!
//! One driver per sensor class, each generic over the peripheral
//! boundary traits in [`crate::hal`]. The layer contract is "fail one,
//! continue all": every driver isolates failure to the unit of one
//! sensor, so a faulty channel never blocks or crashes the polling of
//! its siblings.
//!
//! - [`tank::TankSensor`] - one analog channel per instance, bound at
//!   construction
//! - [`temperature::TemperatureSensors`] - all probes on one multi-drop
//!   1-Wire bus
//! - [`digital::DigitalInputs`] - all configured GPIO inputs

pub mod digital;
pub mod tank;
pub mod temperature;

pub use digital::DigitalInputs;
pub use tank::TankSensor;
pub use temperature::TemperatureSensors;
