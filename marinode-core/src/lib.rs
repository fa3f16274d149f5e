//! Sensor core for marinode
//!
//! Samples heterogeneous boat sensors (analog tank senders, 1-Wire
//! temperature probes, digital inputs) at independent rates and hands
//! normalized readings to an uplink for publishing.
//!
//! Key constraints:
//! - Runs on small MCUs (RP2040-class boards)
//! - No heap allocation in the polling path
//! - One faulty sensor never blocks its siblings
//!
//! ```no_run
//! use marinode_core::calibration::{voltage_from_raw, level_from_voltage};
//!
//! let voltage = voltage_from_raw(32768, 65535, 3.3);
//! let level = level_from_voltage(voltage, 0.5, 3.0);
//! assert!(level >= 0.0 && level <= 100.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod calibration;
pub mod config;
pub mod drivers;
pub mod errors;
pub mod hal;
pub mod ident;
pub mod link;
mod logging;
pub mod readings;
pub mod scheduler;
pub mod time;

// Public API
pub use config::{DigitalInputConfig, PollIntervals, TankConfig, TankType, TemperatureConfig};
pub use errors::{ConfigError, HalError, LinkError, ReadError};
pub use ident::{InlineString, SensorId};
pub use link::{ConnectionState, Uplink};
pub use readings::{DigitalReading, TankReading, TemperatureReading};
pub use scheduler::{CycleStats, NodeContext, Scheduler};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
