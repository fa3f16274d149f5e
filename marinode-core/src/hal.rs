//! Peripheral boundary traits
//!
//! The core never touches hardware. Each peripheral the drivers need
//! is a small trait the host board implements (real HAL on target,
//! mocks in tests). Errors cross this boundary as [`HalError`]; the
//! drivers tag them with the owning sensor id.

use heapless::Vec;

use crate::config::MAX_BUS_DEVICES;
use crate::errors::{ConfigError, HalError};

/// One raw ADC conversion together with the converter's scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    /// Raw converter output
    pub value: u16,
    /// Full-scale value of the converter (65535 for 16-bit reads)
    pub resolution: u16,
}

/// A single bound analog input channel
pub trait AnalogChannel {
    /// Perform one conversion
    fn sample(&mut self) -> Result<RawSample, HalError>;

    /// ADC reference voltage for this channel
    fn reference_voltage(&self) -> f32;
}

/// The board's bank of analog input channels
///
/// Claiming moves ownership of a channel into the driver, so two tanks
/// cannot share a sender input by accident.
pub trait AdcBank {
    /// Channel type handed out by this bank
    type Channel: AnalogChannel;

    /// Number of analog channels the board provides
    fn channel_count(&self) -> u8;

    /// Claim a channel by index
    fn claim(&mut self, index: u8) -> Result<Self::Channel, ConfigError>;
}

/// Input bias applied when claiming a digital input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    /// Internal pull-up (contacts switching to ground)
    Up,
    /// No bias
    None,
}

/// A single bound digital input pin
pub trait InputPin {
    /// Read the raw electrical level
    fn level(&mut self) -> Result<bool, HalError>;
}

/// The board's bank of GPIO pins usable as inputs
pub trait PinBank {
    /// Pin type handed out by this bank
    type Pin: InputPin;

    /// Claim a pin as an input with the given bias
    fn claim_input(&mut self, pin: u8, pull: Pull) -> Result<Self::Pin, ConfigError>;
}

/// 64-bit ROM address of a 1-Wire device
pub type DeviceAddress = [u8; 8];

/// Multi-drop 1-Wire bus primitives
pub trait OneWireBus {
    /// Enumerate device addresses currently on the bus
    fn scan(&mut self) -> Result<Vec<DeviceAddress, MAX_BUS_DEVICES>, HalError>;

    /// Broadcast a start-conversion command to every device
    fn start_conversion(&mut self) -> Result<(), HalError>;

    /// Read the converted temperature from one device, in Celsius
    fn read_temperature(&mut self, address: &DeviceAddress) -> Result<f32, HalError>;
}

/// Blocking millisecond delay
///
/// The scheduler suspends only here: the end-of-cycle quantum, the
/// reconnect hold, and the conversion settle delay.
pub trait Delay {
    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Delay backed by [`std::thread::sleep`]
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}

/// Wireless network association primitives
///
/// Association policy (credentials, scan order) belongs to the host;
/// the connectivity manager only needs these operations.
pub trait NetworkLink {
    /// Power up the interface; idempotent
    fn activate(&mut self);

    /// Associate with the configured access point, blocking until the
    /// attempt resolves
    fn connect(&mut self) -> Result<(), HalError>;

    /// Whether the link currently has an association
    fn is_connected(&self) -> bool;

    /// Assigned IPv4 address, once associated
    fn address(&self) -> Option<[u8; 4]>;
}
