//! Error types for sensor and uplink failures
//!
//! All error types here are small `Copy` enums so they can be returned
//! from hot polling paths and logged without allocation. Failure scope
//! is encoded in the type:
//!
//! - [`ConfigError`]: invalid static configuration. Fatal for the one
//!   sensor being constructed, never for the node.
//! - [`ReadError`]: transient peripheral fault during a poll. Caught by
//!   the scheduler, logged, and the reading is skipped for that cycle.
//! - [`LinkError`]: association or session failure. Never fatal; it
//!   drives the connection state machine and the blocking retry policy.

use thiserror_no_std::Error;

use crate::ident::SensorId;

/// Invalid static configuration, detected at construction time
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Analog channel index outside the board's channel count
    #[error("analog channel {channel} out of range (board has {available})")]
    InvalidAnalogChannel {
        /// Requested channel index
        channel: u8,
        /// Channels the board actually provides
        available: u8,
    },

    /// GPIO pin could not be claimed as an input
    #[error("gpio pin {pin} unavailable")]
    PinUnavailable {
        /// Requested pin number
        pin: u8,
    },

    /// Identifier or display name longer than the inline limit
    #[error("identifier too long")]
    IdentifierTooLong,

    /// More sensors configured than the fixed-capacity tables hold
    #[error("too many sensors configured (limit {limit})")]
    TooManySensors {
        /// Capacity of the affected table
        limit: usize,
    },
}

/// Low-level peripheral fault reported by a boundary trait
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// ADC conversion failed
    #[error("adc fault")]
    Adc,
    /// GPIO read failed
    #[error("gpio fault")]
    Gpio,
    /// 1-Wire bus fault (no presence pulse, short, ...)
    #[error("bus fault")]
    Bus,
    /// Device answered but the scratchpad CRC did not match
    #[error("crc mismatch")]
    Crc,
    /// Addressed device is no longer on the bus
    #[error("device missing")]
    DeviceMissing,
}

/// Transient read failure, tagged with the sensor it came from
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("sensor `{id}` read failed: {cause}")]
pub struct ReadError {
    /// Sensor the failure belongs to
    pub id: SensorId,
    /// Underlying peripheral fault
    pub cause: HalError,
}

/// Connectivity failure - drives the connection state machine
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Publish attempted while the session is down; nothing was sent
    #[error("not connected")]
    NotConnected,
    /// Wireless association failed or timed out
    #[error("network association failed")]
    AssociationFailed,
    /// Broker session could not be established
    #[error("session establishment failed")]
    SessionFailed,
    /// One publish attempt failed; the session is demoted
    #[error("publish failed")]
    PublishFailed,
    /// Payload could not be serialized
    #[error("payload encoding failed")]
    EncodeFailed,
}

#[cfg(feature = "defmt")]
mod defmt_impls {
    use super::*;

    impl defmt::Format for ConfigError {
        fn format(&self, fmt: defmt::Formatter) {
            match self {
                Self::InvalidAnalogChannel { channel, available } => {
                    defmt::write!(fmt, "channel {} out of range ({})", channel, available)
                }
                Self::PinUnavailable { pin } => defmt::write!(fmt, "pin {} unavailable", pin),
                Self::IdentifierTooLong => defmt::write!(fmt, "identifier too long"),
                Self::TooManySensors { limit } => {
                    defmt::write!(fmt, "too many sensors (limit {})", limit)
                }
            }
        }
    }

    impl defmt::Format for HalError {
        fn format(&self, fmt: defmt::Formatter) {
            match self {
                Self::Adc => defmt::write!(fmt, "adc fault"),
                Self::Gpio => defmt::write!(fmt, "gpio fault"),
                Self::Bus => defmt::write!(fmt, "bus fault"),
                Self::Crc => defmt::write!(fmt, "crc mismatch"),
                Self::DeviceMissing => defmt::write!(fmt, "device missing"),
            }
        }
    }

    impl defmt::Format for ReadError {
        fn format(&self, fmt: defmt::Formatter) {
            defmt::write!(fmt, "sensor {} read failed: {}", self.id, self.cause);
        }
    }

    impl defmt::Format for LinkError {
        fn format(&self, fmt: defmt::Formatter) {
            match self {
                Self::NotConnected => defmt::write!(fmt, "not connected"),
                Self::AssociationFailed => defmt::write!(fmt, "association failed"),
                Self::SessionFailed => defmt::write!(fmt, "session failed"),
                Self::PublishFailed => defmt::write!(fmt, "publish failed"),
                Self::EncodeFailed => defmt::write!(fmt, "encode failed"),
            }
        }
    }
}
