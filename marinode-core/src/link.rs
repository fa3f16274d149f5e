//! Uplink seam between the scheduler and the connectivity manager
//!
//! The scheduler never talks to a broker; it hands readings to an
//! [`Uplink`] and observes [`ConnectionState`]. The manager is the only
//! writer of that state.

use crate::errors::LinkError;
use crate::ident::SensorId;
use crate::readings::{DigitalReading, TankReading, TemperatureReading};

/// State of the single outbound session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No session; the scheduler will ask for a reconnect
    Disconnected,
    /// Association or session establishment in progress
    Connecting,
    /// Session live; publishes are attempted
    Connected,
}

/// Outbound publish surface consumed by the scheduler
///
/// Contract: every `publish_*` makes at most one send attempt. When the
/// state is not [`ConnectionState::Connected`] the call is a no-op
/// returning [`LinkError::NotConnected`]; when a send fails the
/// implementation demotes itself to `Disconnected` immediately, so the
/// remaining publishes of the same pass short-circuit.
pub trait Uplink {
    /// Current session state; written only by the implementation
    fn state(&self) -> ConnectionState;

    /// Establish association and session
    ///
    /// Failure leaves the state `Disconnected` and reports why; it is
    /// never fatal - the caller decides the retry policy.
    fn connect(&mut self) -> Result<(), LinkError>;

    /// Tear down, back off, and connect again
    fn reconnect(&mut self) -> Result<(), LinkError>;

    /// Publish one tank reading on `tanks/<id>`
    fn publish_tank(&mut self, id: SensorId, reading: &TankReading) -> Result<(), LinkError>;

    /// Publish one temperature reading on `temp/<id>`
    fn publish_temperature(
        &mut self,
        id: SensorId,
        reading: &TemperatureReading,
    ) -> Result<(), LinkError>;

    /// Publish one digital input reading on `digital/<id>`
    fn publish_digital(&mut self, id: SensorId, reading: &DigitalReading)
        -> Result<(), LinkError>;

    /// Publish the liveness heartbeat on `status`
    fn publish_status(&mut self, uptime_seconds: u32) -> Result<(), LinkError>;
}
