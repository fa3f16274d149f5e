//! Connectivity manager - the single owner of session state
//!
//! Implements [`Uplink`] over a [`NetworkLink`] (WiFi association), an
//! [`MqttSession`] (broker transport), and a [`WallClock`] (heartbeat
//! timestamps). Nothing else in the node is allowed to transition
//! [`ConnectionState`].

use std::thread;
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;

use marinode_core::errors::LinkError;
use marinode_core::hal::NetworkLink;
use marinode_core::link::{ConnectionState, Uplink};
use marinode_core::readings::{DigitalReading, TankReading, TemperatureReading};
use marinode_core::SensorId;

use crate::{MqttSession, WallClock};

/// Static manager configuration
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Prefix prepended to every topic ("boat" publishes on
    /// `boat/tanks/<id>` and so on)
    pub topic_prefix: String,
    /// Fixed pause between disconnect and reconnect
    pub reconnect_backoff: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            topic_prefix: "boat".to_owned(),
            reconnect_backoff: Duration::from_secs(1),
        }
    }
}

/// Session statistics common to all uplinks
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Messages sent successfully
    pub messages_sent: u64,
    /// Messages that failed to send
    pub messages_failed: u64,
    /// Reconnection attempts
    pub reconnections: u32,
}

/// Heartbeat published on the `status` subtopic
#[derive(Debug, Serialize)]
struct StatusPayload {
    connected: bool,
    uptime: u32,
    timestamp: u64,
}

/// Owns WiFi association and broker session state
pub struct ConnectivityManager<N, S, C>
where
    N: NetworkLink,
    S: MqttSession,
    C: WallClock,
{
    link: N,
    session: S,
    clock: C,
    config: ManagerConfig,
    state: ConnectionState,
    stats: SessionStats,
}

impl<N, S, C> ConnectivityManager<N, S, C>
where
    N: NetworkLink,
    S: MqttSession,
    C: WallClock,
{
    /// Build a manager in the `Disconnected` state
    pub fn new(link: N, session: S, clock: C, config: ManagerConfig) -> Self {
        Self {
            link,
            session,
            clock,
            config,
            state: ConnectionState::Disconnected,
            stats: SessionStats::default(),
        }
    }

    /// Session statistics
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Serialize and publish on `<prefix>/<suffix>`; at most one send
    /// attempt, demoting the state on send failure
    fn publish_json<T: Serialize>(&mut self, suffix: &str, payload: &T) -> Result<(), LinkError> {
        if self.state != ConnectionState::Connected {
            return Err(LinkError::NotConnected);
        }

        // An encoding failure makes no send attempt and does not
        // demote the session
        let bytes = serde_json::to_vec(payload).map_err(|err| {
            warn!("payload encoding failed: {err}");
            LinkError::EncodeFailed
        })?;

        let topic = format!("{}/{}", self.config.topic_prefix, suffix);
        match self.session.publish(&topic, &bytes) {
            Ok(()) => {
                self.stats.messages_sent += 1;
                Ok(())
            }
            Err(err) => {
                warn!("publish on {topic} failed: {err}");
                self.stats.messages_failed += 1;
                self.state = ConnectionState::Disconnected;
                Err(LinkError::PublishFailed)
            }
        }
    }

    fn describe_address(&self) -> String {
        match self.link.address() {
            Some([a, b, c, d]) => format!("{a}.{b}.{c}.{d}"),
            None => "unknown".to_owned(),
        }
    }
}

impl<N, S, C> Uplink for ConnectivityManager<N, S, C>
where
    N: NetworkLink,
    S: MqttSession,
    C: WallClock,
{
    fn state(&self) -> ConnectionState {
        self.state
    }

    fn connect(&mut self) -> Result<(), LinkError> {
        self.state = ConnectionState::Connecting;

        self.link.activate();
        if !self.link.is_connected() {
            if let Err(err) = self.link.connect() {
                warn!("wifi association failed: {err}");
                self.state = ConnectionState::Disconnected;
                return Err(LinkError::AssociationFailed);
            }
        }

        match self.session.connect() {
            Ok(()) => {
                info!("uplink connected, address {}", self.describe_address());
                self.state = ConnectionState::Connected;
                Ok(())
            }
            Err(err) => {
                warn!("broker session failed: {err}");
                self.state = ConnectionState::Disconnected;
                Err(LinkError::SessionFailed)
            }
        }
    }

    fn reconnect(&mut self) -> Result<(), LinkError> {
        if let Err(err) = self.session.disconnect() {
            // A failing teardown of a dead session is only noise
            warn!("disconnect failed: {err}");
        }
        self.state = ConnectionState::Disconnected;
        self.stats.reconnections += 1;

        thread::sleep(self.config.reconnect_backoff);
        self.connect()
    }

    fn publish_tank(&mut self, id: SensorId, reading: &TankReading) -> Result<(), LinkError> {
        self.publish_json(&format!("tanks/{id}"), reading)
    }

    fn publish_temperature(
        &mut self,
        id: SensorId,
        reading: &TemperatureReading,
    ) -> Result<(), LinkError> {
        self.publish_json(&format!("temp/{id}"), reading)
    }

    fn publish_digital(
        &mut self,
        id: SensorId,
        reading: &DigitalReading,
    ) -> Result<(), LinkError> {
        self.publish_json(&format!("digital/{id}"), reading)
    }

    fn publish_status(&mut self, uptime_seconds: u32) -> Result<(), LinkError> {
        let payload = StatusPayload {
            connected: true,
            uptime: uptime_seconds,
            timestamp: self.clock.epoch_seconds(),
        };
        self.publish_json("status", &payload)
    }
}
