//! MQTT session backed by `rumqttc`
//!
//! The synchronous `rumqttc::Client` fits the node's single-threaded
//! design; the only extra thread is the event-loop drain that rumqttc
//! requires, and it shares no sensor state. `connect` blocks until the
//! broker acknowledges the session so the state machine above never
//! reports `Connected` for a half-open socket.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};

use crate::{ConnectorError, MqttSession};

/// Incoming packets to inspect before giving up on a CONNACK
const CONNACK_POLL_LIMIT: usize = 16;

/// Broker connection settings
#[derive(Debug, Clone)]
pub struct MqttSettings {
    /// Broker host name or address
    pub broker: String,
    /// Broker port, conventionally 1883
    pub port: u16,
    /// Client identifier presented to the broker
    pub client_id: String,
    /// MQTT keep-alive interval
    pub keep_alive: Duration,
}

impl MqttSettings {
    /// Settings for a broker on the default port
    pub fn new(broker: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            port: 1883,
            client_id: client_id.into(),
            keep_alive: Duration::from_secs(60),
        }
    }
}

/// One broker session over `rumqttc`
pub struct RumqttcSession {
    settings: MqttSettings,
    client: Option<Client>,
    drain: Option<JoinHandle<()>>,
}

impl RumqttcSession {
    /// Create an unconnected session
    pub fn new(settings: MqttSettings) -> Self {
        Self {
            settings,
            client: None,
            drain: None,
        }
    }
}

impl MqttSession for RumqttcSession {
    fn connect(&mut self) -> Result<(), ConnectorError> {
        // Drop any previous half-open session first
        self.disconnect()?;

        let mut options = MqttOptions::new(
            self.settings.client_id.clone(),
            self.settings.broker.clone(),
            self.settings.port,
        );
        options.set_keep_alive(self.settings.keep_alive);

        let (client, mut connection) = Client::new(options, 16);

        // Block until the broker acknowledges the session; a refused
        // TCP connection or protocol error surfaces here immediately
        let mut acknowledged = false;
        for (polls, notification) in connection.iter().enumerate() {
            match notification {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    acknowledged = true;
                    break;
                }
                Ok(event) => {
                    debug!("pre-connack event: {event:?}");
                }
                Err(err) => return Err(ConnectorError::Rejected(err.to_string())),
            }
            if polls >= CONNACK_POLL_LIMIT {
                break;
            }
        }
        if !acknowledged {
            return Err(ConnectorError::Timeout);
        }

        // rumqttc needs its event loop pumped or publishes stall; the
        // drain exits once the connection dies
        let drain = thread::spawn(move || {
            for notification in connection.iter() {
                if let Err(err) = notification {
                    warn!("mqtt event loop closed: {err}");
                    break;
                }
            }
        });

        self.client = Some(client);
        self.drain = Some(drain);
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), ConnectorError> {
        let client = self.client.as_ref().ok_or(ConnectorError::NotConnected)?;
        client.publish(topic, QoS::AtMostOnce, false, payload.to_vec())?;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ConnectorError> {
        if let Some(client) = self.client.take() {
            // The broker side may already be gone; that is fine
            let _ = client.disconnect();
        }
        if let Some(drain) = self.drain.take() {
            let _ = drain.join();
        }
        Ok(())
    }
}

impl Drop for RumqttcSession {
    fn drop(&mut self) {
        let _ = self.disconnect();
    }
}
