//! Uplink Connectors for the Telemetry Node
//!
//! ## Overview
//!
//! This crate owns everything between the scheduler's publish calls and
//! the wire: the connectivity state machine, payload encoding, and the
//! MQTT session. The core crate stays free of protocol code; it talks
//! to [`marinode_core::Uplink`], which [`manager::ConnectivityManager`]
//! implements.
//!
//! ## Why MQTT
//!
//! The node sits on a lossy wireless link publishing small, frequent
//! readings to a single broker on the local network:
//!
//! - Persistent connection amortizes handshakes across readings
//! - 2-5 byte header overhead suits sub-100-byte payloads
//! - Topic hierarchy gives consumers per-sensor filtering for free
//! - QoS 0 matches the no-buffering design: a reading is worth one
//!   attempt, after which the next poll supersedes it
//!
//! ## Session lifecycle
//!
//! ```text
//! Disconnected ──connect()──▶ Connecting ──CONNACK──▶ Connected
//!       ▲                         │                       │
//!       └──────── failure ────────┘        publish failure┘
//! ```
//!
//! Any send failure demotes the state immediately; the scheduler sees
//! `Disconnected` on its next cycle and drives `reconnect()`. Retry is
//! a fixed blocking backoff, not exponential - the polling loop itself
//! bounds the attempt rate.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod manager;
pub mod mqtt;

// Re-export common types
pub use manager::{ConnectivityManager, ManagerConfig, SessionStats};
pub use mqtt::{MqttSettings, RumqttcSession};

use thiserror::Error;

/// Connector-level errors, mapped to [`marinode_core::LinkError`] at
/// the uplink seam
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// No session; nothing was sent
    #[error("not connected")]
    NotConnected,

    /// Broker refused or dropped the connection attempt
    #[error("connection rejected: {0}")]
    Rejected(String),

    /// Broker never acknowledged the session
    #[error("timed out waiting for broker acknowledgement")]
    Timeout,

    /// MQTT client error
    #[error("mqtt: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Payload serialization failed
    #[error("serialize: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One broker session: connect, publish, disconnect
///
/// The production implementation is [`mqtt::RumqttcSession`]; tests
/// script a mock. Primitives are assumed reliable-enough building
/// blocks - retry policy lives a level up, in the manager.
pub trait MqttSession {
    /// Establish the session, blocking until acknowledged or failed
    fn connect(&mut self) -> Result<(), ConnectorError>;

    /// Send one message; exactly one attempt
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), ConnectorError>;

    /// Tear the session down; safe to call when already down
    fn disconnect(&mut self) -> Result<(), ConnectorError>;
}

/// Wall-clock boundary for the heartbeat timestamp
pub trait WallClock {
    /// Seconds since the Unix epoch
    fn epoch_seconds(&self) -> u64;
}

/// Wall clock backed by [`std::time::SystemTime`]
#[derive(Debug, Default, Clone)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn epoch_seconds(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
