//! Typed sensor configuration
//!
//! Configuration is loaded and validated once at startup by the host
//! (file, NVS, compiled-in table - outside this crate) and handed in as
//! these structs. Drivers validate what only they can check, such as a
//! channel index against the board's channel count; everything else is
//! correct by type.

use crate::ident::{InlineString, SensorId};

/// Maximum number of configured tank senders
pub const MAX_TANKS: usize = 4;

/// Maximum number of configured temperature probes
pub const MAX_TEMPERATURE_SENSORS: usize = 8;

/// Maximum number of configured digital inputs
pub const MAX_DIGITAL_INPUTS: usize = 8;

/// Maximum devices a single 1-Wire scan can return
pub const MAX_BUS_DEVICES: usize = 8;

/// Fixed wait after a broadcast conversion before probe values are
/// valid to read (12-bit DS18B20 conversion latency)
pub const CONVERSION_SETTLE_MS: u32 = 750;

/// What a tank holds, as published in the `type` payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum TankType {
    /// Potable water
    FreshWater,
    /// Diesel or petrol
    Fuel,
    /// Grey water
    WasteWater,
    /// Sewage holding
    BlackWater,
    /// Live bait well
    LiveWell,
}

impl TankType {
    /// Wire name of the tank type
    pub const fn as_str(&self) -> &'static str {
        match self {
            TankType::FreshWater => "freshWater",
            TankType::Fuel => "fuel",
            TankType::WasteWater => "wasteWater",
            TankType::BlackWater => "blackWater",
            TankType::LiveWell => "liveWell",
        }
    }
}

/// One analog tank-level sender
#[derive(Debug, Clone, Copy)]
pub struct TankConfig {
    /// Identifier, also the last topic segment
    pub id: SensorId,
    /// Display name
    pub name: InlineString,
    /// What the tank holds
    pub tank_type: TankType,
    /// ADC channel the sender is wired to
    pub adc_channel: u8,
    /// Tank capacity in liters
    pub capacity_l: u32,
    /// Sender voltage with the tank empty
    pub min_voltage: f32,
    /// Sender voltage with the tank full
    pub max_voltage: f32,
}

/// One 1-Wire temperature probe
#[derive(Debug, Clone, Copy)]
pub struct TemperatureConfig {
    /// Identifier, also the last topic segment
    pub id: SensorId,
    /// Display name
    pub name: InlineString,
    /// Mounting location ("engine", "cabin", "fridge", ...)
    pub location: InlineString,
    /// Low-temperature alarm threshold, if any
    pub min_alarm: Option<f32>,
    /// High-temperature alarm threshold, if any
    pub max_alarm: Option<f32>,
}

/// One binary digital input
#[derive(Debug, Clone, Copy)]
pub struct DigitalInputConfig {
    /// Identifier, also the last topic segment
    pub id: SensorId,
    /// Display name
    pub name: InlineString,
    /// GPIO pin the contact is wired to
    pub pin: u8,
    /// Invert the raw pin level (active-low wiring)
    pub inverted: bool,
}

/// Polling cadence of the telemetry loop, all in milliseconds
#[derive(Debug, Clone, Copy)]
pub struct PollIntervals {
    /// Interval between tank-level passes
    pub tank_ms: u32,
    /// Interval between temperature passes
    pub temperature_ms: u32,
    /// Interval between digital-input passes
    pub digital_ms: u32,
    /// Interval between status heartbeats
    pub status_ms: u32,
    /// Sleep between loop iterations; must stay below the shortest
    /// interval above or timers would starve
    pub idle_quantum_ms: u32,
    /// Hold-off after a reconnect attempt before sensing resumes
    pub reconnect_hold_ms: u32,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            tank_ms: 5_000,
            temperature_ms: 10_000,
            digital_ms: 1_000,
            status_ms: 30_000,
            idle_quantum_ms: 100,
            reconnect_hold_ms: 5_000,
        }
    }
}

impl PollIntervals {
    /// Shortest of the four class intervals
    pub fn shortest_ms(&self) -> u32 {
        self.tank_ms
            .min(self.temperature_ms)
            .min(self.digital_ms)
            .min(self.status_ms)
    }
}
