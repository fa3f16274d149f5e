//! Ephemeral reading records produced by the sensor drivers
//!
//! One value per poll, already normalized: levels are clamped to
//! [0, 100] and rounded to one decimal before a reading leaves the
//! driver layer. Serialized field names are the broker contract; the
//! `id` routes the reading to its topic and is not part of the payload.

use crate::config::TankType;
use crate::ident::{InlineString, SensorId};

/// One tank-level sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TankReading {
    /// Sensor id for topic routing, not serialized
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    pub id: SensorId,
    /// Display name
    pub name: InlineString,
    /// Tank contents
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub tank_type: TankType,
    /// Capacity in liters, passed through from config
    pub capacity: u32,
    /// Fill level percentage, 0-100 with one decimal
    pub level: f32,
    /// Raw ADC sample, for calibration debugging
    pub raw: u16,
}

/// One temperature sample from a bus probe
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TemperatureReading {
    /// Sensor id for topic routing, not serialized
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    pub id: SensorId,
    /// Display name
    pub name: InlineString,
    /// Mounting location
    pub location: InlineString,
    /// Temperature in Celsius, one decimal
    pub value: f32,
    /// Low alarm threshold, passed through from config
    #[cfg_attr(feature = "serde", serde(rename = "minAlarm"))]
    pub min_alarm: Option<f32>,
    /// High alarm threshold, passed through from config
    #[cfg_attr(feature = "serde", serde(rename = "maxAlarm"))]
    pub max_alarm: Option<f32>,
}

/// One digital input sample, after inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DigitalReading {
    /// Input id for topic routing, not serialized
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    pub id: SensorId,
    /// Display name
    pub name: InlineString,
    /// Logical state with the inversion flag applied
    pub state: bool,
    /// Whether the raw pin level was inverted
    pub inverted: bool,
}

// JSON shape (field names, skipped id, null alarms) is asserted in the
// connectors crate, where serde_json is available.
