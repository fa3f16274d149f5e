//! Multi-drop 1-Wire temperature driver
//!
//! All probes share one bus. Construction scans the bus and binds
//! discovered device addresses to configured logical ids; `read_all`
//! then broadcasts one conversion, waits the settle delay, and reads
//! each bound device.
//!
//! ## Address binding
//!
//! Discovered addresses bind to configured ids by positional order:
//! the Nth discovered device becomes the Nth configured sensor. Bus
//! order is not guaranteed stable across power cycles or wiring
//! changes, so hosts that persist the resulting map should feed it back
//! through [`TemperatureSensors::with_known_addresses`]; persisted
//! matches bind first and only the leftover devices fall back to
//! positional order.
//!
//! An unavailable bus degrades gracefully: the sensor set stays empty
//! and every read pass returns an empty result.

use heapless::Vec;

use crate::calibration::round_to_tenth;
use crate::config::{TemperatureConfig, CONVERSION_SETTLE_MS, MAX_TEMPERATURE_SENSORS};
use crate::hal::{Delay, DeviceAddress, OneWireBus};
use crate::ident::SensorId;
use crate::logging::log_warn;
use crate::readings::TemperatureReading;

/// One configured probe bound to a bus address
struct Probe {
    config: TemperatureConfig,
    address: DeviceAddress,
}

/// All temperature probes on one 1-Wire bus
pub struct TemperatureSensors<W: OneWireBus> {
    bus: Option<W>,
    probes: Vec<Probe, MAX_TEMPERATURE_SENSORS>,
}

impl<W: OneWireBus> TemperatureSensors<W> {
    /// Scan the bus and bind devices to configs positionally
    pub fn new(bus: Option<W>, configs: &[TemperatureConfig]) -> Self {
        Self::with_known_addresses(bus, configs, &[])
    }

    /// Scan the bus, preferring a host-persisted id-to-address map
    ///
    /// Every `known` pair whose address is actually present binds its
    /// id first; devices and configs left over are paired positionally.
    /// Unknown pairs (address no longer on the bus) are ignored.
    pub fn with_known_addresses(
        bus: Option<W>,
        configs: &[TemperatureConfig],
        known: &[(SensorId, DeviceAddress)],
    ) -> Self {
        let mut bus = match bus {
            Some(bus) => bus,
            None => {
                log_warn!("1-Wire bus not available, temperature sensing disabled");
                return Self {
                    bus: None,
                    probes: Vec::new(),
                };
            }
        };

        let addresses = match bus.scan() {
            Ok(addresses) => addresses,
            Err(cause) => {
                log_warn!("1-Wire scan failed: {}", cause);
                return Self {
                    bus: Some(bus),
                    probes: Vec::new(),
                };
            }
        };

        let mut probes: Vec<Probe, MAX_TEMPERATURE_SENSORS> = Vec::new();
        let mut address_used = [false; crate::config::MAX_BUS_DEVICES];
        let mut config_bound = [false; MAX_TEMPERATURE_SENSORS];

        // Persisted matches first
        for (slot, config) in configs.iter().take(MAX_TEMPERATURE_SENSORS).enumerate() {
            let persisted = known.iter().find(|(id, _)| *id == config.id);
            if let Some((_, address)) = persisted {
                if let Some(pos) = addresses.iter().position(|a| a == address) {
                    if !address_used[pos] {
                        address_used[pos] = true;
                        config_bound[slot] = true;
                        let _ = probes.push(Probe {
                            config: *config,
                            address: *address,
                        });
                    }
                }
            }
        }

        // Remaining devices bind positionally to remaining configs
        let mut next_slot = 0usize;
        for (pos, address) in addresses.iter().enumerate() {
            if address_used[pos] {
                continue;
            }
            while next_slot < configs.len().min(MAX_TEMPERATURE_SENSORS)
                && config_bound[next_slot]
            {
                next_slot += 1;
            }
            if next_slot >= configs.len().min(MAX_TEMPERATURE_SENSORS) {
                break;
            }
            config_bound[next_slot] = true;
            let _ = probes.push(Probe {
                config: configs[next_slot],
                address: *address,
            });
            next_slot += 1;
        }

        Self {
            bus: Some(bus),
            probes,
        }
    }

    /// Number of bound probes; never exceeds the configured count
    pub fn bound_count(&self) -> usize {
        self.probes.len()
    }

    /// Bus address bound to a sensor id, for host-side persistence
    pub fn address_of(&self, id: SensorId) -> Option<DeviceAddress> {
        self.probes
            .iter()
            .find(|p| p.config.id == id)
            .map(|p| p.address)
    }

    /// Read every bound probe
    ///
    /// One bus-wide conversion broadcast, a fixed settle delay, then a
    /// per-device read. Per-device failures are logged and omitted from
    /// the result; they never fail the pass.
    pub fn read_all(&mut self, delay: &mut impl Delay) -> Vec<TemperatureReading, MAX_TEMPERATURE_SENSORS> {
        let mut readings = Vec::new();

        let bus = match self.bus.as_mut() {
            Some(bus) if !self.probes.is_empty() => bus,
            _ => return readings,
        };

        if let Err(cause) = bus.start_conversion() {
            log_warn!("1-Wire conversion broadcast failed: {}", cause);
            return readings;
        }

        delay.delay_ms(CONVERSION_SETTLE_MS);

        for probe in &self.probes {
            match bus.read_temperature(&probe.address) {
                Ok(value) => {
                    let _ = readings.push(TemperatureReading {
                        id: probe.config.id,
                        name: probe.config.name,
                        location: probe.config.location,
                        value: round_to_tenth(value),
                        min_alarm: probe.config.min_alarm,
                        max_alarm: probe.config.max_alarm,
                    });
                }
                Err(cause) => {
                    log_warn!("temperature read failed ({}): {}", probe.config.id, cause);
                }
            }
        }

        readings
    }
}
