//! Analog tank-level driver
//!
//! Binds one ADC channel per instance at construction and turns raw
//! samples into calibrated level percentages. No internal retries: a
//! peripheral fault propagates as a [`ReadError`] tagged with the
//! sensor id, and the scheduler logs and skips that cycle.

use crate::calibration::{level_from_voltage, round_to_tenth, voltage_from_raw};
use crate::config::TankConfig;
use crate::errors::{ConfigError, ReadError};
use crate::hal::{AdcBank, AnalogChannel};
use crate::ident::SensorId;
use crate::readings::TankReading;

/// One tank-level sender on one analog channel
#[derive(Debug)]
pub struct TankSensor<C: AnalogChannel> {
    config: TankConfig,
    channel: C,
}

impl<C: AnalogChannel> TankSensor<C> {
    /// Bind the configured channel from the board's bank
    ///
    /// Fails with [`ConfigError::InvalidAnalogChannel`] when the
    /// configured index is outside the bank's channel count. The
    /// failure is fatal for this one sensor only.
    pub fn new<B>(config: TankConfig, bank: &mut B) -> Result<Self, ConfigError>
    where
        B: AdcBank<Channel = C>,
    {
        if config.adc_channel >= bank.channel_count() {
            return Err(ConfigError::InvalidAnalogChannel {
                channel: config.adc_channel,
                available: bank.channel_count(),
            });
        }

        let channel = bank.claim(config.adc_channel)?;
        Ok(Self { config, channel })
    }

    /// Sensor identifier, used to build the publish topic
    pub fn id(&self) -> SensorId {
        self.config.id
    }

    /// Take one sample and produce a calibrated reading
    pub fn read(&mut self) -> Result<TankReading, ReadError> {
        let sample = self.channel.sample().map_err(|cause| ReadError {
            id: self.config.id,
            cause,
        })?;

        let voltage = voltage_from_raw(
            sample.value,
            sample.resolution,
            self.channel.reference_voltage(),
        );
        let level = round_to_tenth(level_from_voltage(
            voltage,
            self.config.min_voltage,
            self.config.max_voltage,
        ));

        Ok(TankReading {
            id: self.config.id,
            name: self.config.name,
            tank_type: self.config.tank_type,
            capacity: self.config.capacity_l,
            level,
            raw: sample.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TankType;
    use crate::errors::HalError;
    use crate::hal::RawSample;
    use crate::ident::InlineString;

    #[derive(Debug)]
    struct MockChannel {
        raw: u16,
        fail: bool,
    }

    impl AnalogChannel for MockChannel {
        fn sample(&mut self) -> Result<RawSample, HalError> {
            if self.fail {
                return Err(HalError::Adc);
            }
            Ok(RawSample {
                value: self.raw,
                resolution: 65535,
            })
        }

        fn reference_voltage(&self) -> f32 {
            3.3
        }
    }

    struct MockBank {
        raw: u16,
        fail: bool,
    }

    impl AdcBank for MockBank {
        type Channel = MockChannel;

        fn channel_count(&self) -> u8 {
            3
        }

        fn claim(&mut self, _index: u8) -> Result<MockChannel, ConfigError> {
            Ok(MockChannel {
                raw: self.raw,
                fail: self.fail,
            })
        }
    }

    fn config(channel: u8) -> TankConfig {
        TankConfig {
            id: InlineString::new("fresh_water").unwrap(),
            name: InlineString::new("Fresh Water").unwrap(),
            tank_type: TankType::FreshWater,
            adc_channel: channel,
            capacity_l: 200,
            min_voltage: 0.5,
            max_voltage: 3.0,
        }
    }

    /// Raw sample corresponding to a given sender voltage at 3.3V/16-bit
    fn raw_for_voltage(voltage: f32) -> u16 {
        (voltage / 3.3 * 65535.0) as u16
    }

    #[test]
    fn half_full_tank_reads_fifty_percent() {
        let mut bank = MockBank {
            raw: raw_for_voltage(1.75),
            fail: false,
        };
        let mut sensor = TankSensor::new(config(0), &mut bank).unwrap();

        let reading = sensor.read().unwrap();
        assert!((reading.level - 50.0).abs() < 0.1);
        assert_eq!(reading.capacity, 200);
        assert_eq!(reading.tank_type, TankType::FreshWater);
    }

    #[test]
    fn invalid_channel_fails_construction() {
        let mut bank = MockBank { raw: 0, fail: false };
        let err = TankSensor::new(config(3), &mut bank).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidAnalogChannel {
                channel: 3,
                available: 3
            }
        );
    }

    #[test]
    fn adc_fault_is_tagged_with_sensor_id() {
        let mut bank = MockBank { raw: 0, fail: true };
        let mut sensor = TankSensor::new(config(1), &mut bank).unwrap();

        let err = sensor.read().unwrap_err();
        assert_eq!(err.id.as_str(), "fresh_water");
        assert_eq!(err.cause, HalError::Adc);
    }

    #[test]
    fn level_is_clamped_and_rounded() {
        // Sender voltage above the full mark
        let mut bank = MockBank {
            raw: raw_for_voltage(3.2),
            fail: false,
        };
        let mut sensor = TankSensor::new(config(0), &mut bank).unwrap();
        assert_eq!(sensor.read().unwrap().level, 100.0);
    }
}
