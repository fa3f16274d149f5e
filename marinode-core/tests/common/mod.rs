//! Shared mocks for driving a whole node without hardware
//!
//! The simulated peripherals and uplink let tests run real scheduler
//! cycles while scripting faults (failing channels, dead pins, publish
//! rejections) and observing every uplink interaction in order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use marinode_core::config::MAX_BUS_DEVICES;
use marinode_core::errors::{ConfigError, HalError, LinkError};
use marinode_core::hal::{
    AdcBank, AnalogChannel, Delay, DeviceAddress, InputPin, OneWireBus, PinBank, Pull, RawSample,
};
use marinode_core::link::{ConnectionState, Uplink};
use marinode_core::readings::{DigitalReading, TankReading, TemperatureReading};
use marinode_core::time::{TickSource, Ticks};
use marinode_core::SensorId;

// --- clock ----------------------------------------------------------------

/// Tick source the test advances by hand
#[derive(Clone)]
pub struct SimClock {
    ticks: Rc<Cell<Ticks>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            ticks: Rc::new(Cell::new(0)),
        }
    }

    pub fn advance(&self, ms: u32) {
        self.ticks.set(self.ticks.get().wrapping_add(ms));
    }
}

impl TickSource for SimClock {
    fn ticks(&self) -> Ticks {
        self.ticks.get()
    }
}

// --- peripherals ----------------------------------------------------------

pub struct SimChannel {
    pub raw: u16,
    pub fail: bool,
}

impl AnalogChannel for SimChannel {
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

/// Bank handing out pre-configured channels by index
pub struct SimAdcBank {
    channels: Vec<Option<SimChannel>>,
}

impl SimAdcBank {
    pub fn new(channels: Vec<SimChannel>) -> Self {
        Self {
            channels: channels.into_iter().map(Some).collect(),
        }
    }
}

impl AdcBank for SimAdcBank {
    type Channel = SimChannel;

    fn channel_count(&self) -> u8 {
        self.channels.len() as u8
    }

    fn claim(&mut self, index: u8) -> Result<SimChannel, ConfigError> {
        self.channels
            .get_mut(index as usize)
            .and_then(Option::take)
            .ok_or(ConfigError::InvalidAnalogChannel {
                channel: index,
                available: self.channels.len() as u8,
            })
    }
}

pub struct SimBus {
    pub devices: Vec<(DeviceAddress, Result<f32, HalError>)>,
}

impl OneWireBus for SimBus {
    fn scan(&mut self) -> Result<heapless::Vec<DeviceAddress, MAX_BUS_DEVICES>, HalError> {
        let mut addresses = heapless::Vec::new();
        for (address, _) in &self.devices {
            addresses.push(*address).unwrap();
        }
        Ok(addresses)
    }

    fn start_conversion(&mut self) -> Result<(), HalError> {
        Ok(())
    }

    fn read_temperature(&mut self, address: &DeviceAddress) -> Result<f32, HalError> {
        self.devices
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, r)| *r)
            .unwrap_or(Err(HalError::DeviceMissing))
    }
}

pub struct SimPin {
    pub level: bool,
    pub fail: bool,
}

impl InputPin for SimPin {
    fn level(&mut self) -> Result<bool, HalError> {
        if self.fail {
            Err(HalError::Gpio)
        } else {
            Ok(self.level)
        }
    }
}

pub struct SimPinBank {
    pub pins: Vec<(u8, SimPin)>,
}

impl PinBank for SimPinBank {
    type Pin = SimPin;

    fn claim_input(&mut self, pin: u8, _pull: Pull) -> Result<SimPin, ConfigError> {
        let pos = self
            .pins
            .iter()
            .position(|(number, _)| *number == pin)
            .ok_or(ConfigError::PinUnavailable { pin })?;
        Ok(self.pins.remove(pos).1)
    }
}

/// Delay that only counts; integration cycles must not really sleep
#[derive(Default)]
pub struct SimDelay {
    pub slept_ms: Rc<Cell<u64>>,
}

impl Delay for SimDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.slept_ms.set(self.slept_ms.get() + ms as u64);
    }
}

// --- uplink ---------------------------------------------------------------

/// Every call the scheduler makes, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UplinkCall {
    Reconnect,
    Tank(String),
    Temperature(String),
    Digital(String),
    Status,
}

/// Scripted behavior shared between the test and the mock
pub struct UplinkScript {
    pub state: ConnectionState,
    pub calls: Vec<UplinkCall>,
    /// Publishes refused with `NotConnected` (no attempt made)
    pub rejected: u32,
    /// Fail the next accepted publish and demote the state
    pub fail_next_publish: bool,
    /// Make connect attempts fail
    pub fail_connect: bool,
}

impl UplinkScript {
    pub fn sends_of(&self, f: impl Fn(&UplinkCall) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }
}

/// Mock implementation of the uplink seam
pub struct MockUplink {
    pub script: Rc<RefCell<UplinkScript>>,
}

impl MockUplink {
    /// New uplink; starts disconnected like a real boot
    pub fn new() -> (Self, Rc<RefCell<UplinkScript>>) {
        let script = Rc::new(RefCell::new(UplinkScript {
            state: ConnectionState::Disconnected,
            calls: Vec::new(),
            rejected: 0,
            fail_next_publish: false,
            fail_connect: false,
        }));
        (
            Self {
                script: script.clone(),
            },
            script,
        )
    }

    fn publish(&mut self, call: UplinkCall) -> Result<(), LinkError> {
        let mut script = self.script.borrow_mut();
        if script.state != ConnectionState::Connected {
            script.rejected += 1;
            return Err(LinkError::NotConnected);
        }
        script.calls.push(call);
        if script.fail_next_publish {
            script.fail_next_publish = false;
            script.state = ConnectionState::Disconnected;
            return Err(LinkError::PublishFailed);
        }
        Ok(())
    }
}

impl Uplink for MockUplink {
    fn state(&self) -> ConnectionState {
        self.script.borrow().state
    }

    fn connect(&mut self) -> Result<(), LinkError> {
        let mut script = self.script.borrow_mut();
        if script.fail_connect {
            script.state = ConnectionState::Disconnected;
            Err(LinkError::SessionFailed)
        } else {
            script.state = ConnectionState::Connected;
            Ok(())
        }
    }

    fn reconnect(&mut self) -> Result<(), LinkError> {
        self.script.borrow_mut().calls.push(UplinkCall::Reconnect);
        self.connect()
    }

    fn publish_tank(&mut self, id: SensorId, _reading: &TankReading) -> Result<(), LinkError> {
        self.publish(UplinkCall::Tank(id.as_str().to_owned()))
    }

    fn publish_temperature(
        &mut self,
        id: SensorId,
        _reading: &TemperatureReading,
    ) -> Result<(), LinkError> {
        self.publish(UplinkCall::Temperature(id.as_str().to_owned()))
    }

    fn publish_digital(
        &mut self,
        id: SensorId,
        _reading: &DigitalReading,
    ) -> Result<(), LinkError> {
        self.publish(UplinkCall::Digital(id.as_str().to_owned()))
    }

    fn publish_status(&mut self, _uptime_seconds: u32) -> Result<(), LinkError> {
        self.publish(UplinkCall::Status)
    }
}
