//! Digital input driver
//!
//! Binds one GPIO pin per configured input with pull-up bias. An input
//! whose pin cannot be claimed is simply absent; the others still
//! function. Reads apply the per-input inversion flag and cache the
//! last observed state.

use heapless::Vec;

use crate::config::{DigitalInputConfig, MAX_DIGITAL_INPUTS};
use crate::hal::{InputPin, PinBank, Pull};
use crate::ident::SensorId;
use crate::logging::log_warn;
use crate::readings::DigitalReading;

struct Input<P> {
    config: DigitalInputConfig,
    pin: P,
    last_state: Option<bool>,
}

/// All configured binary inputs
pub struct DigitalInputs<P: InputPin> {
    inputs: Vec<Input<P>, MAX_DIGITAL_INPUTS>,
}

impl<P: InputPin> DigitalInputs<P> {
    /// Claim every configured pin as a pulled-up input
    ///
    /// A claim failure drops that one input and is logged; construction
    /// itself never fails.
    pub fn new<B>(configs: &[DigitalInputConfig], bank: &mut B) -> Self
    where
        B: PinBank<Pin = P>,
    {
        let mut inputs = Vec::new();

        for config in configs.iter().take(MAX_DIGITAL_INPUTS) {
            match bank.claim_input(config.pin, Pull::Up) {
                Ok(pin) => {
                    let _ = inputs.push(Input {
                        config: *config,
                        pin,
                        last_state: None,
                    });
                }
                Err(cause) => {
                    log_warn!("digital input {} skipped: {}", config.id, cause);
                }
            }
        }

        Self { inputs }
    }

    /// Number of inputs that were successfully bound
    pub fn bound_count(&self) -> usize {
        self.inputs.len()
    }

    /// Last state observed for an input, if it has been read
    pub fn last_state(&self, id: SensorId) -> Option<bool> {
        self.inputs
            .iter()
            .find(|i| i.config.id == id)
            .and_then(|i| i.last_state)
    }

    /// Read every bound input
    ///
    /// Applies the inversion flag (`state = inverted ? !raw : raw`),
    /// updates the last-state cache, and omits inputs whose pin read
    /// fails this cycle.
    pub fn read_all(&mut self) -> Vec<DigitalReading, MAX_DIGITAL_INPUTS> {
        let mut readings = Vec::new();

        for input in self.inputs.iter_mut() {
            match input.pin.level() {
                Ok(raw) => {
                    let state = if input.config.inverted { !raw } else { raw };
                    input.last_state = Some(state);
                    let _ = readings.push(DigitalReading {
                        id: input.config.id,
                        name: input.config.name,
                        state,
                        inverted: input.config.inverted,
                    });
                }
                Err(cause) => {
                    log_warn!("digital read failed ({}): {}", input.config.id, cause);
                }
            }
        }

        readings
    }
}
