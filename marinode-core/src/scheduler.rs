//! Telemetry scheduler - the multi-rate cooperative polling loop
//!
//! Single-threaded, no preemption. Four logical timers (tanks,
//! temperatures, digital inputs, heartbeat) track their time of last
//! fire against the monotonic tick with wraparound-safe arithmetic.
//! Each cycle, every due timer triggers its class's read pass and the
//! resulting readings are published immediately and independently.
//!
//! Connectivity repair takes priority over sensing: while the uplink is
//! down the cycle attempts one reconnect, backs off, and skips sensor
//! work. When several timers fire in the same cycle the passes run in
//! program order - tanks, temperatures, digitals, heartbeat.
//!
//! No error terminates the loop; readings that fail are logged and
//! skipped for that cycle only.

use heapless::Vec;

use crate::config::{PollIntervals, MAX_TANKS};
use crate::drivers::{DigitalInputs, TankSensor, TemperatureSensors};
use crate::errors::LinkError;
use crate::hal::{AnalogChannel, Delay, InputPin, OneWireBus};
use crate::link::{ConnectionState, Uplink};
use crate::logging::{log_info, log_warn};
use crate::time::{ticks_elapsed, TickSource, Ticks};

/// Everything the loop owns: drivers plus the uplink
///
/// Constructed once at startup and moved into the [`Scheduler`]; there
/// is no global mutable state anywhere in the node.
pub struct NodeContext<C, W, P, U>
where
    C: AnalogChannel,
    W: OneWireBus,
    P: InputPin,
    U: Uplink,
{
    /// Analog tank senders
    pub tanks: Vec<TankSensor<C>, MAX_TANKS>,
    /// Probes on the shared 1-Wire bus
    pub temperatures: TemperatureSensors<W>,
    /// Binary inputs
    pub digitals: DigitalInputs<P>,
    /// Outbound session
    pub uplink: U,
}

/// Time-of-last-fire timer with wraparound-safe elapsed checks
#[derive(Debug, Clone, Copy)]
struct PollTimer {
    last_fire: Ticks,
}

impl PollTimer {
    const fn new() -> Self {
        Self { last_fire: 0 }
    }

    fn due(&self, now: Ticks, interval_ms: u32) -> bool {
        ticks_elapsed(now, self.last_fire) >= interval_ms
    }

    fn fire(&mut self, now: Ticks) {
        self.last_fire = now;
    }
}

/// Counters for observing scheduler behavior
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Tank read passes performed
    pub tank_polls: u32,
    /// Temperature read passes performed
    pub temperature_polls: u32,
    /// Digital read passes performed
    pub digital_polls: u32,
    /// Heartbeats attempted
    pub heartbeats: u32,
    /// Reconnect attempts
    pub reconnects: u32,
    /// Individual readings that failed to publish
    pub publish_failures: u32,
    /// Individual sensor reads that failed
    pub read_failures: u32,
}

/// The telemetry main loop
pub struct Scheduler<C, W, P, U, T, D>
where
    C: AnalogChannel,
    W: OneWireBus,
    P: InputPin,
    U: Uplink,
    T: TickSource,
    D: Delay,
{
    ctx: NodeContext<C, W, P, U>,
    clock: T,
    delay: D,
    intervals: PollIntervals,
    tank_timer: PollTimer,
    temperature_timer: PollTimer,
    digital_timer: PollTimer,
    status_timer: PollTimer,
    stats: CycleStats,
}

impl<C, W, P, U, T, D> Scheduler<C, W, P, U, T, D>
where
    C: AnalogChannel,
    W: OneWireBus,
    P: InputPin,
    U: Uplink,
    T: TickSource,
    D: Delay,
{
    /// Build the loop around an owned context
    ///
    /// The idle quantum must be shorter than the shortest class
    /// interval or timers would starve; the intervals are static
    /// configuration, so this is a debug assertion rather than a
    /// runtime error.
    pub fn new(ctx: NodeContext<C, W, P, U>, intervals: PollIntervals, clock: T, delay: D) -> Self {
        debug_assert!(intervals.idle_quantum_ms < intervals.shortest_ms());

        Self {
            ctx,
            clock,
            delay,
            intervals,
            tank_timer: PollTimer::new(),
            temperature_timer: PollTimer::new(),
            digital_timer: PollTimer::new(),
            status_timer: PollTimer::new(),
            stats: CycleStats::default(),
        }
    }

    /// Observed counters
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Borrow the context (drivers and uplink)
    pub fn context(&self) -> &NodeContext<C, W, P, U> {
        &self.ctx
    }

    /// Run forever; suspension happens only at the fixed sleep points
    pub fn run(&mut self) -> ! {
        log_info!("telemetry loop starting");
        loop {
            self.run_cycle();
            self.delay.delay_ms(self.intervals.idle_quantum_ms);
        }
    }

    /// One loop iteration
    ///
    /// Exposed separately so hosts and tests can drive the loop with
    /// their own clock.
    pub fn run_cycle(&mut self) {
        // Connectivity repair precedes all sensing
        if self.ctx.uplink.state() != ConnectionState::Connected {
            log_info!("uplink down, reconnecting");
            self.stats.reconnects += 1;
            if let Err(cause) = self.ctx.uplink.reconnect() {
                log_warn!("reconnect failed: {}", cause);
            }
            self.delay.delay_ms(self.intervals.reconnect_hold_ms);
            return;
        }

        let now = self.clock.ticks();

        if self.tank_timer.due(now, self.intervals.tank_ms) {
            self.tank_timer.fire(now);
            self.poll_tanks();
        }

        if self.temperature_timer.due(now, self.intervals.temperature_ms) {
            self.temperature_timer.fire(now);
            self.poll_temperatures();
        }

        if self.digital_timer.due(now, self.intervals.digital_ms) {
            self.digital_timer.fire(now);
            self.poll_digitals();
        }

        if self.status_timer.due(now, self.intervals.status_ms) {
            self.status_timer.fire(now);
            self.stats.heartbeats += 1;
            let uptime_seconds = now / 1_000;
            if let Err(cause) = self.ctx.uplink.publish_status(uptime_seconds) {
                self.note_publish_failure("status", cause);
            }
        }
    }

    fn poll_tanks(&mut self) {
        self.stats.tank_polls += 1;

        for tank in self.ctx.tanks.iter_mut() {
            match tank.read() {
                Ok(reading) => {
                    if let Err(cause) = self.ctx.uplink.publish_tank(reading.id, &reading) {
                        self.stats.publish_failures += 1;
                        match cause {
                            LinkError::NotConnected => {
                                log_info!("skipping tank publish, link down")
                            }
                            _ => log_warn!("tank publish failed ({}): {}", reading.id, cause),
                        }
                    }
                }
                Err(cause) => {
                    self.stats.read_failures += 1;
                    log_warn!("tank read error ({}): {}", cause.id, cause.cause);
                }
            }
        }
    }

    fn poll_temperatures(&mut self) {
        self.stats.temperature_polls += 1;

        let readings = self.ctx.temperatures.read_all(&mut self.delay);
        for reading in &readings {
            if let Err(cause) = self.ctx.uplink.publish_temperature(reading.id, reading) {
                self.note_publish_failure("temperature", cause);
            }
        }
    }

    fn poll_digitals(&mut self) {
        self.stats.digital_polls += 1;

        let readings = self.ctx.digitals.read_all();
        for reading in &readings {
            if let Err(cause) = self.ctx.uplink.publish_digital(reading.id, reading) {
                self.note_publish_failure("digital", cause);
            }
        }
    }

    fn note_publish_failure(&mut self, class: &'static str, cause: LinkError) {
        self.stats.publish_failures += 1;
        match cause {
            LinkError::NotConnected => log_info!("skipping {} publish, link down", class),
            _ => log_warn!("{} publish failed: {}", class, cause),
        }
    }
}
