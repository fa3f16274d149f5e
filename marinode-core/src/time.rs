//! Time management for the polling loop
//!
//! The scheduler only needs a monotonic millisecond tick. The platform
//! counter is allowed to wrap (u32 milliseconds wrap after ~49.7 days),
//! so elapsed time is always computed with modular arithmetic, never
//! raw subtraction - a timer must not misfire across the wrap.

/// Monotonic milliseconds since boot; wraps at `u32::MAX`
pub type Ticks = u32;

/// Wraparound-safe elapsed time between two ticks
///
/// Correct for any pair of ticks less than one full wrap period apart.
#[inline]
pub fn ticks_elapsed(now: Ticks, earlier: Ticks) -> u32 {
    now.wrapping_sub(earlier)
}

/// Source of the monotonic millisecond tick
pub trait TickSource {
    /// Current tick in milliseconds
    fn ticks(&self) -> Ticks;
}

/// Fixed tick source for testing
#[derive(Debug, Clone)]
pub struct FixedClock {
    ticks: Ticks,
}

impl FixedClock {
    /// Create a clock frozen at the given tick
    pub fn new(ticks: Ticks) -> Self {
        Self { ticks }
    }

    /// Jump to an absolute tick
    pub fn set(&mut self, ticks: Ticks) {
        self.ticks = ticks;
    }

    /// Advance by `ms`, wrapping like the real counter
    pub fn advance(&mut self, ms: u32) {
        self.ticks = self.ticks.wrapping_add(ms);
    }
}

impl TickSource for FixedClock {
    fn ticks(&self) -> Ticks {
        self.ticks
    }
}

// Shared references work too: tests hand the same clock to the
// scheduler and the test body.
impl<T: TickSource + ?Sized> TickSource for &T {
    fn ticks(&self) -> Ticks {
        (**self).ticks()
    }
}

#[cfg(feature = "std")]
mod std_clock {
    use super::{TickSource, Ticks};
    use std::time::Instant;

    /// Monotonic tick source backed by [`std::time::Instant`]
    #[derive(Debug, Clone)]
    pub struct StdClock {
        boot: Instant,
    }

    impl StdClock {
        /// Create a clock starting at tick 0
        pub fn new() -> Self {
            Self {
                boot: Instant::now(),
            }
        }
    }

    impl Default for StdClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TickSource for StdClock {
        fn ticks(&self) -> Ticks {
            // Truncation wraps exactly like an embedded tick counter
            self.boot.elapsed().as_millis() as Ticks
        }
    }
}

#[cfg(feature = "std")]
pub use std_clock::StdClock;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = FixedClock::new(1000);
        assert_eq!(clock.ticks(), 1000);

        clock.advance(500);
        assert_eq!(clock.ticks(), 1500);
    }

    #[test]
    fn elapsed_across_wraparound() {
        let before = Ticks::MAX - 5;
        let after = before.wrapping_add(11);
        assert_eq!(after, 5);
        assert_eq!(ticks_elapsed(after, before), 11);
    }

    #[test]
    fn elapsed_with_no_wrap() {
        assert_eq!(ticks_elapsed(5000, 1500), 3500);
        assert_eq!(ticks_elapsed(1500, 1500), 0);
    }
}
