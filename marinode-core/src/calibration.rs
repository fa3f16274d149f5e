//! Calibration layer - raw electrical samples to physical units
//!
//! Pure functions with no side effects, safe to call from any context.
//! Division-by-zero cases return deterministic defaults instead of
//! panicking; a degenerate calibration is a configuration signal the
//! caller can detect (constant 0% level), not a crash.

use libm::roundf;

/// Convert a raw ADC sample to a voltage
///
/// Linear scale against the converter's resolution and reference
/// voltage. No clamping: the raw sample is assumed to be within the
/// ADC range by construction.
pub fn voltage_from_raw(raw: u16, resolution: u16, reference_voltage: f32) -> f32 {
    if resolution == 0 {
        return 0.0;
    }
    raw as f32 / resolution as f32 * reference_voltage
}

/// Convert a sender voltage to a tank level percentage
///
/// Linear interpolation between the empty-tank and full-tank voltages,
/// clamped to [0, 100]. A calibration with `max_v <= min_v` returns
/// exactly 0.0 for any voltage: the misconfiguration shows up as a
/// permanently empty tank rather than a division by zero.
pub fn level_from_voltage(voltage: f32, min_v: f32, max_v: f32) -> f32 {
    let span = max_v - min_v;
    if span <= 0.0 {
        return 0.0;
    }

    let level = (voltage - min_v) / span * 100.0;
    level.clamp(0.0, 100.0)
}

/// Round to one decimal place, the precision published for levels and
/// temperatures
pub fn round_to_tenth(value: f32) -> f32 {
    roundf(value * 10.0) / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn midpoint_sample_is_half_reference() {
        let v = voltage_from_raw(32768, 65535, 3.3);
        assert!((v - 1.65).abs() < 0.001);
    }

    #[test]
    fn zero_resolution_reads_zero() {
        assert_eq!(voltage_from_raw(1000, 0, 3.3), 0.0);
    }

    #[test]
    fn level_interpolates_between_bounds() {
        // 1.75V on a 0.5..3.0 sender sits exactly halfway
        let level = level_from_voltage(1.75, 0.5, 3.0);
        assert!((level - 50.0).abs() < 0.01);
    }

    #[test]
    fn level_clamps_outside_bounds() {
        assert_eq!(level_from_voltage(0.1, 0.5, 3.0), 0.0);
        assert_eq!(level_from_voltage(3.3, 0.5, 3.0), 100.0);
    }

    #[test]
    fn degenerate_calibration_reads_empty() {
        // max <= min is a misconfiguration, defined to return 0
        assert_eq!(level_from_voltage(1.0, 3.0, 3.0), 0.0);
        assert_eq!(level_from_voltage(1.0, 3.0, 0.5), 0.0);
        assert_eq!(level_from_voltage(-5.0, 2.0, 1.0), 0.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round_to_tenth(49.96), 50.0);
        assert_eq!(round_to_tenth(21.44), 21.4);
        assert_eq!(round_to_tenth(-0.07), -0.1);
    }

    proptest! {
        #[test]
        fn level_always_in_range(
            voltage in -10.0f32..10.0,
            min_v in 0.0f32..2.0,
            span in 0.01f32..3.0,
        ) {
            let level = level_from_voltage(voltage, min_v, min_v + span);
            prop_assert!((0.0..=100.0).contains(&level));
        }

        #[test]
        fn level_monotone_in_voltage(
            v_lo in -10.0f32..10.0,
            dv in 0.0f32..5.0,
            min_v in 0.0f32..2.0,
            span in 0.01f32..3.0,
        ) {
            let max_v = min_v + span;
            let lo = level_from_voltage(v_lo, min_v, max_v);
            let hi = level_from_voltage(v_lo + dv, min_v, max_v);
            prop_assert!(hi >= lo);
        }

        #[test]
        fn degenerate_calibration_always_zero(
            voltage in -100.0f32..100.0,
            min_v in -5.0f32..5.0,
            drop in 0.0f32..5.0,
        ) {
            prop_assert_eq!(level_from_voltage(voltage, min_v, min_v - drop), 0.0);
        }
    }
}
