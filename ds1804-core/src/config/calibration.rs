//! Wiper calibration and range mapping
//!
//! A [`Calibration`] ties the discrete tap index of the wiper to the
//! resistance it produces. All conversions clamp their input first, so
//! every result is inside the calibrated range.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of steps along the DS1804 resistive element (taps `0..=99`)
pub const DS1804_STEPS: u8 = 99;

/// Linearly rescale `x` from `[in_min, in_max]` to `[out_min, out_max]`
///
/// Integer arithmetic truncates toward zero, so the result is the floor of
/// the proportional placement. `x` is expected to already lie in the input
/// range and `out_max >= out_min`. A degenerate input range maps
/// everything to `out_min`.
pub const fn map_range(x: u32, in_min: u32, in_max: u32, out_min: u32, out_max: u32) -> u32 {
    if in_max <= in_min {
        return out_min;
    }
    let num = (x - in_min) as u64 * (out_max - out_min) as u64;
    let den = (in_max - in_min) as u64;
    (num / den) as u32 + out_min
}

/// Calibration of a stepped potentiometer
///
/// Both values are fixed for the lifetime of a driver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    /// End-to-end resistance of the element in ohms
    pub max_resistance: u32,
    /// Number of equal increments the element is divided into
    pub step_count: u8,
}

impl Calibration {
    /// Create a calibration for a DS1804 with the given end-to-end resistance
    pub const fn new(max_resistance: u32) -> Self {
        Self {
            max_resistance,
            step_count: DS1804_STEPS,
        }
    }

    /// Clamp a tap index into `[0, step_count]`
    pub const fn clamp_position(&self, position: u8) -> u8 {
        if position > self.step_count {
            self.step_count
        } else {
            position
        }
    }

    /// Clamp a resistance into `[0, max_resistance]`
    pub const fn clamp_resistance(&self, resistance: u32) -> u32 {
        if resistance > self.max_resistance {
            self.max_resistance
        } else {
            resistance
        }
    }

    /// Tap index for a requested resistance
    ///
    /// Rounds down to the tap at or below the request.
    pub const fn resistance_to_wiper_position(&self, resistance: u32) -> u8 {
        let resistance = self.clamp_resistance(resistance);
        map_range(resistance, 0, self.max_resistance, 0, self.step_count as u32) as u8
    }

    /// Resistance produced at a tap index
    pub const fn wiper_position_to_resistance(&self, position: u8) -> u32 {
        let position = self.clamp_position(position);
        map_range(position as u32, 0, self.step_count as u32, 0, self.max_resistance)
    }

    /// Nearest achievable resistance for a request, given discretization
    pub const fn resistance_to_actual_resistance(&self, resistance: u32) -> u32 {
        self.wiper_position_to_resistance(self.resistance_to_wiper_position(resistance))
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new(super::DS1804_TEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_map_range() {
        assert_eq!(map_range(0, 0, 100, 0, 10), 0);
        assert_eq!(map_range(55, 0, 100, 0, 10), 5);
        assert_eq!(map_range(100, 0, 100, 0, 10), 10);
        assert_eq!(map_range(5, 5, 5, 3, 10), 3);
    }

    #[test]
    fn test_ten_k_mapping() {
        let cal = Calibration::new(10_000);

        assert_eq!(cal.resistance_to_wiper_position(0), 0);
        assert_eq!(cal.resistance_to_wiper_position(5_000), 49);
        assert_eq!(cal.resistance_to_wiper_position(10_000), 99);

        assert_eq!(cal.wiper_position_to_resistance(0), 0);
        assert_eq!(cal.wiper_position_to_resistance(50), 5_050);
        assert_eq!(cal.wiper_position_to_resistance(99), 10_000);

        assert_eq!(cal.resistance_to_actual_resistance(5_000), 4_949);
    }

    #[test]
    fn test_out_of_range_inputs_clamp() {
        let cal = Calibration::new(10_000);

        assert_eq!(cal.resistance_to_wiper_position(20_000), 99);
        assert_eq!(cal.resistance_to_wiper_position(u32::MAX), 99);
        assert_eq!(cal.wiper_position_to_resistance(255), 10_000);
        assert_eq!(cal.clamp_position(200), 99);
    }

    #[test]
    fn test_large_resistance_does_not_overflow() {
        let cal = Calibration::new(u32::MAX);

        assert_eq!(cal.wiper_position_to_resistance(99), u32::MAX);
        assert_eq!(cal.resistance_to_wiper_position(u32::MAX), 99);
    }

    #[test]
    fn test_zero_resistance_calibration() {
        let cal = Calibration::new(0);

        assert_eq!(cal.resistance_to_wiper_position(1_000), 0);
        assert_eq!(cal.wiper_position_to_resistance(50), 0);
    }

    proptest! {
        #[test]
        fn position_round_trip_within_one_step(
            max in 99u32..=1_000_000,
            position in 0u8..=DS1804_STEPS,
        ) {
            let cal = Calibration::new(max);
            let back = cal.resistance_to_wiper_position(cal.wiper_position_to_resistance(position));
            prop_assert!(back <= position);
            prop_assert!(position - back <= 1);
        }

        #[test]
        fn actual_resistance_within_one_step(
            max in 1u32..=1_000_000,
            frac in 0.0f64..=1.0,
        ) {
            let cal = Calibration::new(max);
            let requested = (max as f64 * frac) as u32;
            let actual = cal.resistance_to_actual_resistance(requested);
            prop_assert!(actual <= requested);
            let step = max.div_ceil(DS1804_STEPS as u32);
            prop_assert!(requested - actual <= step);
        }

        #[test]
        fn conversions_stay_in_range(max in any::<u32>(), r in any::<u32>(), p in any::<u8>()) {
            let cal = Calibration::new(max);
            prop_assert!(cal.resistance_to_wiper_position(r) <= cal.step_count);
            prop_assert!(cal.wiper_position_to_resistance(p) <= cal.max_resistance);
        }
    }
}
