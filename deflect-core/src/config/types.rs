//! Configuration type definitions
//!
//! [`ControllerConfig`] holds every tunable of the control loop. The
//! defaults are the values the sensor bands were calibrated against.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Open interval of smoothed sensor readings mapped to a named position
///
/// A reading belongs to the band when it lies strictly between `min`
/// and `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorBand {
    /// Exclusive lower bound
    pub min: u16,
    /// Exclusive upper bound
    pub max: u16,
}

impl SensorBand {
    /// Create a band from its exclusive bounds
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Check whether a smoothed reading falls inside the band
    pub fn contains(&self, reading: u16) -> bool {
        reading > self.min && reading < self.max
    }

    /// Check whether no integer reading can fall inside the band
    pub fn is_empty(&self) -> bool {
        self.max <= self.min.saturating_add(1)
    }

    /// Check whether some integer reading belongs to both bands
    pub fn overlaps(&self, other: &SensorBand) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let lo = self.min.max(other.min);
        let hi = self.max.min(other.max);
        hi > lo.saturating_add(1)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sampler window must hold at least one sample
    ZeroSampleWindow,
    /// A sensor band admits no reading
    EmptyBand,
    /// LEFT and RIGHT bands share readings
    OverlappingBands,
    /// Two named positions, or an idle target and a side, share an angle
    CoincidentPositions,
    /// A named position or idle excursion leaves 0..=max_angle_deg
    PositionOutOfRange,
}

/// Controller tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ControllerConfig {
    /// Resting angle (degrees)
    pub center_deg: u8,
    /// Distance of LEFT/RIGHT from center (degrees)
    pub swing_deg: u8,
    /// Highest angle the actuator accepts
    pub max_angle_deg: u8,
    /// Readings that select LEFT
    pub left_band: SensorBand,
    /// Readings that select RIGHT
    pub right_band: SensorBand,
    /// Raw samples averaged into one smoothed reading
    pub sample_window: u16,
    /// Fixed delay at the end of every loop iteration (ms)
    pub loop_delay_ms: u16,
    /// Idle timeout in units of one full sampler window of loop delays
    pub idle_timeout_multiplier: u16,
    /// Hold after the target position changed (ms)
    pub settle_ms: u16,
    /// Wiggle pulse amplitude around center (degrees)
    pub wiggle_deg: u8,
    /// Hold time of each wiggle pulse (ms)
    pub wiggle_hold_ms: u16,
    /// Offset from center proposed after each wiggle (degrees)
    pub idle_offset_deg: u8,
}

impl ControllerConfig {
    /// Reference tuning
    pub const fn reference() -> Self {
        Self {
            center_deg: 93,
            swing_deg: 35,
            max_angle_deg: 179,
            left_band: SensorBand::new(250, 450),
            right_band: SensorBand::new(550, 700),
            sample_window: 20,
            loop_delay_ms: 5,
            idle_timeout_multiplier: 5,
            settle_ms: 10,
            wiggle_deg: 5,
            wiggle_hold_ms: 50,
            idle_offset_deg: 3,
        }
    }

    /// CENTER position
    pub fn center(&self) -> u8 {
        self.center_deg
    }

    /// LEFT position (center + swing)
    pub fn left(&self) -> u8 {
        self.center_deg.saturating_add(self.swing_deg)
    }

    /// RIGHT position (center - swing)
    pub fn right(&self) -> u8 {
        self.center_deg.saturating_sub(self.swing_deg)
    }

    /// Time without a position change before the idle wiggle fires
    pub fn idle_timeout_ms(&self) -> u32 {
        self.idle_timeout_multiplier as u32 * self.sample_window as u32 * self.loop_delay_ms as u32
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_window == 0 {
            return Err(ConfigError::ZeroSampleWindow);
        }

        if self.left_band.is_empty() || self.right_band.is_empty() {
            return Err(ConfigError::EmptyBand);
        }

        if self.left_band.overlaps(&self.right_band) {
            return Err(ConfigError::OverlappingBands);
        }

        if self.swing_deg == 0 || self.idle_offset_deg == self.swing_deg {
            return Err(ConfigError::CoincidentPositions);
        }

        let max = self.max_angle_deg as i16;
        let center = self.center_deg as i16;
        let reach = (self.swing_deg.max(self.wiggle_deg).max(self.idle_offset_deg)) as i16;
        if center - reach < 0 || center + reach > max {
            return Err(ConfigError::PositionOutOfRange);
        }

        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_config_is_valid() {
        let config = ControllerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.left(), 128);
        assert_eq!(config.right(), 58);
        assert_eq!(config.idle_timeout_ms(), 500);
    }

    #[test]
    fn test_band_bounds_are_exclusive() {
        let band = SensorBand::new(250, 450);
        assert!(!band.contains(250));
        assert!(band.contains(251));
        assert!(band.contains(449));
        assert!(!band.contains(450));
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let config = ControllerConfig {
            right_band: SensorBand::new(400, 700),
            ..ControllerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::OverlappingBands));
    }

    #[test]
    fn test_touching_bands_do_not_overlap() {
        // (250,450) and (449,700) share no integer reading
        let a = SensorBand::new(250, 450);
        let b = SensorBand::new(449, 700);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&SensorBand::new(448, 700)));
    }

    #[test]
    fn test_empty_band_rejected() {
        let config = ControllerConfig {
            left_band: SensorBand::new(300, 301),
            ..ControllerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyBand));
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = ControllerConfig {
            sample_window: 0,
            ..ControllerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSampleWindow));
    }

    #[test]
    fn test_swing_past_range_rejected() {
        let config = ControllerConfig {
            center_deg: 160,
            ..ControllerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PositionOutOfRange));
    }

    #[test]
    fn test_zero_swing_rejected() {
        let config = ControllerConfig {
            swing_deg: 0,
            ..ControllerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::CoincidentPositions));
    }

    #[test]
    fn test_idle_target_on_side_rejected() {
        let config = ControllerConfig {
            swing_deg: 3,
            ..ControllerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::CoincidentPositions));
    }

    proptest! {
        #[test]
        fn prop_reference_bands_exclusive(reading in 0u16..=1023) {
            let config = ControllerConfig::default();
            let in_left = config.left_band.contains(reading);
            let in_right = config.right_band.contains(reading);
            prop_assert!(!(in_left && in_right));
        }

        #[test]
        fn prop_overlap_matches_membership(
            a_min in 0u16..100, a_len in 0u16..100,
            b_min in 0u16..100, b_len in 0u16..100,
        ) {
            let a = SensorBand::new(a_min, a_min + a_len);
            let b = SensorBand::new(b_min, b_min + b_len);
            let shared = (0u16..=200).any(|v| a.contains(v) && b.contains(v));
            prop_assert_eq!(a.overlaps(&b), shared);
        }

        #[test]
        fn prop_valid_config_has_distinct_positions(
            swing in 0u8..=60, idle_offset in 0u8..=10,
        ) {
            let config = ControllerConfig {
                swing_deg: swing,
                idle_offset_deg: idle_offset,
                ..ControllerConfig::default()
            };
            if config.validate().is_ok() {
                let (l, c, r) = (config.left(), config.center(), config.right());
                prop_assert!(l != c && c != r && l != r);
                prop_assert_ne!(c + idle_offset, l);
                prop_assert_ne!(c - idle_offset, r);
            }
        }
    }
}
