//! Position decision engine
//!
//! Owns the target position and decides where the actuator goes next.
//! Sensor-driven proposals only take effect after two consecutive
//! proposals agree, which suppresses single-reading noise. After a side
//! position is reached the engine insists on returning to center before
//! another side can be confirmed.

use crate::config::ControllerConfig;

/// Named side positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

/// What the idle handler did when it fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleAction {
    /// Angles written straight to the actuator, in order
    pub pulses: [u8; 2],
    /// Position proposed (and confirmed) after the pulses
    pub target: u8,
    /// Side entered by the confirmation, if the target is a side position
    pub transition: Option<Side>,
}

/// Position decision state machine
#[derive(Debug, Clone)]
pub struct PositionEngine {
    config: ControllerConfig,
    /// Current target position
    pos: u8,
    /// Value of the previous proposal, if any
    pending: Option<u8>,
    /// Time of the last change of `pos`
    last_change_ms: u32,
    /// Confirmed transitions into LEFT
    total_left: u32,
    /// Confirmed transitions into RIGHT
    total_right: u32,
    /// Perturbation added to the written angle
    ///
    /// Cleared on entry to a side. The idle offset is not stored here; it
    /// travels through the proposed idle target instead, so in the normal
    /// loop this stays zero and the written angle equals `pos`.
    offset: i8,
    /// Sign of the next idle offset
    idle_sign: i8,
}

impl PositionEngine {
    /// Create an engine resting at center
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            pos: config.center(),
            config,
            pending: None,
            last_change_ms: 0,
            total_left: 0,
            total_right: 0,
            offset: 0,
            idle_sign: 1,
        }
    }

    /// Current target position
    pub fn position(&self) -> u8 {
        self.pos
    }

    /// Current perturbation of the written angle
    pub fn offset(&self) -> i8 {
        self.offset
    }

    /// Proposal awaiting confirmation
    pub fn pending(&self) -> Option<u8> {
        self.pending
    }

    /// Confirmed transitions into LEFT and RIGHT
    pub fn totals(&self) -> (u32, u32) {
        (self.total_left, self.total_right)
    }

    /// Time of the last change of the target position
    pub fn last_change_ms(&self) -> u32 {
        self.last_change_ms
    }

    /// Angle to write: position plus offset, kept within the actuator range
    pub fn output_angle(&self) -> u8 {
        let angle = self.pos as i16 + self.offset as i16;
        angle.clamp(0, self.config.max_angle_deg as i16) as u8
    }

    /// Propose a position
    ///
    /// The proposal takes effect only when it equals the previous one.
    /// Returns the side entered when the confirmation moved `pos` into
    /// LEFT or RIGHT.
    pub fn propose(&mut self, value: u8, now_ms: u32) -> Option<Side> {
        if self.pending != Some(value) {
            self.pending = Some(value);
            return None;
        }

        if self.pos == value {
            return None;
        }

        self.pos = value;
        self.last_change_ms = now_ms;

        let side = if value == self.config.left() {
            self.total_left = self.total_left.wrapping_add(1);
            Side::Left
        } else if value == self.config.right() {
            self.total_right = self.total_right.wrapping_add(1);
            Side::Right
        } else {
            return None;
        };

        self.offset = 0;
        Some(side)
    }

    /// Map a smoothed sensor reading to a band position
    pub fn classify(&self, reading: u16) -> u8 {
        if self.config.left_band.contains(reading) {
            self.config.left()
        } else if self.config.right_band.contains(reading) {
            self.config.right()
        } else {
            self.config.center()
        }
    }

    /// Feed a smoothed sensor reading through the proposal path
    ///
    /// Away from center the only proposal is center; side bands are
    /// evaluated only once the position is back at center.
    pub fn on_reading(&mut self, reading: u16, now_ms: u32) -> Option<Side> {
        let proposal = if self.pos != self.config.center() {
            self.config.center()
        } else {
            self.classify(reading)
        };
        self.propose(proposal, now_ms)
    }

    /// Run the idle policy
    ///
    /// Fires once the position has not changed for the idle timeout.
    /// The proposal is made twice so it is confirmed immediately, and
    /// the offset direction flips on every firing.
    pub fn on_idle(&mut self, now_ms: u32) -> Option<IdleAction> {
        if now_ms.wrapping_sub(self.last_change_ms) < self.config.idle_timeout_ms() {
            return None;
        }

        let center = self.config.center();
        let pulses = [
            center.saturating_add(self.config.wiggle_deg),
            center.saturating_sub(self.config.wiggle_deg),
        ];

        let target = if self.idle_sign > 0 {
            center.saturating_add(self.config.idle_offset_deg)
        } else {
            center.saturating_sub(self.config.idle_offset_deg)
        };

        self.propose(target, now_ms);
        let transition = self.propose(target, now_ms);
        self.idle_sign = -self.idle_sign;

        Some(IdleAction {
            pulses,
            target,
            transition,
        })
    }

    /// Set the position directly, skipping confirmation
    ///
    /// Used for trusted serial overrides. A change of value counts as
    /// activity for the idle timeout.
    pub fn override_position(&mut self, value: u8, now_ms: u32) {
        if self.pos != value {
            self.last_change_ms = now_ms;
        }
        self.pos = value;
    }
}
