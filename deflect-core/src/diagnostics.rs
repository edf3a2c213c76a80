//! Diagnostic lines reported over the serial console
//!
//! The control logic produces typed values; rendering to text happens
//! through [`core::fmt::Display`] so sinks can format into a fixed
//! buffer without allocation.

use core::fmt;

use heapless::Vec;

use crate::decision::Side;

/// Maximum digits of one absolute-position entry
pub const MAX_DIGITS: usize = 3;

/// One diagnostic line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// Controller started
    Ready,
    /// Smoothed sensor reading (only while echo is enabled)
    Sensor { value: u16 },
    /// Confirmed transition into a side position
    Transition {
        side: Side,
        total_left: u32,
        total_right: u32,
    },
    /// Digit buffer after a keystroke and the position it produced
    DigitEcho {
        digits: Vec<u8, MAX_DIGITS>,
        position: u8,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Ready => f.write_str("Ready"),
            Diagnostic::Sensor { value } => write!(f, "Sensor: {}", value),
            Diagnostic::Transition {
                side,
                total_left,
                total_right,
            } => {
                let label = match side {
                    Side::Left => "left  ",
                    Side::Right => "right ",
                };
                write!(f, "{}{} - {}", label, total_left, total_right)
            }
            Diagnostic::DigitEcho { digits, position } => {
                write!(f, "{} buff:", digits.len())?;
                for digit in digits {
                    write!(f, " {}", digit)?;
                }
                write!(f, " => {}", position)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_lines() {
        let left = Diagnostic::Transition {
            side: Side::Left,
            total_left: 3,
            total_right: 1,
        };
        let right = Diagnostic::Transition {
            side: Side::Right,
            total_left: 3,
            total_right: 2,
        };
        assert_eq!(left.to_string(), "left  3 - 1");
        assert_eq!(right.to_string(), "right 3 - 2");
    }

    #[test]
    fn test_digit_echo_line() {
        let digits: Vec<u8, MAX_DIGITS> = Vec::from_slice(&[1, 8, 5]).unwrap();
        let echo = Diagnostic::DigitEcho {
            digits,
            position: 179,
        };
        assert_eq!(echo.to_string(), "3 buff: 1 8 5 => 179");
    }

    #[test]
    fn test_sensor_and_ready_lines() {
        assert_eq!(Diagnostic::Sensor { value: 300 }.to_string(), "Sensor: 300");
        assert_eq!(Diagnostic::Ready.to_string(), "Ready");
    }
}
