//! Serial command interpreter
//!
//! Byte-at-a-time protocol with no line framing:
//!
//! | Byte | Effect |
//! |---|---|
//! | `l` / `c` / `r` | Go to LEFT / CENTER / RIGHT immediately |
//! | `v` | Toggle the sensor echo |
//! | `0`-`9`, `:` | Append a digit and apply the value typed so far |
//! | anything else | Apply pending digits once more and clear them |
//!
//! Every digit applies the value typed so far, so `1`, `8`, `5` moves
//! to 1, then 18, then 185 (clamped). The buffer clears after the third
//! digit. `:` is accepted as a digit worth ten; the digit range check
//! has always been one past `9` and existing operators rely on it.

use heapless::Vec;

use crate::diagnostics::MAX_DIGITS;

/// Highest byte accepted as a digit
const LAST_DIGIT_BYTE: u8 = b'9' + 1;

/// Positions addressable by a single command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NamedPosition {
    Left,
    Center,
    Right,
}

/// A decoded command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Jump to a named position
    Goto(NamedPosition),
    /// Flip the sensor echo flag
    ToggleEcho,
    /// Absolute position from the digits entered so far
    Absolute {
        digits: Vec<u8, MAX_DIGITS>,
        position: u8,
    },
}

/// Command byte decoder
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    /// Digits of the entry in progress, most significant first
    digits: Vec<u8, MAX_DIGITS>,
    /// Ceiling applied to absolute positions
    max_angle: u8,
}

impl CommandInterpreter {
    /// Create an interpreter clamping absolute positions to `max_angle`
    pub fn new(max_angle: u8) -> Self {
        Self {
            digits: Vec::new(),
            max_angle,
        }
    }

    /// Digits of the entry in progress
    pub fn pending_digits(&self) -> &[u8] {
        &self.digits
    }

    /// Decode one byte
    ///
    /// Returns `None` for bytes that have no effect.
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        let named = match byte {
            b'l' => Some(NamedPosition::Left),
            b'c' => Some(NamedPosition::Center),
            b'r' => Some(NamedPosition::Right),
            _ => None,
        };

        if let Some(position) = named {
            self.digits.clear();
            return Some(Command::Goto(position));
        }

        if byte == b'v' {
            self.digits.clear();
            return Some(Command::ToggleEcho);
        }

        if (b'0'..=LAST_DIGIT_BYTE).contains(&byte) {
            // Never full here: the buffer clears on reaching MAX_DIGITS
            let _ = self.digits.push(byte - b'0');
            let command = self.absolute();
            if self.digits.is_full() {
                self.digits.clear();
            }
            return Some(command);
        }

        if self.digits.is_empty() {
            return None;
        }

        let command = self.absolute();
        self.digits.clear();
        Some(command)
    }

    /// Interpret the buffer as a decimal literal, clamped to the ceiling
    fn absolute(&self) -> Command {
        let value = self
            .digits
            .iter()
            .fold(0u16, |acc, &digit| acc * 10 + digit as u16);

        let position = if value > self.max_angle as u16 {
            self.max_angle
        } else {
            value as u8
        };

        Command::Absolute {
            digits: self.digits.clone(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn position_of(command: Option<Command>) -> u8 {
        match command {
            Some(Command::Absolute { position, .. }) => position,
            other => panic!("expected absolute command, got {:?}", other),
        }
    }

    #[test]
    fn test_named_commands() {
        let mut interp = CommandInterpreter::new(179);
        assert_eq!(interp.feed(b'l'), Some(Command::Goto(NamedPosition::Left)));
        assert_eq!(interp.feed(b'c'), Some(Command::Goto(NamedPosition::Center)));
        assert_eq!(interp.feed(b'r'), Some(Command::Goto(NamedPosition::Right)));
        assert_eq!(interp.feed(b'v'), Some(Command::ToggleEcho));
    }

    #[test]
    fn test_each_digit_applies_value_so_far() {
        let mut interp = CommandInterpreter::new(179);
        assert_eq!(position_of(interp.feed(b'1')), 1);
        assert_eq!(position_of(interp.feed(b'8')), 18);
        assert_eq!(position_of(interp.feed(b'5')), 179);
        assert!(interp.pending_digits().is_empty());
    }

    #[test]
    fn test_third_digit_resets_buffer() {
        let mut interp = CommandInterpreter::new(179);
        interp.feed(b'0');
        interp.feed(b'4');
        assert_eq!(position_of(interp.feed(b'5')), 45);
        assert_eq!(position_of(interp.feed(b'7')), 7);
    }

    #[test]
    fn test_digit_echo_contents() {
        let mut interp = CommandInterpreter::new(179);
        interp.feed(b'9');
        match interp.feed(b'0') {
            Some(Command::Absolute { digits, position }) => {
                assert_eq!(&digits[..], &[9, 0]);
                assert_eq!(position, 90);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_named_command_clears_entry() {
        let mut interp = CommandInterpreter::new(179);
        interp.feed(b'4');
        interp.feed(b'r');
        assert!(interp.pending_digits().is_empty());
        assert_eq!(position_of(interp.feed(b'2')), 2);

        interp.feed(b'v');
        assert!(interp.pending_digits().is_empty());
    }

    #[test]
    fn test_unknown_byte_ignored_when_idle() {
        let mut interp = CommandInterpreter::new(179);
        assert_eq!(interp.feed(b'x'), None);
        assert_eq!(interp.feed(b'\n'), None);
        assert!(interp.pending_digits().is_empty());
    }

    #[test]
    fn test_terminator_reapplies_and_clears() {
        let mut interp = CommandInterpreter::new(179);
        interp.feed(b'4');
        interp.feed(b'2');
        assert_eq!(position_of(interp.feed(b'\n')), 42);
        assert!(interp.pending_digits().is_empty());
        assert_eq!(interp.feed(b'\n'), None);
    }

    #[test]
    fn test_colon_counts_as_ten() {
        let mut interp = CommandInterpreter::new(179);
        assert_eq!(position_of(interp.feed(b':')), 10);
        assert_eq!(position_of(interp.feed(b'1')), 101);
    }

    #[test]
    fn test_byte_after_colon_is_not_a_digit() {
        let mut interp = CommandInterpreter::new(179);
        assert_eq!(interp.feed(b';'), None);
        assert_eq!(interp.feed(b'/'), None);
    }

    proptest! {
        #[test]
        fn prop_three_digit_clamp(a in 0u8..=9, b in 0u8..=9, c in 0u8..=9) {
            let mut interp = CommandInterpreter::new(179);
            interp.feed(b'0' + a);
            interp.feed(b'0' + b);
            let position = position_of(interp.feed(b'0' + c));
            let value = a as u16 * 100 + b as u16 * 10 + c as u16;
            if value >= 180 {
                prop_assert_eq!(position, 179);
            } else {
                prop_assert_eq!(position as u16, value);
            }
        }

        #[test]
        fn prop_positions_never_exceed_ceiling(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut interp = CommandInterpreter::new(179);
            for byte in bytes {
                if let Some(Command::Absolute { position, .. }) = interp.feed(byte) {
                    prop_assert!(position <= 179);
                }
                prop_assert!(interp.pending_digits().len() < MAX_DIGITS);
            }
        }
    }
}
