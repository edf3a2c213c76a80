//! Serial console
//!
//! The two UART halves serve the two roles the controller needs: the
//! receive half is a non-blocking source of command bytes, the transmit
//! half a sink for diagnostic lines. Lines are rendered into a fixed
//! buffer and terminated with CRLF.

use core::fmt::Write as _;

use deflect_core::diagnostics::Diagnostic;
use deflect_core::traits::{ByteSource, DiagnosticSink};
use embedded_io::{Read, ReadReady, Write};
use heapless::String;

/// Longest rendered diagnostic line (without terminator)
pub const MAX_LINE_LEN: usize = 64;

/// Errors that can occur when writing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// Rendered line did not fit the line buffer
    LineTooLong,
    /// Transmitter reported an error
    WriteFailed,
}

/// Command byte input over a UART receive half
pub struct SerialInput<R> {
    rx: R,
}

impl<R: Read + ReadReady> SerialInput<R> {
    /// Wrap a receive half
    pub fn new(rx: R) -> Self {
        Self { rx }
    }
}

impl<R: Read + ReadReady> ByteSource for SerialInput<R> {
    fn try_read_byte(&mut self) -> Option<u8> {
        if !matches!(self.rx.read_ready(), Ok(true)) {
            return None;
        }

        let mut byte = [0u8; 1];
        match self.rx.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}

/// Diagnostic line output over a UART transmit half
pub struct SerialOutput<W> {
    tx: W,
    /// Lines that could not be written
    dropped_lines: u32,
}

impl<W: Write> SerialOutput<W> {
    /// Wrap a transmit half
    pub fn new(tx: W) -> Self {
        Self {
            tx,
            dropped_lines: 0,
        }
    }

    /// Render and transmit one diagnostic line
    pub fn write_line(&mut self, diagnostic: &Diagnostic) -> Result<(), ConsoleError> {
        let mut line: String<MAX_LINE_LEN> = String::new();
        write!(line, "{}", diagnostic).map_err(|_| ConsoleError::LineTooLong)?;

        self.tx
            .write_all(line.as_bytes())
            .map_err(|_| ConsoleError::WriteFailed)?;
        self.tx
            .write_all(b"\r\n")
            .map_err(|_| ConsoleError::WriteFailed)?;
        Ok(())
    }

    /// Lines lost to write errors since creation
    pub fn dropped_lines(&self) -> u32 {
        self.dropped_lines
    }
}

impl<W: Write> DiagnosticSink for SerialOutput<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        if self.write_line(diagnostic).is_err() {
            self.dropped_lines = self.dropped_lines.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_io::{ErrorKind, ErrorType};
    use std::collections::VecDeque;

    struct MockRx {
        pending: VecDeque<u8>,
    }

    impl ErrorType for MockRx {
        type Error = Infallible;
    }

    impl Read for MockRx {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut n = 0;
            while n < buf.len() {
                match self.pending.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl ReadReady for MockRx {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.pending.is_empty())
        }
    }

    #[derive(Default)]
    struct MockTx {
        written: std::vec::Vec<u8>,
        fail: bool,
    }

    impl ErrorType for MockTx {
        type Error = ErrorKind;
    }

    impl Write for MockTx {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn input(bytes: &[u8]) -> SerialInput<MockRx> {
        SerialInput::new(MockRx {
            pending: bytes.iter().copied().collect(),
        })
    }

    #[test]
    fn test_reads_one_byte_per_call() {
        let mut input = input(b"lr");
        assert_eq!(input.try_read_byte(), Some(b'l'));
        assert_eq!(input.try_read_byte(), Some(b'r'));
        assert_eq!(input.try_read_byte(), None);
    }

    #[test]
    fn test_lines_are_crlf_terminated() {
        let mut output = SerialOutput::new(MockTx::default());
        output.emit(&Diagnostic::Ready);
        output.emit(&Diagnostic::Sensor { value: 262 });
        assert_eq!(output.tx.written, b"Ready\r\nSensor: 262\r\n");
    }

    #[test]
    fn test_write_failure_counted() {
        let mut output = SerialOutput::new(MockTx {
            written: std::vec::Vec::new(),
            fail: true,
        });
        assert_eq!(
            output.write_line(&Diagnostic::Ready),
            Err(ConsoleError::WriteFailed)
        );
        output.emit(&Diagnostic::Ready);
        assert_eq!(output.dropped_lines(), 1);
    }
}
