//! Serial console traits

use crate::diagnostics::Diagnostic;

/// Non-blocking source of command bytes
pub trait ByteSource {
    /// Return the next byte if one is already available
    ///
    /// Must never wait for input.
    fn try_read_byte(&mut self) -> Option<u8>;
}

/// Consumer of human-readable diagnostic lines
pub trait DiagnosticSink {
    /// Report one diagnostic line
    fn emit(&mut self, diagnostic: &Diagnostic);
}
