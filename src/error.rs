//! Errors

use core::fmt;

/// Soft UART error
///
/// `E` is the error type of the [`LineIo`](crate::line::LineIo) adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Line adapter error
    Bus(E),
    /// The bit clock could not be armed
    Clock,
    /// Pin number outside 0..=53
    InvalidPin(i32),
    /// Baud rate outside 1200..=19200
    InvalidRate(i64),
    /// Flag other than 0 or 1
    InvalidValue(i64),
    /// Attribute text is not a decimal integer
    Malformed,
    /// Queue cannot take the whole submission, nothing was queued
    BufferOverflow {
        /// Free slots at the time of the call
        free: usize,
    },
}

impl<E> Error<E> {
    /// Out-of-range argument to a setter
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidPin(_) | Error::InvalidRate(_) | Error::InvalidValue(_) | Error::Malformed
        )
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "line i/o error: {:?}", e),
            Error::Clock => f.write_str("bit clock could not be armed"),
            Error::InvalidPin(pin) => write!(f, "invalid pin {}", pin),
            Error::InvalidRate(rate) => write!(f, "invalid baud rate {}", rate),
            Error::InvalidValue(value) => write!(f, "invalid value {}", value),
            Error::Malformed => f.write_str("not a decimal integer"),
            Error::BufferOverflow { free } => write!(f, "buffer overflow, {} bytes free", free),
        }
    }
}
