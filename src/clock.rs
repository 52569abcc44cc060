//! Bit clock
//!
//! Each engine owns one single-shot clock and re-arms it at the end of every
//! tick, which turns it into a periodic tick at the bit period.

use core::time::Duration;

/// Single-shot timer service driving one engine
pub trait BitClock {
    /// Clock service error
    type Error;

    /// Fire the engine's tick once after `delay`, replacing any pending firing
    fn schedule_once(&mut self, delay: Duration) -> Result<(), Self::Error>;

    /// Disarm the clock
    ///
    /// Must be synchronous: once this returns no tick of this clock is
    /// running or will run.
    fn cancel(&mut self);
}

/// Bit period for `baud_rate`, truncated to whole microseconds
///
/// 9600 baud gives 104 µs.
pub fn bit_period(baud_rate: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(baud_rate))
}
