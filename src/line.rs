//! Line-level I/O
//!
//! The engines never touch GPIO registers. They go through a [`LineIo`]
//! implementation that addresses pins by number, so the TX and RX lines can
//! be moved at runtime.

pub use embedded_hal::digital::v2::PinState;

/// Highest pin number accepted for either line
pub const MAX_PIN: u8 = 53;

/// Pin number as stored in the configuration
pub type Pin = u8;

/// Pin function select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    /// Input, also the reset default of a pin
    Input,
    /// Push-pull output
    Output,
}

/// GPIO access by pin number
///
/// Implementations are called from timer callback context and must not
/// block.
pub trait LineIo {
    /// Adapter error
    type Error;

    /// Select the function of `pin`
    fn set_pin_function(&mut self, pin: Pin, function: PinFunction) -> Result<(), Self::Error>;

    /// Drive `pin` to `level`
    fn write_pin(&mut self, pin: Pin, level: PinState) -> Result<(), Self::Error>;

    /// Sample the current level of `pin`
    fn read_pin(&mut self, pin: Pin) -> Result<PinState, Self::Error>;
}

/// Check a raw pin number coming from the control surface
pub(crate) fn checked_pin(pin: i32) -> Option<Pin> {
    if (0..=MAX_PIN as i32).contains(&pin) {
        Some(pin as Pin)
    } else {
        None
    }
}
