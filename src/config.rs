//! Port configuration

use crate::error::Error;
use crate::line::{checked_pin, Pin};

/// Lowest accepted baud rate
pub const MIN_BAUD_RATE: u32 = 1200;
/// Highest accepted baud rate
pub const MAX_BAUD_RATE: u32 = 19200;

/// Default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 4800;
/// Default TX pin
pub const DEFAULT_TX_PIN: Pin = 4;
/// Default RX pin
pub const DEFAULT_RX_PIN: Pin = 2;

/// Settings shared by both engines
///
/// Both engines read it on every tick, so a change takes effect on the next
/// tick. A new baud rate takes effect at the next re-arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Bits per second, shared by TX and RX
    pub baud_rate: u32,
    /// Output line
    pub tx_pin: Pin,
    /// Input line
    pub rx_pin: Pin,
    /// Deliver submitted bytes straight to the inbox
    pub loopback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            baud_rate: DEFAULT_BAUD_RATE,
            tx_pin: DEFAULT_TX_PIN,
            rx_pin: DEFAULT_RX_PIN,
            loopback: false,
        }
    }
}

impl Config {
    /// Build a validated configuration with loopback off
    pub fn new<E>(baud_rate: i64, tx_pin: i32, rx_pin: i32) -> Result<Self, Error<E>> {
        Ok(Config {
            baud_rate: checked_baud_rate(baud_rate)?,
            tx_pin: checked_pin(tx_pin).ok_or(Error::InvalidPin(tx_pin))?,
            rx_pin: checked_pin(rx_pin).ok_or(Error::InvalidPin(rx_pin))?,
            loopback: false,
        })
    }

    /// Same configuration with loopback set
    pub fn with_loopback(self, loopback: bool) -> Self {
        Config { loopback, ..self }
    }
}

pub(crate) fn checked_baud_rate<E>(rate: i64) -> Result<u32, Error<E>> {
    if (i64::from(MIN_BAUD_RATE)..=i64::from(MAX_BAUD_RATE)).contains(&rate) {
        Ok(rate as u32)
    } else {
        Err(Error::InvalidRate(rate))
    }
}

pub(crate) fn checked_flag<E>(flag: i64) -> Result<bool, Error<E>> {
    match flag {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::InvalidValue(other)),
    }
}
