//! A timer-driven [bit banging] UART over two arbitrary GPIO lines.
//!
//! [bit banging]: https://en.wikipedia.org/wiki/Bit_banging
//!
//! Instead of blocking on a timer for every bit, each direction runs as a
//! state machine advanced by a periodic clock callback: the transmit engine
//! shifts queued bytes onto the TX line, the receive engine polls the RX line
//! and queues completed bytes. Framing is 8N1 at 1200 to 19200 baud.
//!
//! ## Usage
//!
//! ```ignore
//! let uart = SoftUart::new(Config::default(), gpio, tx_timer, rx_timer);
//! uart.start()?;
//!
//! // from the timer callbacks
//! uart.tx_tick();
//! uart.rx_tick();
//!
//! // from anywhere else
//! uart.submit(b"Hello, World!\r\n")?;
//! let received = uart.collect();
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

pub mod attr;
pub mod clock;
pub mod config;
pub mod error;
pub mod line;
pub mod queue;
pub mod receive;
pub mod serial;
pub mod stats;
pub mod transmit;

pub use crate::attr::Attribute;
pub use crate::clock::{bit_period, BitClock};
pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::line::{LineIo, Pin, PinFunction, PinState};
pub use crate::serial::SoftUart;
pub use crate::stats::Stats;
