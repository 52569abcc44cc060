//! Receive engine
//!
//! Polls the RX line once per tick. A low sample while idle is taken as the
//! start bit, the next eight samples are the data bits LSB first and the one
//! after that is the stop bit.
//!
//! There is no clock recovery: the sender's bit period must match the
//! configured baud rate and the start edge is assumed to fall on a tick
//! boundary. Drift beyond a fraction of a bit period slips bits.

use log::{trace, warn};

use crate::line::{LineIo, Pin, PinState};
use crate::queue::ByteQueue;
use crate::stats::Stats;

/// Next sample expected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
	/// Waiting for a start bit
	Idle,
	/// Data bit `n`
	Data(u8),
	/// Stop bit
	Stop,
}

/// A byte completed by a stop-bit sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
	pub byte: u8,
	/// Stop bit sampled high
	pub stop_ok: bool,
}

#[derive(Debug)]
pub struct Receiver {
	state: RxState,
	shift: u8,
}

impl Default for Receiver {
	fn default() -> Self { Self::new() }
}

impl Receiver {
	pub const fn new() -> Self { Receiver { state: RxState::Idle, shift: 0 } }

	pub fn state(&self) -> RxState { self.state }

	/// Feed one sample into the frame state machine
	pub fn sample(&mut self, level: PinState) -> Option<Frame> {
		match self.state {
			RxState::Idle => {
				if level == PinState::Low {
					self.shift = 0;
					self.state = RxState::Data(0);
				}
				None
			}
			RxState::Data(n) => {
				if level == PinState::High {
					self.shift |= 1 << n;
				}
				self.state = if n == 7 { RxState::Stop } else { RxState::Data(n + 1) };
				None
			}
			RxState::Stop => {
				self.state = RxState::Idle;
				Some(Frame { byte: self.shift, stop_ok: level == PinState::High })
			}
		}
	}

	/// Sample `pin` and deliver a completed frame to the inbox
	///
	/// A low stop bit is counted as a framing anomaly and the byte is still
	/// delivered. When the inbox is full the byte is dropped and counted as an
	/// overrun.
	pub fn tick<L: LineIo>(
		&mut self,
		inbox: &mut ByteQueue,
		line: &mut L,
		pin: Pin,
		stats: &mut Stats,
	) -> Result<(), L::Error> {
		let level = line.read_pin(pin)?;
		let frame = match self.sample(level) {
			Some(frame) => frame,
			None => return Ok(()),
		};

		if !frame.stop_ok {
			stats.framing_errors = stats.framing_errors.wrapping_add(1);
			warn!("rx framing error on pin {}, byte {:#04x}", pin, frame.byte);
		}
		if inbox.push_back(frame.byte).is_err() {
			stats.rx_overruns = stats.rx_overruns.wrapping_add(1);
			warn!("rx inbox full, dropped {:#04x}", frame.byte);
		} else {
			stats.frames_received = stats.frames_received.wrapping_add(1);
			trace!("rx frame {:#04x} on pin {}", frame.byte, pin);
		}
		Ok(())
	}
}
