//! Transmit engine
//!
//! Shifts the oldest byte of the outbox onto the TX line, one bit per tick:
//! start bit low, eight data bits LSB first, stop bit high. The byte leaves
//! the outbox when its stop bit is written. The stop bit is held for a full
//! bit period before the engine either starts the next byte or parks.

use log::trace;

use crate::line::{LineIo, Pin, PinState};
use crate::queue::ByteQueue;
use crate::stats::Stats;

/// Last step written to the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
	/// No frame in flight
	Idle,
	/// Start bit written
	Start,
	/// Data bit `n` written
	Data(u8),
	/// Stop bit written and still being held
	Stop,
}

#[derive(Debug)]
pub struct Transmitter {
	state: TxState,
}

impl Default for Transmitter {
	fn default() -> Self { Self::new() }
}

impl Transmitter {
	pub const fn new() -> Self { Transmitter { state: TxState::Idle } }

	pub fn state(&self) -> TxState { self.state }

	/// Emit the next bit of the frame in flight
	///
	/// Returns `true` when the clock must be re-armed: while a frame is on the
	/// line, including the tick that writes its stop bit. The first tick that
	/// finds the outbox empty returns `false` and the engine parks. On a line
	/// error the step is not taken and is retried on the next tick.
	pub fn tick<L: LineIo>(
		&mut self,
		outbox: &mut ByteQueue,
		line: &mut L,
		pin: Pin,
		stats: &mut Stats,
	) -> Result<bool, L::Error> {
		let byte = match outbox.front() {
			Some(&byte) => byte,
			None => {
				self.state = TxState::Idle;
				return Ok(false);
			}
		};

		let next = match self.state {
			TxState::Idle | TxState::Stop => TxState::Start,
			TxState::Start => TxState::Data(0),
			TxState::Data(7) => TxState::Stop,
			TxState::Data(n) => TxState::Data(n + 1),
		};
		let level = match next {
			TxState::Start => PinState::Low,
			TxState::Data(n) => PinState::from(byte & (1 << n) != 0),
			TxState::Stop | TxState::Idle => PinState::High,
		};
		line.write_pin(pin, level)?;

		self.state = next;
		if next == TxState::Stop {
			outbox.pop_front();
			stats.frames_sent = stats.frames_sent.wrapping_add(1);
			trace!("tx frame {:#04x} on pin {}", byte, pin);
		}
		Ok(true)
	}
}
