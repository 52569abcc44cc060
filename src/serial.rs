//! Serial communication (UART) driven by timer callbacks
//!
//! This implementation consumes the following resources:
//! - A [`LineIo`] adapter giving access to GPIO pins by number
//! - Two single-shot [`BitClock`]s, one per direction, re-armed at every tick
//!
//! The host calls [`SoftUart::tx_tick`] and [`SoftUart::rx_tick`] from the
//! respective clock callbacks. Everything else is the control surface and may
//! be called from any other context: all state sits behind one
//! critical-section mutex, and every tick and every control operation is a
//! single short critical section.
//!
//! Framing is 8N1. Both directions share one baud rate.

use core::cell::RefCell;
use core::fmt::Debug;
use core::time::Duration;

use critical_section::Mutex;
use embedded_hal::serial;
use log::{debug, error};

use crate::clock::{bit_period, BitClock};
use crate::config::{checked_baud_rate, checked_flag, Config};
use crate::error::Error;
use crate::line::{checked_pin, LineIo, Pin, PinFunction, PinState};
use crate::queue::{append_all, drain, ByteQueue, Bytes};
use crate::receive::Receiver;
use crate::stats::Stats;
use crate::transmit::{Transmitter, TxState};

struct Inner<L, C> {
	config: Config,
	line: L,
	tx_clock: C,
	rx_clock: C,
	tx: Transmitter,
	rx: Receiver,
	outbox: ByteQueue,
	inbox: ByteQueue,
	stats: Stats,
	running: bool,
	tx_armed: bool,
}

impl<L, C> Inner<L, C>
where
	L: LineIo,
	L::Error: Debug,
	C: BitClock,
{
	fn bring_up(&mut self) -> Result<(), Error<L::Error>> {
		let Config { tx_pin, rx_pin, .. } = self.config;
		self.line.set_pin_function(tx_pin, PinFunction::Output).map_err(Error::Bus)?;
		self.line.write_pin(tx_pin, PinState::High).map_err(Error::Bus)?;
		self.line.set_pin_function(rx_pin, PinFunction::Input).map_err(Error::Bus)?;
		self.rx_clock.schedule_once(Duration::ZERO).map_err(|_| Error::Clock)?;
		if !self.outbox.is_empty() {
			self.tx_clock.schedule_once(Duration::ZERO).map_err(|_| Error::Clock)?;
			self.tx_armed = true;
		}
		self.running = true;
		Ok(())
	}

	fn tear_down(&mut self) {
		self.tx_clock.cancel();
		self.rx_clock.cancel();
		self.running = false;
		self.tx_armed = false;
		// a frame cut short here is restarted from its start bit
		self.tx = Transmitter::new();
		self.rx = Receiver::new();
		let tx_pin = self.config.tx_pin;
		if let Err(e) = self.line.set_pin_function(tx_pin, PinFunction::Input) {
			error!("failed to release tx pin {}: {:?}", tx_pin, e);
		}
	}

	fn period(&self) -> Duration { bit_period(self.config.baud_rate) }
}

/// Software UART over two GPIO lines
pub struct SoftUart<L, C> {
	inner: Mutex<RefCell<Inner<L, C>>>,
}

impl<L, C> SoftUart<L, C> {
	pub fn new(config: Config, line: L, tx_clock: C, rx_clock: C) -> Self {
		SoftUart {
			inner: Mutex::new(RefCell::new(Inner {
				config,
				line,
				tx_clock,
				rx_clock,
				tx: Transmitter::new(),
				rx: Receiver::new(),
				outbox: ByteQueue::new(),
				inbox: ByteQueue::new(),
				stats: Stats::default(),
				running: false,
				tx_armed: false,
			})),
		}
	}

	/// Give back the adapter and the clocks
	///
	/// Call [`stop`](Self::stop) first, or the clocks are returned armed.
	pub fn release(self) -> (L, C, C) {
		let inner = self.inner.into_inner().into_inner();
		(inner.line, inner.tx_clock, inner.rx_clock)
	}

	#[inline]
	fn with<R>(&self, f: impl FnOnce(&mut Inner<L, C>) -> R) -> R {
		critical_section::with(|cs| {
			let mut inner = self.inner.borrow_ref_mut(cs);
			f(&mut *inner)
		})
	}
}

impl<L, C> SoftUart<L, C>
where
	L: LineIo,
	L::Error: Debug,
	C: BitClock,
{
	/// Program the pins and start polling the RX line
	///
	/// TX becomes an output idling high, RX an input. The RX clock is armed
	/// immediately, and so is the TX clock if bytes were submitted before
	/// start. On failure everything acquired so far is released again.
	pub fn start(&self) -> Result<(), Error<L::Error>> {
		self.with(|inner| {
			if inner.running {
				return Ok(());
			}
			match inner.bring_up() {
				Ok(()) => {
					debug!(
						"soft uart up: {} baud, tx pin {}, rx pin {}",
						inner.config.baud_rate, inner.config.tx_pin, inner.config.rx_pin
					);
					Ok(())
				}
				Err(e) => {
					error!("soft uart start failed: {:?}", e);
					inner.tear_down();
					Err(e)
				}
			}
		})
	}

	/// Cancel both clocks and return the TX pin to its default function
	pub fn stop(&self) {
		self.with(|inner| {
			if inner.running {
				inner.tear_down();
				debug!("soft uart stopped");
			}
		})
	}

	pub fn is_running(&self) -> bool { self.with(|inner| inner.running) }

	/// TX clock callback
	pub fn tx_tick(&self) {
		self.with(|inner| {
			if !inner.running {
				inner.tx_armed = false;
				return;
			}
			let pin = inner.config.tx_pin;
			let more = match inner.tx.tick(&mut inner.outbox, &mut inner.line, pin, &mut inner.stats) {
				Ok(more) => more,
				Err(e) => {
					error!("tx pin {} write failed: {:?}", pin, e);
					!inner.outbox.is_empty()
				}
			};
			if !more {
				inner.tx_armed = false;
				return;
			}
			let period = inner.period();
			inner.tx_armed = inner.tx_clock.schedule_once(period).is_ok();
			if !inner.tx_armed {
				error!("tx clock re-arm failed");
			}
		})
	}

	/// RX clock callback
	pub fn rx_tick(&self) {
		self.with(|inner| {
			if !inner.running {
				return;
			}
			let pin = inner.config.rx_pin;
			if let Err(e) = inner.rx.tick(&mut inner.inbox, &mut inner.line, pin, &mut inner.stats) {
				error!("rx pin {} read failed: {:?}", pin, e);
			}
			let period = inner.period();
			if inner.rx_clock.schedule_once(period).is_err() {
				error!("rx clock re-arm failed");
			}
		})
	}

	/// Queue `bytes` for transmission, or hand them to the inbox in loopback
	///
	/// A submission that does not fit is rejected whole and nothing is queued.
	pub fn submit(&self, bytes: &[u8]) -> Result<(), Error<L::Error>> {
		if bytes.is_empty() {
			return Ok(());
		}
		self.with(|inner| {
			if inner.config.loopback {
				return append_all(&mut inner.inbox, bytes).map_err(|free| Error::BufferOverflow { free });
			}
			let free = inner.outbox.capacity() - inner.outbox.len();
			if bytes.len() > free {
				return Err(Error::BufferOverflow { free });
			}
			if inner.running && !inner.tx_armed {
				inner.tx_clock.schedule_once(Duration::ZERO).map_err(|_| Error::Clock)?;
				inner.tx_armed = true;
			}
			append_all(&mut inner.outbox, bytes).map_err(|free| Error::BufferOverflow { free })
		})
	}

	/// Drain every byte received so far
	pub fn collect(&self) -> Bytes { self.with(|inner| drain(&mut inner.inbox)) }

	/// Bytes waiting in the outbox, including the one on the wire
	pub fn pending_tx(&self) -> usize { self.with(|inner| inner.outbox.len()) }

	/// Bytes waiting in the inbox
	pub fn pending_rx(&self) -> usize { self.with(|inner| inner.inbox.len()) }

	pub fn stats(&self) -> Stats { self.with(|inner| inner.stats) }

	pub fn config(&self) -> Config { self.with(|inner| inner.config) }

	pub fn tx_pin(&self) -> Pin { self.config().tx_pin }

	pub fn rx_pin(&self) -> Pin { self.config().rx_pin }

	pub fn baud_rate(&self) -> u32 { self.config().baud_rate }

	pub fn loopback(&self) -> bool { self.config().loopback }

	pub fn bit_period(&self) -> Duration { bit_period(self.baud_rate()) }

	/// Move the TX line
	///
	/// While running, the new pin is made an output before the old one is
	/// returned to input, so a failure leaves the old pin driving the line.
	/// Between frames the new pin is driven high; a frame in flight continues
	/// on the new pin from its next bit.
	pub fn set_tx_pin(&self, pin: i32) -> Result<(), Error<L::Error>> {
		let pin = checked_pin(pin).ok_or(Error::InvalidPin(pin))?;
		self.with(|inner| {
			let old = inner.config.tx_pin;
			if inner.running && pin != old {
				inner.line.set_pin_function(pin, PinFunction::Output).map_err(Error::Bus)?;
				if matches!(inner.tx.state(), TxState::Idle | TxState::Stop) {
					if let Err(e) = inner.line.write_pin(pin, PinState::High) {
						let _ = inner.line.set_pin_function(pin, PinFunction::Input);
						return Err(Error::Bus(e));
					}
				}
				if let Err(e) = inner.line.set_pin_function(old, PinFunction::Input) {
					error!("failed to release tx pin {}: {:?}", old, e);
				}
			}
			inner.config.tx_pin = pin;
			debug!("tx pin {}", pin);
			Ok(())
		})
	}

	/// Move the RX line
	pub fn set_rx_pin(&self, pin: i32) -> Result<(), Error<L::Error>> {
		let pin = checked_pin(pin).ok_or(Error::InvalidPin(pin))?;
		self.with(|inner| {
			if inner.running {
				inner.line.set_pin_function(pin, PinFunction::Input).map_err(Error::Bus)?;
			}
			inner.config.rx_pin = pin;
			debug!("rx pin {}", pin);
			Ok(())
		})
	}

	/// Change the baud rate, effective at each engine's next re-arm
	pub fn set_baud_rate(&self, rate: i64) -> Result<(), Error<L::Error>> {
		let rate = checked_baud_rate(rate)?;
		self.with(|inner| inner.config.baud_rate = rate);
		debug!("baud rate {}", rate);
		Ok(())
	}

	pub fn set_loopback(&self, flag: i64) -> Result<(), Error<L::Error>> {
		let loopback = checked_flag(flag)?;
		self.with(|inner| inner.config.loopback = loopback);
		debug!("loopback {}", loopback);
		Ok(())
	}
}

impl<L, C> serial::Write<u8> for SoftUart<L, C>
where
	L: LineIo,
	L::Error: Debug,
	C: BitClock,
{
	type Error = Error<L::Error>;

	fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
		match self.submit(&[byte]) {
			Ok(()) => Ok(()),
			Err(Error::BufferOverflow { .. }) => Err(nb::Error::WouldBlock),
			Err(e) => Err(nb::Error::Other(e)),
		}
	}

	fn flush(&mut self) -> nb::Result<(), Self::Error> {
		if self.pending_tx() == 0 {
			Ok(())
		} else {
			Err(nb::Error::WouldBlock)
		}
	}
}

impl<L, C> serial::Read<u8> for SoftUart<L, C>
where
	L: LineIo,
	L::Error: Debug,
	C: BitClock,
{
	type Error = Error<L::Error>;

	fn read(&mut self) -> nb::Result<u8, Self::Error> {
		self.with(|inner| inner.inbox.pop_front()).ok_or(nb::Error::WouldBlock)
	}
}

impl<L, C> embedded_hal::blocking::serial::write::Default<u8> for SoftUart<L, C>
where
	L: LineIo,
	L::Error: Debug,
	C: BitClock,
{
}
