//! Engine counters

/// Counters kept by the transmit and receive engines
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
	pub frames_sent: u32,
	pub frames_received: u32,
	/// Frames whose stop bit sampled low
	pub framing_errors: u32,
	/// Received bytes dropped because the inbox was full
	pub rx_overruns: u32,
}
