//! Byte queues between the control surface and the engines

use heapless::{Deque, Vec};

/// Capacity of the TX outbox and of the RX inbox
pub const QUEUE_CAPACITY: usize = 256;

/// Bounded FIFO of raw bytes, zero included
pub type ByteQueue = Deque<u8, QUEUE_CAPACITY>;

/// Snapshot of drained bytes
pub type Bytes = Vec<u8, QUEUE_CAPACITY>;

/// Append all of `bytes` or none of them
///
/// On rejection returns the number of free slots.
pub(crate) fn append_all(queue: &mut ByteQueue, bytes: &[u8]) -> Result<(), usize> {
    let free = queue.capacity() - queue.len();
    if bytes.len() > free {
        return Err(free);
    }
    for &byte in bytes {
        // room was checked above
        let _ = queue.push_back(byte);
    }
    Ok(())
}

/// Empty `queue` into a snapshot, oldest byte first
pub(crate) fn drain(queue: &mut ByteQueue) -> Bytes {
    let mut out = Bytes::new();
    while let Some(byte) = queue.pop_front() {
        // same capacity on both sides
        let _ = out.push(byte);
    }
    out
}
