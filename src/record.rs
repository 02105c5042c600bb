//! Byte queue used for the per-session `dirty_in` and `dirty_out` buffers.
//!
//! TLS bytes accumulate at the tail as fragments arrive (or as the handshake
//! engine produces output) and are consumed from the head as outbound
//! fragments are cut. The queue never reorders bytes.

/// Append-only, consume-from-front byte queue.
///
/// `dirty_in` holds inbound TLS bytes across fragments until the message is
/// complete; `dirty_out` holds outbound TLS bytes awaiting fragmentation.
/// Resetting while a fragment sequence is still in flight loses partial data,
/// so the dispatcher only resets after a complete message has been handed off.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Record {
    data: Vec<u8>,
}

impl Record {
    /// Create an empty queue.
    pub fn new() -> Self {
        Record { data: Vec::new() }
    }

    /// Append bytes to the tail.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Remove up to `n` bytes from the head and return them.
    ///
    /// Taking more than is available returns whatever remains.
    pub fn take(&mut self, n: usize) -> Vec<u8> {
        let n = n.min(self.data.len());
        self.data.drain(..n).collect()
    }

    /// Number of unconsumed bytes.
    pub fn used(&self) -> usize {
        self.data.len()
    }

    /// True when no unconsumed bytes remain.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View the unconsumed bytes without removing them.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Discard all unconsumed bytes.
    pub fn reset(&mut self) {
        self.data.clear();
    }
}
