//! The broadcast channel the online session talks through.
//!
//! Delivery is at-most-once and unordered. The session never relies on
//! anything stronger.

use std::collections::VecDeque;

use super::error::TransportError;

/// Outgoing side of the publish/subscribe relay.
///
/// Incoming events are pushed into the session by whoever owns the relay
/// client (see `OnlineSession::on_payload` and `on_member_left`).
pub trait Transport {
    /// Send `payload` to every other member of the channel.
    fn broadcast(&mut self, payload: &[u8]) -> Result<(), TransportError>;
}

/// In-process transport that records every broadcast.
///
/// Used to wire several sessions together in one process: drain one
/// session's outbox and feed the payloads to the others in any order.
#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
    outbox: VecDeque<Vec<u8>>,
    failures: usize,
    sent: usize,
}

impl MemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` broadcasts fail.
    pub fn fail_next(&mut self, count: usize) {
        self.failures = count;
    }

    /// Take every payload broadcast since the last call.
    pub fn take_outbox(&mut self) -> Vec<Vec<u8>> {
        self.outbox.drain(..).collect()
    }

    /// Number of successful broadcasts so far.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Transport for MemoryTransport {
    fn broadcast(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(TransportError::Disconnected);
        }
        self.sent += 1;
        self.outbox.push_back(payload.to_vec());
        Ok(())
    }
}
