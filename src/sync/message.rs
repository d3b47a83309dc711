//! Messages exchanged between peers.
//!
//! Every payload on the relay is one bincode-encoded [`PeerMessage`].

use serde::{Deserialize, Serialize};

use super::error::SyncError;
use crate::core::{Coordinate, PlayerId};

/// One move in the shared total order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedMove {
    /// Target cell.
    pub coord: Coordinate,

    /// 1-based seat of the acting player.
    pub position: u8,

    /// 1-based, strictly increasing per session.
    pub sequence: u32,

    /// Produced by this peer. Never sent on the wire; always false on
    /// receipt.
    #[serde(skip)]
    pub is_local: bool,
}

impl SequencedMove {
    /// A move received from the relay.
    #[must_use]
    pub fn remote(coord: Coordinate, position: u8, sequence: u32) -> Self {
        Self {
            coord,
            position,
            sequence,
            is_local: false,
        }
    }

    /// The acting player, if the position is valid.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        PlayerId::from_position(self.position)
    }
}

/// A relay event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerMessage {
    /// A move, first broadcast or resent on request.
    Move(SequencedMove),

    /// Ask whoever holds move `sequence` to broadcast it again.
    ResendRequest { sequence: u32 },

    /// Seat `position` has joined and is ready to play. `waiting` is set on
    /// beacons from a seat that has not heard from every other seat yet;
    /// a started seat answers those with `waiting: false`.
    Ready { position: u8, waiting: bool },
}

impl PeerMessage {
    pub fn encode(&self) -> Result<Vec<u8>, SyncError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SyncError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
