//! Online move synchronization.
//!
//! Peers exchange numbered moves over an unordered, at-most-once broadcast
//! channel and apply them in sequence order, so every peer's engine goes
//! through the same states.
//!
//! - `PriorityQueue`: reorders incoming moves by sequence number
//! - `PeerMessage`: wire format (bincode)
//! - `Transport`: the outgoing side of the relay
//! - `OnlineSession`: ordering, gap filling, turn arbitration, game end

mod error;
mod matchmaking;
mod message;
mod online;
mod queue;
mod timer;
mod transport;

pub use error::{QueueError, SyncError, TransportError};
pub use matchmaking::MatchAssignment;
pub use message::{PeerMessage, SequencedMove};
pub use online::{OnlineSession, SyncNotice, TurnOwnership};
pub use queue::PriorityQueue;
pub use timer::{SessionGeneration, TimerKind, TimerToken};
pub use transport::{MemoryTransport, Transport};
