use thiserror::Error;

use crate::core::ConfigError;

/// Errors from the ordering buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// An element with this priority is already queued
    #[error("Duplicate priority {priority} not allowed in PriorityQueue")]
    DuplicatePriority { priority: u32 },
}

/// Failures reported by the broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The channel is not connected
    #[error("Transport is disconnected")]
    Disconnected,

    /// The relay refused the event
    #[error("Broadcast rejected: {reason}")]
    Rejected { reason: String },
}

/// Errors raised by the online session.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The match assignment or colours do not form a valid game
    #[error("Invalid match configuration: {0}")]
    Config(#[from] ConfigError),

    /// A peer payload could not be encoded or decoded
    #[error("Malformed peer message: {0}")]
    Codec(#[from] bincode::Error),

    /// The broadcast channel failed
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The session has been quit
    #[error("Online session is not running")]
    NotRunning,
}
