//! # chain-reaction
//!
//! Rules engine for the board game Chain Reaction, with a lockstep
//! synchronization layer for online play.
//!
//! ## Design Principles
//!
//! 1. **Flat board**: cells live in a map keyed by the Cantor pairing of
//!    their coordinates. Neighbours are found by arithmetic, not by links
//!    between cells.
//!
//! 2. **One engine, many modes**: local and online play share
//!    `BoardEngine`. What differs (who may move, watcher mode, how the
//!    winner is reported) is a `SessionPolicy`.
//!
//! 3. **Caller owns the loop**: nothing here blocks, spawns or sleeps.
//!    Hosts call tick-style functions and read observers.
//!
//! ## Architecture
//!
//! - **Waves, not recursion**: a chain reaction is a sequence of
//!   simultaneous detonation waves, each resolved once its animation
//!   displacement reaches a full cell.
//!
//! - **Persistent Data Structures**: O(1) board snapshots via `im-rs` for
//!   one-level undo.
//!
//! - **Lockstep**: every peer applies the same numbered moves in the same
//!   order; no peer is authoritative.
//!
//! ## Modules
//!
//! - `core`: coordinates, cell keys, players, colours, configuration, RNG
//! - `board`: cells, the board map, cascade waves
//! - `rules`: session policies and game outcomes
//! - `engine`: session state, undo and the move/cascade driver
//! - `sync`: ordering buffer, wire messages, online session

pub mod core;
pub mod board;
pub mod rules;
pub mod engine;
pub mod sync;

// Re-export commonly used types
pub use crate::core::{
    BoardDims, CellKey, Coordinate,
    PlayerColor, PlayerId,
    GameConfig, SyncConfig, WaveColorPolicy,
    CosmeticRng, ConfigError,
};

pub use crate::board::{Board, CascadeWave, Cell, WaveResolution};

pub use crate::rules::{GameOutcome, LocalPolicy, OnlinePolicy, SessionPolicy, WatchChoice};

pub use crate::engine::{BoardEngine, EngineEvent, GameSession, UndoSnapshot};

pub use crate::sync::{
    MatchAssignment, MemoryTransport, OnlineSession,
    PeerMessage, PriorityQueue, SequencedMove,
    SyncError, SyncNotice, Transport, TurnOwnership,
};
