//! Notifications emitted by the board engine.
//!
//! The engine has no knowledge of any presentation layer. Whatever drives
//! it (a renderer, the online session, a test) drains these after each call
//! and reacts as it sees fit.

use crate::board::WaveResolution;
use crate::core::{Coordinate, PlayerColor, PlayerId};
use crate::rules::GameOutcome;

/// Something observable that happened inside the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// An orb was placed; `level` is the cell's level after placement.
    MovePlaced {
        player: PlayerId,
        coord: Coordinate,
        level: u32,
    },

    /// A new wave of `bombs` explosive cells started.
    WaveStarted { bombs: usize },

    /// The wave in flight reached full displacement and was applied.
    WaveResolved { resolution: WaveResolution },

    /// A colour lost its last cell.
    PlayerEliminated { player: PlayerId, color: PlayerColor },

    /// The turn passed to `player`.
    TurnChanged { player: PlayerId },

    /// The session ended.
    GameOver { outcome: GameOutcome },

    /// The last move was rolled back.
    Undone,
}

impl EngineEvent {
    /// Is this the terminal event of a session?
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(self, EngineEvent::GameOver { .. })
    }
}
