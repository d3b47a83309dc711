use thiserror::Error;

use super::player::PlayerColor;

/// Errors raised while building or validating a game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Fewer than two players were configured
    #[error("A game needs at least 2 players, got {count}")]
    TooFewPlayers { count: usize },

    /// More players than there are colours in the palette
    #[error("At most {max} players are supported, got {count}")]
    TooManyPlayers { count: usize, max: usize },

    /// The same colour was assigned to more than one player
    #[error("Colour {color} is assigned to more than one player")]
    DuplicateColor { color: PlayerColor },

    /// A colour name did not match the palette
    #[error("Unknown colour name '{name}'")]
    UnknownColor { name: String },

    /// Board dimensions below 2x2
    #[error("Board must be at least 2x2, got {rows}x{columns}")]
    BoardTooSmall { rows: u32, columns: u32 },

    /// Blast duration must be a positive, finite number of seconds
    #[error("Blast time must be positive, got {seconds}s")]
    InvalidBlastTime { seconds: String },

    /// Cell width must be a positive, finite number of world units
    #[error("Cell width must be positive, got {width}")]
    InvalidCellWidth { width: String },

    /// The matchmaking service assigned a seat outside the lobby
    #[error("Assigned position {position} is outside 1..={total_players}")]
    PositionOutOfRange { position: u8, total_players: u8 },

    /// The colour list does not match the lobby size
    #[error("Lobby has {expected} players but {actual} colours were supplied")]
    PlayerCountMismatch { expected: usize, actual: usize },
}
