//! The lobby assignment handed out by the matchmaking service.

use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, GameConfig, PlayerId};

/// Seat and board chosen for this peer once a lobby fills.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchAssignment {
    pub rows: u32,
    pub columns: u32,
    pub total_players: u8,
    /// 1-based seat of the local player.
    pub assigned_position: u8,
    /// Relay channel shared by the lobby.
    pub channel: String,
}

impl MatchAssignment {
    /// The local seat.
    pub fn local_player(&self) -> Result<PlayerId, ConfigError> {
        match PlayerId::from_position(self.assigned_position) {
            Some(player) if self.assigned_position <= self.total_players => Ok(player),
            _ => Err(ConfigError::PositionOutOfRange {
                position: self.assigned_position,
                total_players: self.total_players,
            }),
        }
    }

    /// Build the game configuration for this lobby from `base`, which
    /// supplies colours, timing and seed. Board size comes from the
    /// assignment.
    pub fn game_config(&self, base: GameConfig) -> Result<GameConfig, ConfigError> {
        let expected = usize::from(self.total_players);
        if base.players.len() != expected {
            return Err(ConfigError::PlayerCountMismatch {
                expected,
                actual: base.players.len(),
            });
        }
        self.local_player()?;

        let config = base.with_dims(self.rows, self.columns);
        config.validate()?;
        Ok(config)
    }
}
