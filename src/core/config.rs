//! Game and synchronization configuration.
//!
//! - `GameConfig`: board size, turn order (colours), blast timing, cosmetic
//!   seed and the wave colour policy
//! - `SyncConfig`: online gap-filling parameters
//!
//! Both are plain serde types with builder-style setters. Call
//! `GameConfig::validate` (engine constructors do) before use.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::coord::BoardDims;
use super::error::ConfigError;
use super::player::{PlayerColor, PlayerId};

/// Default board height.
pub const DEFAULT_ROWS: u32 = 8;
/// Default board width.
pub const DEFAULT_COLUMNS: u32 = 6;
/// Time for one blast wave to travel a full cell.
pub const DEFAULT_BLAST_TIME: Duration = Duration::from_millis(220);
/// Cell edge length in world units.
pub const DEFAULT_CELL_WIDTH: f32 = 20.0;
/// Idle time before a waiting peer asks for the next move again.
pub const DEFAULT_RESEND_THRESHOLD: Duration = Duration::from_secs(60);
/// Gap between readiness beacons while a match has not started.
pub const DEFAULT_READY_INTERVAL: Duration = Duration::from_millis(600);

/// How a resolving wave colours the neighbours it touches.
///
/// Within one wave every bomb normally has the same colour (the wave was
/// started by a single move), so the policies only differ on boards where
/// bombs of several colours detonate together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveColorPolicy {
    /// Every touched neighbour takes the colour of the first bomb in key
    /// order.
    #[default]
    FirstBomb,
    /// Each neighbour takes the colour of the last bomb, in key order, that
    /// sent an orb to it.
    LastContributor,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board size.
    pub dims: BoardDims,

    /// Turn order. Index `i` is `PlayerId(i)`.
    pub players: Vec<PlayerColor>,

    /// Duration of one blast animation.
    pub blast_time: Duration,

    /// Cell width in world units; a wave resolves once the blast
    /// displacement reaches it.
    pub cell_width: f32,

    /// Seed for cosmetic orb rotation axes.
    pub seed: u64,

    /// Colour attribution for multi-colour waves.
    pub wave_color: WaveColorPolicy,
}

impl GameConfig {
    /// Create a configuration with default board size and timing.
    pub fn new(players: Vec<PlayerColor>) -> Self {
        Self {
            dims: BoardDims::new(DEFAULT_ROWS, DEFAULT_COLUMNS),
            players,
            blast_time: DEFAULT_BLAST_TIME,
            cell_width: DEFAULT_CELL_WIDTH,
            seed: 0,
            wave_color: WaveColorPolicy::default(),
        }
    }

    /// Set the board size.
    #[must_use]
    pub fn with_dims(mut self, rows: u32, columns: u32) -> Self {
        self.dims = BoardDims::new(rows, columns);
        self
    }

    /// Set the blast animation duration.
    #[must_use]
    pub fn with_blast_time(mut self, blast_time: Duration) -> Self {
        self.blast_time = blast_time;
        self
    }

    /// Set the cosmetic seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the wave colour policy.
    #[must_use]
    pub fn with_wave_color(mut self, policy: WaveColorPolicy) -> Self {
        self.wave_color = policy;
        self
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Colour of a player, if the ID is in range.
    #[must_use]
    pub fn color_of(&self, player: PlayerId) -> Option<PlayerColor> {
        self.players.get(player.index()).copied()
    }

    /// Player owning a colour, if it takes part in this game.
    #[must_use]
    pub fn player_of(&self, color: PlayerColor) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|&c| c == color)
            .map(|i| PlayerId::new(i as u8))
    }

    /// Check the configuration for structural problems.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.players.len();
        if count < 2 {
            return Err(ConfigError::TooFewPlayers { count });
        }
        if count > PlayerColor::ALL.len() {
            return Err(ConfigError::TooManyPlayers {
                count,
                max: PlayerColor::ALL.len(),
            });
        }
        for (i, color) in self.players.iter().enumerate() {
            if self.players[..i].contains(color) {
                return Err(ConfigError::DuplicateColor { color: *color });
            }
        }
        if self.dims.rows < 2 || self.dims.columns < 2 {
            return Err(ConfigError::BoardTooSmall {
                rows: self.dims.rows,
                columns: self.dims.columns,
            });
        }
        if self.blast_time.is_zero() {
            return Err(ConfigError::InvalidBlastTime {
                seconds: format!("{}", self.blast_time.as_secs_f32()),
            });
        }
        if !(self.cell_width.is_finite() && self.cell_width > 0.0) {
            return Err(ConfigError::InvalidCellWidth {
                width: format!("{}", self.cell_width),
            });
        }
        Ok(())
    }
}

/// Online synchronization parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// How long a peer waits for the next move before asking for it again.
    pub resend_threshold: Duration,

    /// How often a seat repeats its readiness beacon until every seat has
    /// confirmed.
    pub ready_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            resend_threshold: DEFAULT_RESEND_THRESHOLD,
            ready_interval: DEFAULT_READY_INTERVAL,
        }
    }
}

impl SyncConfig {
    /// Set the idle threshold for resend requests.
    #[must_use]
    pub fn with_resend_threshold(mut self, threshold: Duration) -> Self {
        self.resend_threshold = threshold;
        self
    }

    /// Set the readiness beacon interval.
    #[must_use]
    pub fn with_ready_interval(mut self, interval: Duration) -> Self {
        self.ready_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_players() -> Vec<PlayerColor> {
        vec![PlayerColor::Red, PlayerColor::Green]
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::new(two_players());

        assert_eq!(config.dims, BoardDims::new(8, 6));
        assert_eq!(config.blast_time, Duration::from_millis(220));
        assert_eq!(config.wave_color, WaveColorPolicy::FirstBomb);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new(two_players())
            .with_dims(3, 4)
            .with_seed(7)
            .with_blast_time(Duration::from_millis(100))
            .with_wave_color(WaveColorPolicy::LastContributor);

        assert_eq!(config.dims, BoardDims::new(3, 4));
        assert_eq!(config.seed, 7);
        assert_eq!(config.blast_time, Duration::from_millis(100));
        assert_eq!(config.wave_color, WaveColorPolicy::LastContributor);
    }

    #[test]
    fn test_lookup() {
        let config = GameConfig::new(two_players());

        assert_eq!(config.color_of(PlayerId::new(1)), Some(PlayerColor::Green));
        assert_eq!(config.color_of(PlayerId::new(2)), None);
        assert_eq!(config.player_of(PlayerColor::Red), Some(PlayerId::new(0)));
        assert_eq!(config.player_of(PlayerColor::Blue), None);
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        assert_eq!(
            GameConfig::new(vec![PlayerColor::Red]).validate(),
            Err(ConfigError::TooFewPlayers { count: 1 })
        );
        assert_eq!(
            GameConfig::new(vec![PlayerColor::Red, PlayerColor::Blue, PlayerColor::Red]).validate(),
            Err(ConfigError::DuplicateColor { color: PlayerColor::Red })
        );
        assert_eq!(
            GameConfig::new(two_players()).with_dims(1, 5).validate(),
            Err(ConfigError::BoardTooSmall { rows: 1, columns: 5 })
        );
        assert!(matches!(
            GameConfig::new(two_players()).with_blast_time(Duration::ZERO).validate(),
            Err(ConfigError::InvalidBlastTime { .. })
        ));
    }

    #[test]
    fn test_config_json() {
        let config = GameConfig::new(two_players()).with_dims(5, 5);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_sync_config() {
        let config = SyncConfig::default();
        assert_eq!(config.resend_threshold, Duration::from_secs(60));

        let config = config.with_resend_threshold(Duration::from_secs(5));
        assert_eq!(config.resend_threshold, Duration::from_secs(5));
        assert_eq!(config.ready_interval, Duration::from_millis(600));
        assert_eq!(
            config.with_ready_interval(Duration::from_secs(1)).ready_interval,
            Duration::from_secs(1)
        );
    }
}
