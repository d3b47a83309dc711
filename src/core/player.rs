//! Player identification and colours.
//!
//! ## PlayerId
//!
//! Type-safe 0-based player index. The online protocol and the UI talk about
//! 1-based *positions*; `PlayerId::position` / `PlayerId::from_position`
//! convert between the two.
//!
//! ## PlayerColor
//!
//! The closed palette of orb colours. A player *is* their colour on the
//! board: cell ownership and elimination are tracked by colour.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::ConfigError;

/// Player identifier (0-based index into the turn order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 1-based seat position, as shown to players and sent on the wire.
    #[must_use]
    pub const fn position(self) -> u8 {
        self.0 + 1
    }

    /// Convert a 1-based position back into a player ID.
    ///
    /// Returns `None` for position 0.
    #[must_use]
    pub const fn from_position(position: u8) -> Option<Self> {
        match position {
            0 => None,
            p => Some(Self(p - 1)),
        }
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use chain_reaction::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[0], PlayerId::new(0));
    /// assert_eq!(players[3].position(), 4);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.position())
    }
}

/// Orb colour. Every player in a session owns a distinct colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Purple,
    Violet,
    Pink,
    Orange,
    Brown,
    Maroon,
    Grey,
}

impl PlayerColor {
    /// The full palette, in menu order.
    pub const ALL: [PlayerColor; 12] = [
        PlayerColor::Red,
        PlayerColor::Green,
        PlayerColor::Blue,
        PlayerColor::Yellow,
        PlayerColor::Cyan,
        PlayerColor::Purple,
        PlayerColor::Violet,
        PlayerColor::Pink,
        PlayerColor::Orange,
        PlayerColor::Brown,
        PlayerColor::Maroon,
        PlayerColor::Grey,
    ];

    /// Lowercase colour name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlayerColor::Red => "red",
            PlayerColor::Green => "green",
            PlayerColor::Blue => "blue",
            PlayerColor::Yellow => "yellow",
            PlayerColor::Cyan => "cyan",
            PlayerColor::Purple => "purple",
            PlayerColor::Violet => "violet",
            PlayerColor::Pink => "pink",
            PlayerColor::Orange => "orange",
            PlayerColor::Brown => "brown",
            PlayerColor::Maroon => "maroon",
            PlayerColor::Grey => "grey",
        }
    }

    /// Linear RGB in `[0, 1]` used by the renderer.
    #[must_use]
    pub const fn rgb(self) -> [f32; 3] {
        match self {
            PlayerColor::Red => [1.0, 0.0, 0.0],
            PlayerColor::Green => [0.0, 1.0, 0.0],
            PlayerColor::Blue => [0.1, 0.3, 1.0],
            PlayerColor::Yellow => [1.0, 1.0, 0.0],
            PlayerColor::Cyan => [0.0, 1.0, 1.0],
            PlayerColor::Purple => [0.58, 0.0, 0.83],
            PlayerColor::Violet => [0.431, 0.392, 1.0],
            PlayerColor::Pink => [1.0, 0.412, 0.706],
            PlayerColor::Orange => [1.0, 0.27, 0.0],
            PlayerColor::Brown => [0.706, 0.314, 0.196],
            PlayerColor::Maroon => [0.70, 0.18, 0.36],
            PlayerColor::Grey => [0.67, 0.67, 0.67],
        }
    }
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        PlayerColor::ALL
            .iter()
            .copied()
            .find(|c| c.name() == lower)
            .ok_or(ConfigError::UnknownColor { name: s.to_string() })
    }
}
