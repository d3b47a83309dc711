//! Session policies: what differs between local and online play.
//!
//! The board engine is shared by every mode. A `SessionPolicy` supplies the
//! two decisions that are mode specific:
//! - may this player move right now?
//! - after a wave resolves, has the session ended, and how?

use serde::{Deserialize, Serialize};

use crate::core::{PlayerColor, PlayerId};
use crate::engine::GameSession;

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// A single colour survives.
    Winner { player: PlayerId, color: PlayerColor },

    /// The local player was eliminated and chose not to watch the rest.
    Resigned { player: PlayerId },

    /// A peer left before being eliminated. `None` when the departing seat
    /// could not be identified.
    Abandoned { player: Option<PlayerId> },
}

impl GameOutcome {
    /// The winning player, if the game was decided on the board.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameOutcome::Winner { player, .. } => Some(*player),
            _ => None,
        }
    }

    /// Did `player` win?
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner() == Some(player)
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::Winner { player, color } => write!(f, "{player} ({color}) has won"),
            GameOutcome::Resigned { player } => write!(f, "{player} stopped after elimination"),
            GameOutcome::Abandoned { player: Some(p) } => write!(f, "{p} left the game unfinished"),
            GameOutcome::Abandoned { player: None } => write!(f, "a player left the game unfinished"),
        }
    }
}

/// Strategy trait for mode-specific rules.
pub trait SessionPolicy {
    /// May `acting` place an orb now?
    fn admits(&self, session: &GameSession, acting: PlayerId) -> bool;

    /// Inspect the session after a wave has resolved and eliminations have
    /// been recorded. Returns `Some` when the session is over.
    fn judge(&mut self, session: &GameSession) -> Option<GameOutcome>;

    /// Forget per-game state when the engine is reset.
    fn reset(&mut self) {}
}

/// The decided winner, if only one colour is left.
fn board_winner(session: &GameSession) -> Option<GameOutcome> {
    if !session.is_over() {
        return None;
    }
    let player = session.survivor()?;
    Some(GameOutcome::Winner {
        player,
        color: session.color_of(player)?,
    })
}

/// Policy for a game played on one device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalPolicy {
    enforce_turns: bool,
}

impl LocalPolicy {
    /// Moves are only accepted from the player whose turn it is.
    #[must_use]
    pub const fn strict() -> Self {
        Self { enforce_turns: true }
    }

    /// Any player may move at any time. Turns still advance as usual;
    /// used by test harnesses and sandbox play.
    #[must_use]
    pub const fn free_play() -> Self {
        Self { enforce_turns: false }
    }

    #[must_use]
    pub fn enforces_turns(&self) -> bool {
        self.enforce_turns
    }
}

impl Default for LocalPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

impl SessionPolicy for LocalPolicy {
    fn admits(&self, session: &GameSession, acting: PlayerId) -> bool {
        !self.enforce_turns || session.current_player() == acting
    }

    fn judge(&mut self, session: &GameSession) -> Option<GameOutcome> {
        board_winner(session)
    }
}

/// What an eliminated online player decided to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchChoice {
    #[default]
    Undecided,
    Watching,
    Declined,
}

/// Policy for one seat in an online game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OnlinePolicy {
    me: PlayerId,
    watch: WatchChoice,
    choice_pending: bool,
}

impl OnlinePolicy {
    /// Policy for the local seat `me`.
    #[must_use]
    pub fn new(me: PlayerId) -> Self {
        Self {
            me,
            watch: WatchChoice::Undecided,
            choice_pending: false,
        }
    }

    /// The local seat.
    #[must_use]
    pub fn me(&self) -> PlayerId {
        self.me
    }

    /// Current watch decision.
    #[must_use]
    pub fn watch(&self) -> WatchChoice {
        self.watch
    }

    /// True while the eliminated local player still has to choose between
    /// watching and stopping.
    #[must_use]
    pub fn is_choice_pending(&self) -> bool {
        self.choice_pending
    }

    /// Record the local player's decision. Returns the outcome when the
    /// decision ends the session.
    pub fn decide(&mut self, watch: bool) -> Option<GameOutcome> {
        self.choice_pending = false;
        if watch {
            self.watch = WatchChoice::Watching;
            None
        } else {
            self.watch = WatchChoice::Declined;
            Some(GameOutcome::Resigned { player: self.me })
        }
    }
}

impl SessionPolicy for OnlinePolicy {
    fn admits(&self, session: &GameSession, acting: PlayerId) -> bool {
        session.current_player() == acting
    }

    fn judge(&mut self, session: &GameSession) -> Option<GameOutcome> {
        let still_in = session
            .color_of(self.me)
            .is_some_and(|color| !session.is_eliminated(color));
        if still_in {
            return board_winner(session);
        }

        if session.player_count() > 2 && !session.is_over() {
            // More than one opponent left: the local player may keep watching.
            return match self.watch {
                WatchChoice::Undecided => {
                    self.choice_pending = true;
                    None
                }
                WatchChoice::Watching => None,
                WatchChoice::Declined => Some(GameOutcome::Resigned { player: self.me }),
            };
        }

        board_winner(session).or(Some(GameOutcome::Resigned { player: self.me }))
    }

    fn reset(&mut self) {
        self.watch = WatchChoice::Undecided;
        self.choice_pending = false;
    }
}
