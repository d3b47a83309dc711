//! Game session state: turn order, turn counter, eliminations, board.
//!
//! ## Turn counter
//!
//! `turn` only ever grows. The player to move is
//! `players[turn % players.len()]`; advancing skips eliminated colours.
//!
//! ## Opening round
//!
//! Until every player has had a first move (`turn < players.len()`) nobody
//! can be eliminated, since players who have not moved yet own no cells.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{GameConfig, PlayerColor, PlayerId};

/// One-level undo snapshot of the mutable session state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoSnapshot {
    pub board: Board,
    pub turn: u32,
    pub eliminated: Vec<PlayerColor>,
}

/// What an elimination pass changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Elimination {
    /// Players eliminated by this pass, in turn order.
    pub newly_eliminated: Vec<PlayerId>,
    /// Whether the turn counter moved.
    pub turn_advanced: bool,
}

/// Mutable state of one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    players: Vec<PlayerColor>,
    turn: u32,
    eliminated: Vec<PlayerColor>,
    board: Board,
}

impl GameSession {
    /// Fresh session for a validated configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            players: config.players.clone(),
            turn: 0,
            eliminated: Vec::new(),
            board: Board::new(config.dims),
        }
    }

    // === Players ===

    /// Turn order.
    #[must_use]
    pub fn players(&self) -> &[PlayerColor] {
        &self.players
    }

    /// Number of players, eliminated or not.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Colour of `player`, if it takes part.
    #[must_use]
    pub fn color_of(&self, player: PlayerId) -> Option<PlayerColor> {
        self.players.get(player.index()).copied()
    }

    // === Turns ===

    /// Raw turn counter.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Player to move.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        PlayerId::new((self.turn as usize % self.players.len()) as u8)
    }

    /// Colour of the player to move.
    #[must_use]
    pub fn current_color(&self) -> PlayerColor {
        self.players[self.turn as usize % self.players.len()]
    }

    /// True until every player has had a first move.
    #[must_use]
    pub fn in_opening_round(&self) -> bool {
        (self.turn as usize) < self.players.len()
    }

    // === Elimination ===

    /// Eliminated colours, in the order they dropped out.
    #[must_use]
    pub fn eliminated(&self) -> &[PlayerColor] {
        &self.eliminated
    }

    /// Has `color` been eliminated?
    #[must_use]
    pub fn is_eliminated(&self, color: PlayerColor) -> bool {
        self.eliminated.contains(&color)
    }

    /// Players still in the game.
    #[must_use]
    pub fn survivors(&self) -> usize {
        self.players.len() - self.eliminated.len()
    }

    /// True when exactly one colour is left.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.eliminated.len() + 1 == self.players.len()
    }

    /// The first surviving player in turn order, once the game is over.
    #[must_use]
    pub fn survivor(&self) -> Option<PlayerId> {
        if !self.is_over() {
            return None;
        }
        self.players
            .iter()
            .position(|c| !self.eliminated.contains(c))
            .map(|i| PlayerId::new(i as u8))
    }

    /// Record every colour that no longer owns a cell, then optionally pass
    /// the turn to the next living player.
    ///
    /// During the opening round nobody is eliminated and the turn simply
    /// advances by one.
    pub fn eliminate(&mut self, update_turn: bool) -> Elimination {
        let mut out = Elimination::default();

        if self.in_opening_round() {
            if update_turn {
                self.turn += 1;
                out.turn_advanced = true;
            }
            return out;
        }

        for (i, &color) in self.players.iter().enumerate() {
            if !self.eliminated.contains(&color) && !self.board.has_color(color) {
                self.eliminated.push(color);
                out.newly_eliminated.push(PlayerId::new(i as u8));
            }
        }

        if update_turn && self.survivors() > 0 {
            loop {
                self.turn += 1;
                if !self.is_eliminated(self.current_color()) {
                    break;
                }
            }
            out.turn_advanced = true;
        }

        out
    }

    // === Board ===

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    // === Undo ===

    /// Capture board, turn counter and eliminations.
    #[must_use]
    pub fn snapshot(&self) -> UndoSnapshot {
        UndoSnapshot {
            board: self.board.clone(),
            turn: self.turn,
            eliminated: self.eliminated.clone(),
        }
    }

    /// Replace board, turn counter and eliminations with a snapshot.
    pub fn restore(&mut self, snapshot: UndoSnapshot) {
        self.board = snapshot.board;
        self.turn = snapshot.turn;
        self.eliminated = snapshot.eliminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::core::Coordinate;

    fn three_player_session() -> GameSession {
        let config = GameConfig::new(vec![PlayerColor::Red, PlayerColor::Green, PlayerColor::Blue])
            .with_dims(3, 3);
        GameSession::new(&config)
    }

    fn place(session: &mut GameSession, x: u32, y: u32, color: PlayerColor) {
        session
            .board_mut()
            .insert(Cell::new(Coordinate::new(x, y), color, 1, [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_current_player_wraps() {
        let mut session = three_player_session();

        assert_eq!(session.current_player(), PlayerId::new(0));
        for _ in 0..3 {
            session.eliminate(true);
        }
        assert_eq!(session.turn(), 3);
        assert_eq!(session.current_player(), PlayerId::new(0));
    }

    #[test]
    fn test_color_of_unknown_player() {
        let session = three_player_session();

        assert_eq!(session.color_of(PlayerId::new(2)), Some(PlayerColor::Blue));
        assert_eq!(session.color_of(PlayerId::new(3)), None);
    }

    #[test]
    fn test_opening_round_never_eliminates() {
        let mut session = three_player_session();
        place(&mut session, 0, 0, PlayerColor::Red);

        let result = session.eliminate(true);

        assert!(result.newly_eliminated.is_empty());
        assert!(result.turn_advanced);
        assert_eq!(session.turn(), 1);
    }

    #[test]
    fn test_opening_round_without_turn_update() {
        let mut session = three_player_session();

        let result = session.eliminate(false);

        assert_eq!(result, Elimination::default());
        assert_eq!(session.turn(), 0);
    }

    #[test]
    fn test_elimination_skips_turn() {
        let mut session = three_player_session();
        for _ in 0..3 {
            session.eliminate(true);
        }
        // Only red and blue own cells: green is out.
        place(&mut session, 0, 0, PlayerColor::Red);
        place(&mut session, 2, 2, PlayerColor::Blue);

        let result = session.eliminate(true);

        assert_eq!(result.newly_eliminated, vec![PlayerId::new(1)]);
        assert!(session.is_eliminated(PlayerColor::Green));
        // Turn 3 (red) -> 4 (green, skipped) -> 5 (blue)
        assert_eq!(session.turn(), 5);
        assert_eq!(session.current_color(), PlayerColor::Blue);
        assert!(!session.is_over());
    }

    #[test]
    fn test_single_survivor() {
        let mut session = three_player_session();
        for _ in 0..3 {
            session.eliminate(true);
        }
        place(&mut session, 1, 1, PlayerColor::Blue);

        session.eliminate(false);

        assert!(session.is_over());
        assert_eq!(session.survivors(), 1);
        assert_eq!(session.survivor(), Some(PlayerId::new(2)));
        assert_eq!(session.eliminated(), &[PlayerColor::Red, PlayerColor::Green]);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut session = three_player_session();
        place(&mut session, 0, 0, PlayerColor::Red);
        let snapshot = session.snapshot();

        place(&mut session, 1, 1, PlayerColor::Green);
        session.eliminate(true);
        assert_ne!(session.snapshot(), snapshot);

        session.restore(snapshot.clone());
        assert_eq!(session.snapshot(), snapshot);
    }
}
