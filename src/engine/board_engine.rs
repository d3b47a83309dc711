//! The rule and state machine shared by every game mode.
//!
//! ## Driving the engine
//!
//! The caller owns the loop. Each tick it either
//! - places an orb with [`BoardEngine::apply_move`] when
//!   [`BoardEngine::is_ready`] holds, or
//! - feeds elapsed time to [`BoardEngine::advance_cascade`] while a wave is
//!   in flight.
//!
//! A chain of waves is driven by repeated resolution: every resolution
//! rescans the board and starts the next wave if anything is explosive.
//! The turn passes once a resolution leaves nothing explosive.

use std::time::Duration;

use log::{debug, info};

use super::event::EngineEvent;
use super::session::{Elimination, GameSession, UndoSnapshot};
use crate::board::{Board, CascadeWave, Cell};
use crate::core::{ConfigError, Coordinate, CosmeticRng, GameConfig, PlayerId};
use crate::rules::{GameOutcome, LocalPolicy, SessionPolicy};

/// Board, turn and cascade state for one match.
#[derive(Clone, Debug)]
pub struct BoardEngine<P: SessionPolicy = LocalPolicy> {
    config: GameConfig,
    session: GameSession,
    policy: P,
    rng: CosmeticRng,
    wave: Option<CascadeWave>,
    undo: Option<(UndoSnapshot, CosmeticRng)>,
    outcome: Option<GameOutcome>,
    events: Vec<EngineEvent>,
}

impl<P: SessionPolicy> BoardEngine<P> {
    /// Validate `config` and start an empty board.
    pub fn new(config: GameConfig, policy: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = GameSession::new(&config);
        let rng = CosmeticRng::new(config.seed);
        Ok(Self {
            config,
            session,
            policy,
            rng,
            wave: None,
            undo: None,
            outcome: None,
            events: Vec::new(),
        })
    }

    // === Observers ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.session.board()
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Player to move.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.session.current_player()
    }

    /// How the session ended, once it has.
    #[must_use]
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// True once an outcome has been recorded.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// True while a wave is in flight.
    #[must_use]
    pub fn is_blast_running(&self) -> bool {
        self.wave.is_some()
    }

    /// Can a new move be applied right now?
    ///
    /// Undo is applied synchronously, so the only blocking states are a
    /// running cascade and a finished session.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.wave.is_none() && self.outcome.is_none()
    }

    /// Distance the outgoing orbs of the current wave have travelled, or
    /// zero when no wave is in flight.
    #[must_use]
    pub fn blast_displacement(&self) -> f32 {
        self.wave.as_ref().map_or(0.0, CascadeWave::displacement)
    }

    /// The wave in flight.
    #[must_use]
    pub fn current_wave(&self) -> Option<&CascadeWave> {
        self.wave.as_ref()
    }

    /// Is there a move that `undo` would roll back?
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.is_some() && self.wave.is_none()
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // === Operations ===

    /// Place one orb of `acting`'s colour at `coord`.
    ///
    /// Rejected without side effects when a wave is in flight, the session
    /// is over, `coord` is off the board, the policy refuses `acting`, or the
    /// target cell belongs to another colour.
    pub fn apply_move(&mut self, coord: Coordinate, acting: PlayerId) -> bool {
        if !self.is_ready() {
            return false;
        }
        if !self.config.dims.contains(coord) {
            return false;
        }
        let Some(color) = self.session.color_of(acting) else {
            return false;
        };
        if !self.policy.admits(&self.session, acting) {
            return false;
        }
        if self.session.is_eliminated(color) {
            return false;
        }
        if let Some(cell) = self.session.board().get(coord) {
            if cell.color != color {
                return false;
            }
        }

        self.undo = Some((self.session.snapshot(), self.rng.clone()));

        let key = coord.key();
        let level = match self.session.board_mut().get_key_mut(key) {
            Some(cell) => {
                cell.level += 1;
                cell.level
            }
            None => {
                let axes = self.rng.rotation_axes();
                self.session.board_mut().insert(Cell::new(coord, color, 1, axes));
                1
            }
        };
        debug!("{acting} placed at {coord} (level {level})");
        self.events.push(EngineEvent::MovePlaced {
            player: acting,
            coord,
            level,
        });

        if !self.start_wave() {
            self.finish_turn();
        }
        true
    }

    /// Advance the wave in flight by `elapsed`.
    ///
    /// The wave travels one cell width per configured blast time. Until it
    /// has covered a full cell this only moves the displacement. Once it
    /// has, the wave resolves, the next wave (if any) starts, and
    /// eliminations are recorded without passing the turn.
    ///
    /// Returns true exactly when this call ended the session.
    pub fn advance_cascade(&mut self, elapsed: Duration) -> bool {
        let cell_width = self.config.cell_width;
        let distance = cell_width * elapsed.as_secs_f32() / self.config.blast_time.as_secs_f32();

        let Some(wave) = self.wave.as_mut() else {
            return false;
        };
        if !wave.advance(distance, cell_width) {
            return false;
        }

        let Some(wave) = self.wave.take() else {
            return false;
        };
        let resolution = wave.resolve(self.session.board_mut(), &mut self.rng);
        debug!(
            "wave resolved: {} orbs removed, {} distributed, {} cells created",
            resolution.removed, resolution.distributed, resolution.created
        );
        self.events.push(EngineEvent::WaveResolved { resolution });

        self.start_wave();

        let elimination = self.session.eliminate(false);
        self.record_elimination(&elimination);

        if let Some(outcome) = self.policy.judge(&self.session) {
            self.conclude(outcome);
            return true;
        }

        if self.wave.is_none() {
            self.finish_turn();
        }
        false
    }

    /// Roll back to the state before the last accepted move, cosmetic
    /// stream included, so a rolled-back peer stays in step with the others.
    ///
    /// Only one level is kept; a second undo does nothing. Not allowed
    /// while a wave is in flight. Returns true when something was restored.
    pub fn undo(&mut self) -> bool {
        if self.wave.is_some() {
            return false;
        }
        let Some((snapshot, rng)) = self.undo.take() else {
            return false;
        };

        let turn_before = self.session.turn();
        self.session.restore(snapshot);
        self.rng = rng;
        self.outcome = None;
        debug!("undo restored turn {}", self.session.turn());

        self.events.push(EngineEvent::Undone);
        if self.session.turn() != turn_before {
            self.events.push(EngineEvent::TurnChanged {
                player: self.session.current_player(),
            });
        }
        true
    }

    /// Record colours with no cells left and optionally pass the turn.
    pub fn eliminate(&mut self, update_turn: bool) -> Elimination {
        let elimination = self.session.eliminate(update_turn);
        self.record_elimination(&elimination);
        elimination
    }

    /// End the session with `outcome`. Later calls keep the first outcome.
    pub fn conclude(&mut self, outcome: GameOutcome) {
        if self.outcome.is_some() {
            return;
        }
        info!("game over: {outcome}");
        self.wave = None;
        self.outcome = Some(outcome);
        self.events.push(EngineEvent::GameOver { outcome });
    }

    /// Start a fresh game with the same configuration and policy.
    pub fn reset(&mut self) {
        self.session = GameSession::new(&self.config);
        self.rng.reset();
        self.policy.reset();
        self.wave = None;
        self.undo = None;
        self.outcome = None;
        self.events.clear();
    }

    // === Internals ===

    /// Scan for explosive cells. Returns true when a wave started.
    fn start_wave(&mut self) -> bool {
        self.wave = CascadeWave::scan(self.session.board(), self.config.wave_color);
        match &self.wave {
            Some(wave) => {
                let bombs = wave.bombs().len();
                debug!("wave started with {bombs} bombs");
                self.events.push(EngineEvent::WaveStarted { bombs });
                true
            }
            None => false,
        }
    }

    /// The move (and any chain it caused) is over: pass the turn.
    fn finish_turn(&mut self) {
        let elimination = self.session.eliminate(true);
        self.record_elimination(&elimination);
        if !elimination.newly_eliminated.is_empty() {
            if let Some(outcome) = self.policy.judge(&self.session) {
                self.conclude(outcome);
            }
        }
    }

    fn record_elimination(&mut self, elimination: &Elimination) {
        for &player in &elimination.newly_eliminated {
            let Some(color) = self.session.color_of(player) else {
                continue;
            };
            info!("{player} ({color}) eliminated");
            self.events.push(EngineEvent::PlayerEliminated { player, color });
        }
        if elimination.turn_advanced {
            let player = self.session.current_player();
            debug!("turn {} -> {player}", self.session.turn());
            self.events.push(EngineEvent::TurnChanged { player });
        }
    }
}
