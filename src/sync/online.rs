//! Lockstep online play.
//!
//! Every peer runs its own [`BoardEngine`]. Peers agree on a single total
//! order of moves by numbering them: move `n + 1` is applied only after
//! moves `1..=n`, whoever produced it. Local and remote moves go through the
//! same ordering buffer, so every peer applies the same sequence of moves.
//!
//! ## Readiness
//!
//! A match starts on a peer once every seat has announced itself with a
//! [`PeerMessage::Ready`] beacon. Until then moves are buffered but not
//! applied, local input is refused and the beacon is repeated every
//! `SyncConfig::ready_interval`. A started peer answers each beacon that
//! still carries `waiting`, so a seat whose earlier beacons were lost can
//! still catch up.
//!
//! ## Per-tick flow
//!
//! 1. An unstarted peer repeats its readiness beacon when due.
//! 2. If the match has started, the engine is ready and the previous move
//!    has settled, the next in-sequence move is taken from the buffer and
//!    applied. A gap leaves the buffer untouched until the missing move
//!    arrives.
//! 3. A running cascade is advanced by the elapsed time.
//! 4. Deferred peer departures are evaluated once no cascade is running.
//! 5. Once the cascade is over the last move settles: turn ownership is
//!    re-evaluated and a local move is broadcast. A failed broadcast rolls
//!    the move back. Resend requests for a move are only answered once it
//!    has settled.
//! 6. A peer that has waited longer than the resend threshold asks for the
//!    next move again.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use log::{debug, info, warn};

use super::error::SyncError;
use super::matchmaking::MatchAssignment;
use super::message::{PeerMessage, SequencedMove};
use super::queue::PriorityQueue;
use super::timer::{SessionGeneration, TimerKind, TimerToken};
use super::transport::Transport;
use crate::core::{Coordinate, GameConfig, PlayerId, SyncConfig};
use crate::engine::{BoardEngine, EngineEvent};
use crate::rules::{GameOutcome, OnlinePolicy, WatchChoice};

/// Whose turn it is, from the local seat's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOwnership {
    /// A cascade is running or the session is not active.
    Undetermined,
    Theirs,
    Mine,
}

/// Conditions the host should surface to the local player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncNotice {
    /// A local move could not be sent and was rolled back; the player
    /// should retry.
    BroadcastFailed { sequence: u32 },

    /// The engine refused a move taken from the buffer.
    MoveRejected { sequence: u32 },

    /// The local colour was eliminated with more than one opponent left.
    /// Answer with [`OnlineSession::choose_to_watch`].
    WatchChoiceRequired,
}

/// One seat in an online match.
pub struct OnlineSession<T: Transport> {
    engine: BoardEngine<OnlinePolicy>,
    transport: T,
    sync: SyncConfig,
    channel: String,
    me: PlayerId,
    running: bool,
    generation: SessionGeneration,
    clock: Duration,
    last_progress: Duration,
    pending: PriorityQueue<SequencedMove>,
    processed: BTreeMap<u32, SequencedMove>,
    unsettled: Option<SequencedMove>,
    waiting_for_opponent: bool,
    departures: Vec<u8>,
    notices: Vec<SyncNotice>,
    choice_announced: bool,
    confirmed: BTreeSet<u8>,
    last_beacon: Option<Duration>,
}

impl<T: Transport> OnlineSession<T> {
    /// Join the lobby described by `assignment`.
    ///
    /// `base` supplies colours (in seat order), timing and the cosmetic
    /// seed; every peer must use the same values.
    pub fn start(
        assignment: &MatchAssignment,
        base: GameConfig,
        sync: SyncConfig,
        transport: T,
    ) -> Result<Self, SyncError> {
        let config = assignment.game_config(base)?;
        let me = assignment.local_player()?;
        let engine = BoardEngine::new(config, OnlinePolicy::new(me))?;
        let waiting_for_opponent = engine.current_player() != me;

        info!(
            "joined {} as {me} ({} players, {}x{})",
            assignment.channel, assignment.total_players, assignment.rows, assignment.columns
        );

        Ok(Self {
            engine,
            transport,
            sync,
            channel: assignment.channel.clone(),
            me,
            running: true,
            generation: SessionGeneration::new(),
            clock: Duration::ZERO,
            last_progress: Duration::ZERO,
            pending: PriorityQueue::new(),
            processed: BTreeMap::new(),
            unsettled: None,
            waiting_for_opponent,
            departures: Vec::new(),
            notices: Vec::new(),
            choice_announced: false,
            confirmed: BTreeSet::from([me.position()]),
            last_beacon: None,
        })
    }

    // === Observers ===

    #[must_use]
    pub fn engine(&self) -> &BoardEngine<OnlinePolicy> {
        &self.engine
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The local seat.
    #[must_use]
    pub fn me(&self) -> PlayerId {
        self.me
    }

    /// False once the session has been quit.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True once every seat has confirmed it is ready.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.confirmed.len() == self.engine.session().player_count()
    }

    /// Seats known to be ready, by 1-based position. Always includes the
    /// local seat.
    #[must_use]
    pub fn confirmed_seats(&self) -> &BTreeSet<u8> {
        &self.confirmed
    }

    /// True once the match has an outcome.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.engine.outcome()
    }

    /// Did the local seat win?
    #[must_use]
    pub fn have_i_won(&self) -> bool {
        self.engine.outcome().is_some_and(|o| o.is_winner(self.me))
    }

    /// Is the eliminated local player watching the rest of the match?
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.engine.policy().watch() == WatchChoice::Watching
    }

    /// True while the next move is expected from another seat.
    #[must_use]
    pub fn is_waiting_for_opponent(&self) -> bool {
        self.waiting_for_opponent
    }

    /// Number of moves applied so far.
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// A move already applied, by sequence number.
    #[must_use]
    pub fn processed_move(&self, sequence: u32) -> Option<&SequencedMove> {
        self.processed.get(&sequence)
    }

    /// Moves buffered but not yet applied.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.size()
    }

    /// Sequence number the next applied move must carry.
    #[must_use]
    pub fn next_sequence(&self) -> u32 {
        self.processed.len() as u32 + 1
    }

    /// Time accumulated through [`tick`](Self::tick).
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Nothing left to do until new input arrives.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
            && self.unsettled.is_none()
            && self.departures.is_empty()
            && !self.engine.is_blast_running()
    }

    /// Whose turn it is. Undetermined before the match starts and while a
    /// cascade runs.
    #[must_use]
    pub fn is_it_my_turn(&self) -> TurnOwnership {
        if !self.running || !self.is_started() || self.engine.is_blast_running() {
            return TurnOwnership::Undetermined;
        }
        if self.engine.current_player() == self.me {
            TurnOwnership::Mine
        } else {
            TurnOwnership::Theirs
        }
    }

    /// Would a local move be queued right now?
    #[must_use]
    pub fn accepts_local_input(&self) -> bool {
        let session = self.engine.session();
        let still_in = session
            .color_of(self.me)
            .is_some_and(|color| !session.is_eliminated(color));
        self.running
            && self.is_started()
            && self.engine.is_ready()
            && still_in
            && !self.waiting_for_opponent
            && self.unsettled.is_none()
            && self.pending.is_empty()
    }

    /// Engine events since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.engine.drain_events()
    }

    /// Notices since the last drain.
    pub fn drain_notices(&mut self) -> Vec<SyncNotice> {
        std::mem::take(&mut self.notices)
    }

    // === Input ===

    /// Queue a move for the local seat. It is applied on a later tick
    /// through the same path as remote moves.
    ///
    /// Returns false when local input is not accepted right now.
    pub fn submit_local_move(&mut self, coord: Coordinate) -> bool {
        if !self.accepts_local_input() {
            return false;
        }
        let mv = SequencedMove {
            coord,
            position: self.me.position(),
            sequence: self.next_sequence(),
            is_local: true,
        };
        debug!("queued local move {} at {coord}", mv.sequence);
        self.pending.enqueue(mv, mv.sequence).is_ok()
    }

    /// Buffer a move received from a peer.
    ///
    /// Moves that were already applied or are already buffered are dropped.
    pub fn on_remote_move(&mut self, mut mv: SequencedMove) -> bool {
        if !self.running {
            return false;
        }
        mv.is_local = false;
        if self.processed.contains_key(&mv.sequence) {
            debug!("dropping move {}: already applied", mv.sequence);
            return false;
        }
        match self.pending.enqueue(mv, mv.sequence) {
            Ok(()) => true,
            Err(e) => {
                debug!("dropping move {}: {e}", mv.sequence);
                false
            }
        }
    }

    /// Handle a decoded relay event.
    pub fn on_peer_message(&mut self, message: PeerMessage) {
        match message {
            PeerMessage::Move(mv) => {
                self.on_remote_move(mv);
            }
            PeerMessage::ResendRequest { sequence } => self.answer_resend(sequence),
            PeerMessage::Ready { position, waiting } => self.on_ready(position, waiting),
        }
    }

    /// Handle a raw relay payload.
    pub fn on_payload(&mut self, payload: &[u8]) -> Result<(), SyncError> {
        let message = PeerMessage::decode(payload).map_err(|e| {
            warn!("undecodable payload on {}: {e}", self.channel);
            e
        })?;
        self.on_peer_message(message);
        Ok(())
    }

    /// A channel member at 1-based `position` left.
    ///
    /// Ignored once the match is over. Evaluated after the current cascade
    /// finishes. The departure of an eliminated colour changes nothing;
    /// anyone else leaving ends the match.
    pub fn on_member_left(&mut self, position: u8) {
        if !self.running || self.engine.is_finished() {
            debug!("ignoring departure of position {position}: match not in progress");
            return;
        }
        self.departures.push(position);
        self.process_departures();
    }

    /// Answer the watch prompt. Declining ends the session for this seat.
    ///
    /// Returns false when no choice was pending.
    pub fn choose_to_watch(&mut self, watch: bool) -> bool {
        if !self.engine.policy().is_choice_pending() {
            return false;
        }
        if let Some(outcome) = self.engine.policy_mut().decide(watch) {
            self.engine.conclude(outcome);
        } else {
            info!("{} keeps watching", self.me);
        }
        true
    }

    // === Loop ===

    /// Advance the session by `elapsed`.
    ///
    /// Returns true when the match ended during this tick.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.running {
            return false;
        }
        let was_finished = self.engine.is_finished();
        self.clock += elapsed;

        self.beacon_if_due();
        self.apply_next_move();

        if self.engine.is_blast_running() {
            self.engine.advance_cascade(elapsed);
        }
        self.process_departures();
        if self.engine.policy().is_choice_pending() && !self.choice_announced {
            self.choice_announced = true;
            self.notices.push(SyncNotice::WatchChoiceRequired);
        }

        self.settle();
        self.probe_resend();

        !was_finished && self.engine.is_finished()
    }

    /// Token for a callback the host schedules on its own timer.
    #[must_use]
    pub fn schedule(&self, kind: TimerKind) -> TimerToken {
        self.generation.token(kind)
    }

    /// Run a scheduled callback. Tokens from before the last reset or quit
    /// do nothing. Returns true when the callback ran.
    pub fn fire_timer(&mut self, token: TimerToken) -> bool {
        if !self.running || !self.generation.is_current(&token) {
            debug!("stale {:?} timer from generation {}", token.kind(), token.generation());
            return false;
        }
        match token.kind() {
            TimerKind::ResendProbe => {
                if self.is_started() && self.waiting_for_opponent && !self.engine.is_finished() {
                    self.last_progress = self.clock;
                    self.request_resend();
                }
            }
            TimerKind::Settle => self.settle(),
            TimerKind::ReadyBeacon => {
                if !self.is_started() {
                    self.send_beacon();
                }
            }
        }
        true
    }

    /// Start a new match in the same lobby. Every seat has to confirm
    /// again before play resumes.
    pub fn reset(&mut self) {
        self.generation.bump();
        self.engine.reset();
        self.clear_buffers();
        self.confirmed = BTreeSet::from([self.me.position()]);
        self.last_beacon = None;
        self.running = true;
        self.last_progress = self.clock;
        self.waiting_for_opponent = self.engine.current_player() != self.me;
        info!("new match on {}", self.channel);
    }

    /// Leave the match. Every later call and timer is a no-op.
    pub fn quit(&mut self) {
        self.generation.bump();
        self.clear_buffers();
        self.running = false;
        info!("left {}", self.channel);
    }

    // === Internals ===

    fn clear_buffers(&mut self) {
        self.pending.clear();
        self.processed.clear();
        self.unsettled = None;
        self.departures.clear();
        self.notices.clear();
        self.choice_announced = false;
    }

    fn send(&mut self, message: &PeerMessage) -> Result<(), SyncError> {
        let payload = message.encode()?;
        self.transport.broadcast(&payload)?;
        Ok(())
    }

    fn apply_next_move(&mut self) {
        if !self.is_started() || self.unsettled.is_some() || !self.engine.is_ready() {
            return;
        }
        let expected = self.next_sequence();
        loop {
            let Some((sequence, _)) = self.pending.front() else {
                return;
            };
            if sequence < expected {
                debug!("dropping stale move {sequence}");
                self.pending.dequeue();
                continue;
            }
            if sequence > expected {
                debug!("move {sequence} buffered, waiting for {expected}");
                return;
            }
            break;
        }

        let Some((sequence, mv)) = self.pending.dequeue() else {
            return;
        };
        let accepted = mv
            .player()
            .is_some_and(|player| self.engine.apply_move(mv.coord, player));
        if !accepted {
            warn!("move {sequence} from position {} at {} rejected", mv.position, mv.coord);
            self.notices.push(SyncNotice::MoveRejected { sequence });
            return;
        }

        self.processed.insert(sequence, mv);
        self.unsettled = Some(mv);
        self.last_progress = self.clock;
    }

    /// Finish the last applied move once its cascade is over.
    fn settle(&mut self) {
        let Some(mv) = self.unsettled else {
            return;
        };
        let ownership = self.is_it_my_turn();
        if ownership == TurnOwnership::Undetermined {
            return;
        }
        self.unsettled = None;
        self.waiting_for_opponent = ownership != TurnOwnership::Mine;

        if !mv.is_local {
            return;
        }
        if let Err(e) = self.send(&PeerMessage::Move(mv)) {
            warn!("broadcast of move {} failed, rolling back: {e}", mv.sequence);
            self.engine.undo();
            self.processed.remove(&mv.sequence);
            self.waiting_for_opponent = false;
            self.notices.push(SyncNotice::BroadcastFailed {
                sequence: mv.sequence,
            });
        }
    }

    fn probe_resend(&mut self) {
        if !self.is_started() || !self.waiting_for_opponent || self.engine.is_finished() {
            return;
        }
        if self.clock.saturating_sub(self.last_progress) <= self.sync.resend_threshold {
            return;
        }
        self.last_progress = self.clock;
        self.request_resend();
    }

    fn request_resend(&mut self) {
        let sequence = self.next_sequence();
        debug!("requesting move {sequence} again");
        if let Err(e) = self.send(&PeerMessage::ResendRequest { sequence }) {
            warn!("resend request for move {sequence} failed: {e}");
        }
    }

    fn answer_resend(&mut self, sequence: u32) {
        // An unsettled move has not been broadcast yet and may still be
        // rolled back.
        if self.unsettled.is_some_and(|mv| mv.sequence == sequence) {
            debug!("move {sequence} not settled yet, not resending");
            return;
        }
        let Some(mv) = self.processed.get(&sequence).copied() else {
            return;
        };
        debug!("resending move {sequence}");
        if let Err(e) = self.send(&PeerMessage::Move(mv)) {
            warn!("resend of move {sequence} failed: {e}");
        }
    }

    fn on_ready(&mut self, position: u8, waiting: bool) {
        let seats = self.engine.session().player_count();
        if position == 0 || usize::from(position) > seats || position == self.me.position() {
            debug!("ignoring ready beacon from position {position}");
            return;
        }
        let was_started = self.is_started();
        self.confirmed.insert(position);

        if was_started {
            if waiting {
                debug!("position {position} still waiting, answering its beacon");
                let reply = PeerMessage::Ready {
                    position: self.me.position(),
                    waiting: false,
                };
                if let Err(e) = self.send(&reply) {
                    warn!("ready reply to position {position} failed: {e}");
                }
            }
        } else if self.is_started() {
            info!("all {seats} seats ready on {}", self.channel);
            self.last_progress = self.clock;
        }
    }

    fn beacon_if_due(&mut self) {
        if self.is_started() {
            return;
        }
        let due = self
            .last_beacon
            .map_or(true, |at| self.clock.saturating_sub(at) >= self.sync.ready_interval);
        if due {
            self.send_beacon();
        }
    }

    fn send_beacon(&mut self) {
        self.last_beacon = Some(self.clock);
        let beacon = PeerMessage::Ready {
            position: self.me.position(),
            waiting: true,
        };
        if let Err(e) = self.send(&beacon) {
            warn!("ready beacon on {} failed: {e}", self.channel);
        }
    }

    fn process_departures(&mut self) {
        if self.departures.is_empty() || self.engine.is_blast_running() {
            return;
        }
        for position in std::mem::take(&mut self.departures) {
            if self.engine.is_finished() {
                break;
            }
            let session = self.engine.session();
            let player = PlayerId::from_position(position)
                .filter(|p| p.index() < session.player_count());
            let already_out = player
                .and_then(|p| session.color_of(p))
                .is_some_and(|color| session.is_eliminated(color));

            if already_out {
                info!("position {position} left after elimination");
            } else {
                info!("position {position} left the match unfinished");
                self.engine.conclude(GameOutcome::Abandoned { player });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerColor;
    use crate::sync::MemoryTransport;

    fn session(position: u8) -> OnlineSession<MemoryTransport> {
        let assignment = MatchAssignment {
            rows: 3,
            columns: 3,
            total_players: 2,
            assigned_position: position,
            channel: "presence-test".to_string(),
        };
        let base = GameConfig::new(vec![PlayerColor::Red, PlayerColor::Green]);
        let mut session =
            OnlineSession::start(&assignment, base, SyncConfig::default(), MemoryTransport::new()).unwrap();
        let other = 3 - position;
        session.on_peer_message(PeerMessage::Ready {
            position: other,
            waiting: false,
        });
        session
    }

    #[test]
    fn test_initial_turn_ownership() {
        let first = session(1);
        let second = session(2);

        assert_eq!(first.is_it_my_turn(), TurnOwnership::Mine);
        assert!(!first.is_waiting_for_opponent());
        assert_eq!(second.is_it_my_turn(), TurnOwnership::Theirs);
        assert!(second.is_waiting_for_opponent());
        assert!(!second.accepts_local_input());
    }

    #[test]
    fn test_local_move_is_broadcast_after_settling() {
        let mut first = session(1);

        assert!(first.submit_local_move(Coordinate::new(1, 1)));
        assert!(!first.submit_local_move(Coordinate::new(0, 0)), "previous input pending");

        first.tick(Duration::from_millis(16));

        assert_eq!(first.processed_count(), 1);
        assert!(first.is_waiting_for_opponent());
        let outbox = first.transport_mut().take_outbox();
        assert_eq!(outbox.len(), 1);
        let PeerMessage::Move(mv) = PeerMessage::decode(&outbox[0]).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(mv.sequence, 1);
        assert_eq!(mv.position, 1);
    }

    #[test]
    fn test_duplicate_remote_move_dropped() {
        let mut second = session(2);
        let mv = SequencedMove::remote(Coordinate::new(0, 0), 1, 1);

        assert!(second.on_remote_move(mv));
        assert!(!second.on_remote_move(mv), "already buffered");
        second.tick(Duration::from_millis(16));
        assert!(!second.on_remote_move(mv), "already applied");
        assert_eq!(second.processed_count(), 1);
    }

    #[test]
    fn test_ready_from_unknown_seat_ignored() {
        let mut first = session(1);
        first.reset();

        for position in [0, 1, 3] {
            first.on_peer_message(PeerMessage::Ready {
                position,
                waiting: true,
            });
        }

        assert!(!first.is_started());
        assert_eq!(first.confirmed_seats().len(), 1);
        assert_eq!(first.is_it_my_turn(), TurnOwnership::Undetermined);
        assert!(first.transport_mut().take_outbox().is_empty());
    }

    #[test]
    fn test_stale_timer_is_noop() {
        let mut first = session(1);
        let token = first.schedule(TimerKind::ResendProbe);

        first.reset();
        assert!(!first.fire_timer(token));
        assert!(first.fire_timer(first.schedule(TimerKind::Settle)));

        first.quit();
        assert!(!first.fire_timer(first.schedule(TimerKind::Settle)));
        assert!(!first.is_running());
    }
}
