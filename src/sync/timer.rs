//! Revocable timer tokens.
//!
//! Scheduled callbacks cannot be cancelled once handed to the host's timer
//! facility. Instead each callback carries a token stamped with the session
//! generation it was scheduled in; resetting or quitting bumps the
//! generation and every older token turns into a no-op when it fires.

use serde::{Deserialize, Serialize};

/// What a scheduled callback should do when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Ask peers for the next missing move.
    ResendProbe,
    /// Re-evaluate turn ownership after a move once the cascade is over.
    Settle,
    /// Announce this seat as ready while the match has not started.
    ReadyBeacon,
}

/// A callback scheduled during one session generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    generation: u64,
    kind: TimerKind,
}

impl TimerToken {
    #[must_use]
    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Monotonic session counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    #[must_use]
    pub fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn current(&self) -> u64 {
        self.0
    }

    /// Invalidate every token issued so far.
    pub fn bump(&mut self) {
        self.0 += 1;
    }

    /// Token for a callback scheduled now.
    #[must_use]
    pub fn token(&self, kind: TimerKind) -> TimerToken {
        TimerToken {
            generation: self.0,
            kind,
        }
    }

    /// Was `token` issued in the current generation?
    #[must_use]
    pub fn is_current(&self, token: &TimerToken) -> bool {
        token.generation == self.0
    }
}
