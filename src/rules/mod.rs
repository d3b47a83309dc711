//! Mode-specific rules.
//!
//! Local and online games share one `BoardEngine`; the differences (turn
//! ownership checks, watcher mode, how the winner is reported) live in a
//! `SessionPolicy` the engine is parameterised over.

pub mod policy;

pub use policy::{GameOutcome, LocalPolicy, OnlinePolicy, SessionPolicy, WatchChoice};
