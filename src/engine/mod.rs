//! The board engine: session state, undo and the cascade driver.
//!
//! - `GameSession`: players, turn counter, eliminations and the board
//! - `BoardEngine`: applies moves and drives cascade waves, parameterised
//!   over a `SessionPolicy`
//! - `EngineEvent`: notifications for whatever drives the engine

mod board_engine;
mod event;
mod session;

pub use board_engine::BoardEngine;
pub use event::EngineEvent;
pub use session::{Elimination, GameSession, UndoSnapshot};
