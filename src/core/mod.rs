//! Core types: coordinates, players, configuration, cosmetic RNG.
//!
//! Everything here is independent of the rules; the board, engine and sync
//! layers build on top of these.

pub mod coord;
pub mod player;
pub mod config;
pub mod rng;
pub mod error;

pub use coord::{BoardDims, CellKey, Coordinate};
pub use player::{PlayerColor, PlayerId};
pub use config::{GameConfig, SyncConfig, WaveColorPolicy};
pub use rng::CosmeticRng;
pub use error::ConfigError;
