//! Board representation and the cascade algorithm.
//!
//! - `Cell`: an occupied square (`level` orbs of one colour)
//! - `Board`: flat `CellKey -> Cell` map; empty squares are absent
//! - `CascadeWave`: one simultaneous detonation step
//!
//! ## Example
//!
//! ```
//! use chain_reaction::board::{Board, CascadeWave, Cell};
//! use chain_reaction::core::{BoardDims, Coordinate, CosmeticRng, PlayerColor, WaveColorPolicy};
//!
//! let mut board = Board::new(BoardDims::new(3, 3));
//! board.insert(Cell::new(Coordinate::new(0, 0), PlayerColor::Red, 2, [1.0, 0.0, 0.0]));
//!
//! let wave = CascadeWave::scan(&board, WaveColorPolicy::FirstBomb).expect("corner is explosive");
//! wave.resolve(&mut board, &mut CosmeticRng::new(1));
//!
//! assert!(board.get(Coordinate::new(0, 0)).is_none());
//! assert_eq!(board.get(Coordinate::new(1, 0)).map(|c| c.level), Some(1));
//! ```

mod cell;
mod grid;
mod wave;

pub use cell::{Cell, CosmeticAxes};
pub use grid::Board;
pub use wave::{Bomb, CascadeWave, NeighborIncrement, WaveResolution};
