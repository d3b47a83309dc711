//! Cascade waves.
//!
//! A wave is one simultaneous detonation step: every cell that is explosive
//! when the wave starts blows up together. Each bomb sends one orb to every
//! in-bounds neighbour; orbs headed for the same neighbour are summed first
//! and applied once.
//!
//! Chains are driven by repeated resolution: after a wave resolves the board
//! is scanned again and a new wave starts if anything is explosive.
//!
//! ## Over-critical bombs
//!
//! A bomb above its critical mass still sends exactly one orb per neighbour;
//! the excess disappears with the bomb.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::cell::Cell;
use super::grid::Board;
use crate::core::{CellKey, Coordinate, CosmeticRng, PlayerColor, WaveColorPolicy};

/// A cell detonating in the current wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bomb {
    pub key: CellKey,
    pub coord: Coordinate,
    pub color: PlayerColor,
    pub level: u32,
}

/// Pending change for one neighbour of the wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborIncrement {
    pub key: CellKey,
    /// Orbs arriving (one per adjacent bomb).
    pub amount: u32,
    /// Colour the neighbour ends up with.
    pub color: PlayerColor,
}

/// Orb accounting for one resolved wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveResolution {
    /// Orbs removed with the detonated cells.
    pub removed: u32,
    /// Orbs handed to neighbours.
    pub distributed: u32,
    /// Neighbour cells that did not exist before the wave.
    pub created: u32,
}

/// State of the wave currently in flight.
#[derive(Clone, Debug)]
pub struct CascadeWave {
    bombs: SmallVec<[Bomb; 4]>,
    increments: Vec<NeighborIncrement>,
    displacement: f32,
}

impl CascadeWave {
    /// Capture the explosive cells of `board` and aggregate their
    /// neighbour increments.
    ///
    /// Returns `None` when nothing on the board is explosive.
    #[must_use]
    pub fn scan(board: &Board, policy: WaveColorPolicy) -> Option<Self> {
        let dims = board.dims();
        let bombs: SmallVec<[Bomb; 4]> = board
            .explosive_cells()
            .map(|c| Bomb {
                key: c.key(),
                coord: c.coord,
                color: c.color,
                level: c.level,
            })
            .collect();

        let first_color = bombs.first()?.color;

        let mut pending: FxHashMap<CellKey, (u32, PlayerColor)> = FxHashMap::default();
        for bomb in &bombs {
            for neighbor in dims.neighbors(bomb.coord) {
                let entry = pending
                    .entry(neighbor.key())
                    .or_insert((0, first_color));
                entry.0 += 1;
                if policy == WaveColorPolicy::LastContributor {
                    entry.1 = bomb.color;
                }
            }
        }

        let mut increments: Vec<NeighborIncrement> = pending
            .into_iter()
            .map(|(key, (amount, color))| NeighborIncrement { key, amount, color })
            .collect();
        increments.sort_unstable_by_key(|inc| inc.key);

        Some(Self {
            bombs,
            increments,
            displacement: 0.0,
        })
    }

    /// Cells detonating in this wave, in key order.
    #[must_use]
    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    /// Aggregated neighbour increments, in key order.
    #[must_use]
    pub fn increments(&self) -> &[NeighborIncrement] {
        &self.increments
    }

    /// Pending increment for a neighbour key, if any.
    #[must_use]
    pub fn increment_for(&self, key: CellKey) -> Option<&NeighborIncrement> {
        self.increments
            .binary_search_by_key(&key, |inc| inc.key)
            .ok()
            .map(|i| &self.increments[i])
    }

    /// Is the cell at `key` one of this wave's bombs?
    #[must_use]
    pub fn is_bomb(&self, key: CellKey) -> bool {
        self.bombs.iter().any(|b| b.key == key)
    }

    /// How far the outgoing orbs have travelled, in world units.
    #[must_use]
    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    /// Move the outgoing orbs by `distance`.
    ///
    /// Returns true once they have covered `cell_width`.
    pub fn advance(&mut self, distance: f32, cell_width: f32) -> bool {
        self.displacement += distance;
        self.displacement >= cell_width
    }

    /// Apply the wave to the board: delete every bomb, then add each
    /// neighbour increment, creating cells where needed.
    pub fn resolve(self, board: &mut Board, rng: &mut CosmeticRng) -> WaveResolution {
        let mut report = WaveResolution::default();

        for bomb in &self.bombs {
            if let Some(cell) = board.remove(bomb.key) {
                report.removed += cell.level;
            }
        }

        for inc in &self.increments {
            report.distributed += inc.amount;
            if let Some(cell) = board.get_key_mut(inc.key) {
                cell.level += inc.amount;
                cell.color = inc.color;
            } else {
                board.insert(Cell::new(inc.key.unpair(), inc.color, inc.amount, rng.rotation_axes()));
                report.created += 1;
            }
        }

        report
    }
}
