//! Board cells.

use serde::{Deserialize, Serialize};

use crate::core::{BoardDims, CellKey, Coordinate, PlayerColor};

/// Render-only rotation axis of the orbs in a cell.
pub type CosmeticAxes = [f32; 3];

/// An occupied cell: `level` orbs of one colour.
///
/// Empty cells are not represented; a board only holds cells with
/// `level >= 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Where the cell sits.
    pub coord: Coordinate,

    /// Colour owning every orb in the cell.
    pub color: PlayerColor,

    /// Number of orbs (always at least 1).
    pub level: u32,

    /// Rotation axis for the renderer. Ignored by the rules.
    pub axes: CosmeticAxes,
}

impl Cell {
    /// Create a cell.
    #[must_use]
    pub fn new(coord: Coordinate, color: PlayerColor, level: u32, axes: CosmeticAxes) -> Self {
        debug_assert!(level >= 1, "cells hold at least one orb");
        Self {
            coord,
            color,
            level,
            axes,
        }
    }

    /// Board key of this cell.
    #[must_use]
    pub fn key(&self) -> CellKey {
        self.coord.key()
    }

    /// Has the cell reached its critical mass?
    #[must_use]
    pub fn is_explosive(&self, dims: &BoardDims) -> bool {
        self.level >= dims.critical_mass(self.coord)
    }
}
