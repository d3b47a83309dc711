//! The board: a flat, ordered map from `CellKey` to `Cell`.
//!
//! Backed by `im::OrdMap` so that:
//! - snapshots for undo are O(1) clones
//! - iteration follows key order on every peer

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::cell::Cell;
use crate::core::{BoardDims, CellKey, Coordinate, PlayerColor};

/// Board contents for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    dims: BoardDims,
    cells: OrdMap<CellKey, Cell>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(dims: BoardDims) -> Self {
        Self {
            dims,
            cells: OrdMap::new(),
        }
    }

    /// Board dimensions.
    #[must_use]
    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at a coordinate.
    #[must_use]
    pub fn get(&self, coord: Coordinate) -> Option<&Cell> {
        self.cells.get(&coord.key())
    }

    /// Cell by key.
    #[must_use]
    pub fn get_key(&self, key: CellKey) -> Option<&Cell> {
        self.cells.get(&key)
    }

    /// Mutable cell by key.
    pub fn get_key_mut(&mut self, key: CellKey) -> Option<&mut Cell> {
        self.cells.get_mut(&key)
    }

    /// Place a cell, replacing whatever was there.
    ///
    /// Out-of-bounds cells are ignored and returned back.
    pub fn insert(&mut self, cell: Cell) -> Option<Cell> {
        if !self.dims.contains(cell.coord) {
            return Some(cell);
        }
        self.cells.insert(cell.key(), cell);
        None
    }

    /// Remove a cell.
    pub fn remove(&mut self, key: CellKey) -> Option<Cell> {
        self.cells.remove(&key)
    }

    /// Remove every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Iterate over cells in key order.
    pub fn iter(&self) -> impl Iterator<Item = (CellKey, &Cell)> {
        self.cells.iter().map(|(k, c)| (*k, c))
    }

    /// Cells at or above their critical mass, in key order.
    pub fn explosive_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values().filter(move |c| c.is_explosive(&self.dims))
    }

    /// Does any cell belong to `color`?
    #[must_use]
    pub fn has_color(&self, color: PlayerColor) -> bool {
        self.cells.values().any(|c| c.color == color)
    }

    /// Total orbs owned by `color`.
    #[must_use]
    pub fn orbs_of(&self, color: PlayerColor) -> u32 {
        self.cells
            .values()
            .filter(|c| c.color == color)
            .map(|c| c.level)
            .sum()
    }

    /// Total orbs on the board.
    #[must_use]
    pub fn total_orbs(&self) -> u32 {
        self.cells.values().map(|c| c.level).sum()
    }

    /// `(coordinate, colour, level)` for every cell, ignoring cosmetic axes.
    #[must_use]
    pub fn layout(&self) -> Vec<(Coordinate, PlayerColor, u32)> {
        self.cells
            .values()
            .map(|c| (c.coord, c.color, c.level))
            .collect()
    }
}
