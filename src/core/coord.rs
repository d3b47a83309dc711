//! Board coordinates and the flat key space.
//!
//! ## CellKey
//!
//! The board is a flat map rather than a 2-D grid. Every coordinate is folded
//! into a single integer with the Cantor pairing function
//!
//! ```text
//! key = (x + y)(x + y + 1) / 2 + y
//! ```
//!
//! which is a bijection, so the coordinate can always be recovered from the
//! key. Neighbour identity is pure arithmetic on coordinates: no adjacency is
//! ever stored.
//!
//! ## BoardDims
//!
//! Bounds checking, critical mass and neighbour enumeration for a board of
//! `rows` x `columns`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A board position: `x` is the column, `y` is the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Fold this coordinate into its Cantor key.
    #[must_use]
    pub fn key(self) -> CellKey {
        CellKey::pair(self.x, self.y)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for Coordinate {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// Cantor-paired cell key.
///
/// Pairing is exact while `x + y < 2^31`, far beyond any playable board.
///
/// Keys order by their integer value, which gives every peer the same
/// iteration order over a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey(pub u64);

impl CellKey {
    /// Pair `(x, y)` into a single key.
    ///
    /// ```
    /// use chain_reaction::core::CellKey;
    ///
    /// assert_eq!(CellKey::pair(0, 0).raw(), 0);
    /// assert_eq!(CellKey::pair(1, 0).raw(), 1);
    /// assert_eq!(CellKey::pair(0, 1).raw(), 2);
    /// assert_eq!(CellKey::pair(2, 3).raw(), 18);
    /// ```
    #[must_use]
    pub fn pair(x: u32, y: u32) -> Self {
        let (x, y) = (u64::from(x), u64::from(y));
        let w = x + y;
        Self(w * (w + 1) / 2 + y)
    }

    /// Recover the coordinate this key was paired from.
    #[must_use]
    pub fn unpair(self) -> Coordinate {
        let z = self.0;
        let w = triangular_root(z);
        let t = w * (w + 1) / 2;
        let y = z - t;
        let x = w - y;
        // Keys produced by `pair` always fit back into u32 components.
        Coordinate::new(x as u32, y as u32)
    }

    /// Get the raw key value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({})", self.0)
    }
}

/// Largest `w` with `w(w+1)/2 <= z`.
fn triangular_root(z: u64) -> u64 {
    let z = u128::from(z);
    // Float estimate, then fix up the rounding error exactly.
    let mut w = ((((8 * z + 1) as f64).sqrt() - 1.0) / 2.0).floor() as u128;
    while w > 0 && w * (w + 1) / 2 > z {
        w -= 1;
    }
    while (w + 1) * (w + 2) / 2 <= z {
        w += 1;
    }
    w as u64
}

/// Board dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardDims {
    pub rows: u32,
    pub columns: u32,
}

impl BoardDims {
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Is the coordinate on the board?
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x < self.columns && coord.y < self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// In-bounds orthogonal neighbours, in the order right, left, up, down.
    #[must_use]
    pub fn neighbors(&self, coord: Coordinate) -> SmallVec<[Coordinate; 4]> {
        let mut out = SmallVec::new();
        if coord.x + 1 < self.columns {
            out.push(Coordinate::new(coord.x + 1, coord.y));
        }
        if coord.x >= 1 {
            out.push(Coordinate::new(coord.x - 1, coord.y));
        }
        if coord.y + 1 < self.rows {
            out.push(Coordinate::new(coord.x, coord.y + 1));
        }
        if coord.y >= 1 {
            out.push(Coordinate::new(coord.x, coord.y - 1));
        }
        out
    }

    /// Number of in-bounds orthogonal neighbours: 2 at a corner, 3 on an
    /// edge, 4 in the interior.
    #[must_use]
    pub fn critical_mass(&self, coord: Coordinate) -> u32 {
        self.neighbors(coord).len() as u32
    }

    /// Iterate over every coordinate, row by row.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.columns).map(move |x| Coordinate::new(x, y)))
    }
}

impl std::fmt::Display for BoardDims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}
