//! Board and cascade-wave properties.
//!
//! Cantor keys, critical mass and per-wave orb accounting, checked over
//! arbitrary inputs with proptest.

use chain_reaction::board::{Board, CascadeWave, Cell};
use chain_reaction::core::{BoardDims, CellKey, Coordinate, CosmeticRng, PlayerColor, WaveColorPolicy};
use proptest::prelude::*;

fn cell(x: u32, y: u32, color: PlayerColor, level: u32) -> Cell {
    Cell::new(Coordinate::new(x, y), color, level, [1.0, 1.0, 1.0])
}

proptest! {
    #[test]
    fn cantor_round_trip(x in 0u32..1_000_000, y in 0u32..1_000_000) {
        let key = CellKey::pair(x, y);
        prop_assert_eq!(key.unpair(), Coordinate::new(x, y));
    }

    #[test]
    fn cantor_is_injective(a in (0u32..500, 0u32..500), b in (0u32..500, 0u32..500)) {
        prop_assume!(a != b);
        prop_assert_ne!(CellKey::pair(a.0, a.1), CellKey::pair(b.0, b.1));
    }

    #[test]
    fn critical_mass_by_position(rows in 2u32..20, columns in 2u32..20, seed in any::<u64>()) {
        let dims = BoardDims::new(rows, columns);
        let x = (seed % u64::from(columns)) as u32;
        let y = ((seed >> 32) % u64::from(rows)) as u32;
        let coord = Coordinate::new(x, y);

        let on_x_edge = x == 0 || x == columns - 1;
        let on_y_edge = y == 0 || y == rows - 1;
        let expected = match (on_x_edge, on_y_edge) {
            (true, true) => 2,
            (true, false) | (false, true) => 3,
            (false, false) => 4,
        };

        prop_assert_eq!(dims.critical_mass(coord), expected);
        prop_assert!(dims.neighbors(coord).iter().all(|n| dims.contains(*n)));
    }

    /// With every bomb exactly at critical mass, a wave moves orbs without
    /// creating or destroying any.
    #[test]
    fn wave_conserves_orbs_at_critical_mass(
        rows in 2u32..8,
        columns in 2u32..8,
        picks in proptest::collection::vec(any::<u32>(), 1..12),
    ) {
        let dims = BoardDims::new(rows, columns);
        let mut board = Board::new(dims);
        for pick in picks {
            let coord = Coordinate::new(pick % columns, (pick / columns) % rows);
            board.insert(cell(coord.x, coord.y, PlayerColor::Red, dims.critical_mass(coord)));
        }
        let before = board.total_orbs();

        let wave = CascadeWave::scan(&board, WaveColorPolicy::FirstBomb).expect("every cell is explosive");
        let report = wave.resolve(&mut board, &mut CosmeticRng::new(9));

        prop_assert_eq!(report.removed, report.distributed);
        prop_assert_eq!(board.total_orbs(), before);
        prop_assert!(board.iter().all(|(_, c)| c.level >= 1));
    }
}

#[test]
fn corner_explodes_into_both_neighbours() {
    let mut board = Board::new(BoardDims::new(3, 3));
    board.insert(cell(0, 0, PlayerColor::Red, 2));

    let wave = CascadeWave::scan(&board, WaveColorPolicy::FirstBomb).unwrap();
    assert!(wave.is_bomb(CellKey::pair(0, 0)));
    wave.resolve(&mut board, &mut CosmeticRng::new(0));

    assert_eq!(
        board.layout(),
        vec![
            (Coordinate::new(1, 0), PlayerColor::Red, 1),
            (Coordinate::new(0, 1), PlayerColor::Red, 1),
        ]
    );
}

#[test]
fn neighbour_is_captured_by_bomb_colour() {
    let mut board = Board::new(BoardDims::new(3, 3));
    board.insert(cell(0, 0, PlayerColor::Red, 2));
    board.insert(cell(1, 0, PlayerColor::Green, 1));

    CascadeWave::scan(&board, WaveColorPolicy::FirstBomb)
        .unwrap()
        .resolve(&mut board, &mut CosmeticRng::new(0));

    let captured = board.get(Coordinate::new(1, 0)).unwrap();
    assert_eq!(captured.color, PlayerColor::Red);
    assert_eq!(captured.level, 2);
    assert!(!board.has_color(PlayerColor::Green));
}

/// Bombs of two colours share the neighbour (1,0). Key order puts (0,0)
/// (key 0) before (2,0) (key 3).
#[test]
fn mixed_colour_wave_policies() {
    let mut board = Board::new(BoardDims::new(3, 3));
    board.insert(cell(0, 0, PlayerColor::Red, 2));
    board.insert(cell(2, 0, PlayerColor::Blue, 2));

    let mut first = board.clone();
    CascadeWave::scan(&first, WaveColorPolicy::FirstBomb)
        .unwrap()
        .resolve(&mut first, &mut CosmeticRng::new(0));
    assert_eq!(first.get(Coordinate::new(1, 0)).map(|c| c.color), Some(PlayerColor::Red));
    assert_eq!(first.get(Coordinate::new(2, 1)).map(|c| c.color), Some(PlayerColor::Red));

    let mut last = board;
    CascadeWave::scan(&last, WaveColorPolicy::LastContributor)
        .unwrap()
        .resolve(&mut last, &mut CosmeticRng::new(0));
    assert_eq!(last.get(Coordinate::new(1, 0)).map(|c| c.color), Some(PlayerColor::Blue));
    assert_eq!(last.get(Coordinate::new(0, 1)).map(|c| c.color), Some(PlayerColor::Red));
    assert_eq!(last.get(Coordinate::new(2, 1)).map(|c| c.color), Some(PlayerColor::Blue));
    assert_eq!(last.get(Coordinate::new(1, 0)).map(|c| c.level), Some(2));
}

#[test]
fn created_cells_get_nonzero_axes() {
    let mut board = Board::new(BoardDims::new(4, 4));
    board.insert(cell(1, 1, PlayerColor::Pink, 4));

    CascadeWave::scan(&board, WaveColorPolicy::FirstBomb)
        .unwrap()
        .resolve(&mut board, &mut CosmeticRng::new(77));

    assert_eq!(board.len(), 4);
    for (_, created) in board.iter() {
        assert!(created.axes.iter().any(|a| *a != 0.0));
    }
}
