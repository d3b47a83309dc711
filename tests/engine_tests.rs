//! Board engine behaviour: moves, cascades, turns, elimination and undo.

use std::time::Duration;

use chain_reaction::core::{Coordinate, GameConfig, PlayerColor, PlayerId};
use chain_reaction::engine::{BoardEngine, EngineEvent};
use chain_reaction::rules::{GameOutcome, LocalPolicy};

const RED: PlayerId = PlayerId::new(0);
const GREEN: PlayerId = PlayerId::new(1);

fn engine(rows: u32, columns: u32, policy: LocalPolicy) -> BoardEngine {
    let config = GameConfig::new(vec![PlayerColor::Red, PlayerColor::Green])
        .with_dims(rows, columns)
        .with_seed(42);
    BoardEngine::new(config, policy).unwrap()
}

/// Run the cascade to completion. Returns true if it ended the game.
fn settle(engine: &mut BoardEngine) -> bool {
    let mut ended = false;
    for _ in 0..1000 {
        if !engine.is_blast_running() {
            break;
        }
        ended |= engine.advance_cascade(Duration::from_millis(60));
    }
    ended
}

fn play(engine: &mut BoardEngine, x: u32, y: u32, player: PlayerId) -> bool {
    let accepted = engine.apply_move(Coordinate::new(x, y), player);
    settle(engine);
    accepted
}

#[test]
fn test_move_levels() {
    let mut engine = engine(3, 3, LocalPolicy::strict());

    assert!(play(&mut engine, 1, 1, RED));
    assert_eq!(engine.board().get(Coordinate::new(1, 1)).map(|c| c.level), Some(1));

    assert!(play(&mut engine, 0, 2, GREEN));
    assert!(play(&mut engine, 1, 1, RED));
    assert_eq!(engine.board().get(Coordinate::new(1, 1)).map(|c| c.level), Some(2));

    // Green may not touch red's cell; nothing changes, green still to move.
    let before = engine.session().snapshot();
    assert!(!engine.apply_move(Coordinate::new(1, 1), GREEN));
    assert_eq!(engine.session().snapshot(), before);
    assert_eq!(engine.current_player(), GREEN);
}

/// Two moves at a corner by the same player, with turn enforcement off.
#[test]
fn test_corner_scenario() {
    let mut engine = engine(3, 3, LocalPolicy::free_play());

    assert!(engine.apply_move(Coordinate::new(0, 0), RED));
    assert!(!engine.is_blast_running());
    assert!(engine.apply_move(Coordinate::new(0, 0), RED));
    assert!(engine.is_blast_running());

    let ended = settle(&mut engine);

    assert!(!ended);
    assert!(engine.board().get(Coordinate::new(0, 0)).is_none());
    assert_eq!(
        engine.board().layout(),
        vec![
            (Coordinate::new(1, 0), PlayerColor::Red, 1),
            (Coordinate::new(0, 1), PlayerColor::Red, 1),
        ]
    );
    // Green owns nothing yet but the opening round protects it.
    assert!(engine.session().eliminated().is_empty());
}

#[test]
fn test_chain_of_two_waves() {
    let mut engine = engine(3, 3, LocalPolicy::free_play());
    play(&mut engine, 2, 2, GREEN);
    play(&mut engine, 1, 0, RED);
    play(&mut engine, 1, 0, RED);
    play(&mut engine, 0, 0, RED);
    engine.drain_events();

    // (0,0) blows first and pushes the edge cell (1,0) to critical mass.
    assert!(engine.apply_move(Coordinate::new(0, 0), RED));
    settle(&mut engine);

    let resolved = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, EngineEvent::WaveResolved { .. }))
        .count();
    assert_eq!(resolved, 2);
    assert_eq!(engine.board().total_orbs(), 5);
    assert_eq!(
        engine.board().layout(),
        vec![
            (Coordinate::new(0, 0), PlayerColor::Red, 1),
            (Coordinate::new(0, 1), PlayerColor::Red, 1),
            (Coordinate::new(2, 0), PlayerColor::Red, 1),
            (Coordinate::new(1, 1), PlayerColor::Red, 1),
            (Coordinate::new(2, 2), PlayerColor::Green, 1),
        ]
    );
}

#[test]
fn test_event_sequence_for_cascade() {
    let mut engine = engine(3, 3, LocalPolicy::free_play());
    play(&mut engine, 0, 0, RED);
    engine.drain_events();

    engine.apply_move(Coordinate::new(0, 0), RED);
    settle(&mut engine);

    let events = engine.drain_events();
    assert!(matches!(events[0], EngineEvent::MovePlaced { level: 2, .. }));
    assert_eq!(events[1], EngineEvent::WaveStarted { bombs: 1 });
    assert!(matches!(events[2], EngineEvent::WaveResolved { .. }));
    assert_eq!(events[3], EngineEvent::TurnChanged { player: RED });
    assert_eq!(events.len(), 4);
}

/// On a 2x2 board every cell is a corner. Green's reply captures both of
/// red's cells in one wave.
#[test]
fn test_elimination_and_winner() {
    let mut engine = engine(2, 2, LocalPolicy::strict());
    play(&mut engine, 0, 0, RED);
    play(&mut engine, 1, 1, GREEN);
    play(&mut engine, 0, 0, RED);
    assert_eq!(engine.current_player(), GREEN);
    assert!(!engine.is_finished());

    assert!(engine.apply_move(Coordinate::new(1, 1), GREEN));
    let ended = settle(&mut engine);

    assert!(ended);
    assert!(engine.session().is_eliminated(PlayerColor::Red));
    let outcome = engine.outcome().copied().unwrap();
    assert_eq!(
        outcome,
        GameOutcome::Winner {
            player: GREEN,
            color: PlayerColor::Green
        }
    );
    assert_eq!(outcome.to_string(), "Player 2 (green) has won");
    assert!(!engine.is_blast_running());
    assert!(!engine.apply_move(Coordinate::new(0, 1), GREEN));

    let events = engine.drain_events();
    assert!(events.contains(&EngineEvent::PlayerEliminated {
        player: RED,
        color: PlayerColor::Red
    }));
    assert!(events.last().is_some_and(EngineEvent::is_game_over));
}

#[test]
fn test_undo_restores_exact_state() {
    let mut engine = engine(3, 3, LocalPolicy::free_play());
    play(&mut engine, 2, 2, GREEN);
    play(&mut engine, 0, 0, RED);
    play(&mut engine, 0, 1, RED);

    let before = bincode::serialize(&engine.session().snapshot()).unwrap();

    play(&mut engine, 0, 0, RED);
    assert_ne!(bincode::serialize(&engine.session().snapshot()).unwrap(), before);

    assert!(engine.undo());
    assert_eq!(bincode::serialize(&engine.session().snapshot()).unwrap(), before);

    assert!(!engine.undo());
    assert_eq!(bincode::serialize(&engine.session().snapshot()).unwrap(), before);
}

#[test]
fn test_undo_emits_turn_change() {
    let mut engine = engine(3, 3, LocalPolicy::strict());
    play(&mut engine, 1, 1, RED);
    engine.drain_events();

    engine.undo();

    assert_eq!(
        engine.drain_events(),
        vec![EngineEvent::Undone, EngineEvent::TurnChanged { player: RED }]
    );
    assert_eq!(engine.current_player(), RED);
}

#[test]
fn test_manual_eliminate() {
    let mut engine = engine(3, 3, LocalPolicy::strict());
    play(&mut engine, 0, 0, RED);
    play(&mut engine, 2, 2, GREEN);

    let elimination = engine.eliminate(false);
    assert!(elimination.newly_eliminated.is_empty());
    assert!(!elimination.turn_advanced);

    let elimination = engine.eliminate(true);
    assert!(elimination.turn_advanced);
    assert_eq!(engine.current_player(), GREEN);
}

#[test]
fn test_board_sizes_from_config() {
    let config = GameConfig::new(vec![PlayerColor::Cyan, PlayerColor::Maroon, PlayerColor::Grey]);
    let engine = BoardEngine::new(config, LocalPolicy::strict()).unwrap();

    assert_eq!(engine.config().dims.rows, 8);
    assert_eq!(engine.config().dims.columns, 6);
    assert_eq!(engine.session().player_count(), 3);
    assert!(engine.is_ready());
}
