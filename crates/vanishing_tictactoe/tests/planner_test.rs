//! Tests for the heuristic move planner.

use rand::rngs::StdRng;
use rand::SeedableRng;
use strum::IntoEnumIterator;
use vanishing_tictactoe::{Difficulty, MatchState, Symbol, plan};

fn play(moves: &[(usize, Symbol)]) -> MatchState {
    let mut state = MatchState::new();
    for &(i, s) in moves {
        state.apply_move(i, s).expect("legal move");
    }
    state
}

/// X holds {1, 8, 2} with 1 oldest; O holds {4, 7}.
fn three_x_marks() -> MatchState {
    let state = play(&[
        (0, Symbol::X),
        (3, Symbol::O),
        (1, Symbol::X),
        (4, Symbol::O),
        (8, Symbol::X),
        (7, Symbol::O),
        (2, Symbol::X),
    ]);
    assert_eq!(state.queues().oldest(Symbol::X), Some(1));
    assert_eq!(state.queues().live(Symbol::X), 3);
    state
}

#[test]
fn test_hard_blocks_threat_that_survives_eviction() {
    let state = three_x_marks();
    let mut rng = StdRng::seed_from_u64(1);
    // [0,1,2] runs through the oldest mark and is ignored; [2,5,8] is not.
    assert_eq!(plan(&state, Symbol::O, Difficulty::Hard, &mut rng), Some(5));
}

#[test]
fn test_medium_blocks_first_threat_in_scan_order() {
    let state = three_x_marks();
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(plan(&state, Symbol::O, Difficulty::Medium, &mut rng), Some(0));
}

#[test]
fn test_hard_takes_own_win_before_lookahead() {
    // O holds {3, 4}, X holds {0, 1, 8}: X threatens 2, O wins at 5.
    let state = play(&[
        (0, Symbol::X),
        (3, Symbol::O),
        (1, Symbol::X),
        (4, Symbol::O),
        (8, Symbol::X),
    ]);
    let mut rng = StdRng::seed_from_u64(2);
    assert_eq!(plan(&state, Symbol::O, Difficulty::Hard, &mut rng), Some(5));
}

#[test]
fn test_hard_never_plays_the_evicted_cell() {
    // O holds {0, 1}; the gap at 2 is X's oldest mark.
    let state = play(&[
        (2, Symbol::X),
        (0, Symbol::O),
        (4, Symbol::X),
        (1, Symbol::O),
        (8, Symbol::X),
    ]);
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(plan(&state, Symbol::O, Difficulty::Hard, &mut rng), Some(5));
}

#[test]
fn test_hard_falls_back_to_center() {
    let state = play(&[(0, Symbol::X)]);
    let mut rng = StdRng::seed_from_u64(4);
    assert_eq!(plan(&state, Symbol::O, Difficulty::Hard, &mut rng), Some(4));
}

#[test]
fn test_easy_blocks_only_sometimes() {
    let state = play(&[(0, Symbol::X), (4, Symbol::O), (1, Symbol::X)]);
    let mut rng = StdRng::seed_from_u64(5);
    let blocks = (0..600)
        .filter(|_| plan(&state, Symbol::O, Difficulty::Easy, &mut rng) == Some(2))
        .count();
    // One third deliberate, plus a 1/6 chance of picking 2 at random otherwise.
    assert!((200..400).contains(&blocks), "blocked {blocks} times");
}

#[test]
fn test_every_tier_returns_none_on_full_board() {
    let mut state = MatchState::new();
    // O never reaches three marks, so nothing vanishes.
    for (i, s) in [
        (0, Symbol::X),
        (1, Symbol::X),
        (2, Symbol::O),
        (3, Symbol::O),
        (4, Symbol::X),
        (5, Symbol::X),
        (6, Symbol::X),
        (7, Symbol::X),
        (8, Symbol::X),
    ] {
        state.apply_move(i, s).unwrap();
    }
    assert!(state.board().available_cells().is_empty());
    let mut rng = StdRng::seed_from_u64(6);
    for tier in Difficulty::iter() {
        assert_eq!(plan(&state, Symbol::O, tier, &mut rng), None, "{tier}");
    }
}
