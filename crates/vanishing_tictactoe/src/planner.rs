//! Heuristic computer opponent.
//!
//! Three tiers of rule-based move selection. The hard tier adds a single
//! hard-coded look-ahead over the vanish rule: when the opponent holds three
//! live marks, its oldest mark will disappear on the planner's move, so
//! threats through that mark can be ignored and lines it blocks can be
//! claimed early.

use crate::rules::{completing_cell, threat_avoiding};
use crate::{CENTER, MatchState, Symbol};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Chance that the easy tier bothers to block an open line.
pub const EASY_BLOCK_CHANCE: f64 = 1.0 / 3.0;

/// Opponent live-mark count at which the hard tier looks ahead.
const LOOKAHEAD_COUNT: usize = 3;

/// Planner strength.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Mostly random, occasionally blocks.
    #[default]
    Easy,
    /// Wins, blocks, takes the center.
    Medium,
    /// Medium plus vanish-aware look-ahead.
    Hard,
}

/// Chooses a cell for `me`, or `None` when the board is full.
#[instrument(skip(state, rng), fields(turn = state.turn_count()))]
pub fn plan<R: Rng + ?Sized>(
    state: &MatchState,
    me: Symbol,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<usize> {
    let choice = match difficulty {
        Difficulty::Easy => easy(state, me, rng),
        Difficulty::Medium => medium(state, me, rng),
        Difficulty::Hard => hard(state, me, rng),
    };
    debug!(?choice, "Planner chose cell");
    choice
}

fn random_cell<R: Rng + ?Sized>(state: &MatchState, rng: &mut R) -> Option<usize> {
    state.board().available_cells().choose(rng).copied()
}

fn center(state: &MatchState) -> Option<usize> {
    state.board().is_empty(CENTER).then_some(CENTER)
}

fn easy<R: Rng + ?Sized>(state: &MatchState, me: Symbol, rng: &mut R) -> Option<usize> {
    if rng.random_bool(EASY_BLOCK_CHANCE)
        && let Some(block) = completing_cell(state.board(), me.opponent())
    {
        return Some(block);
    }
    random_cell(state, rng)
}

fn medium<R: Rng + ?Sized>(state: &MatchState, me: Symbol, rng: &mut R) -> Option<usize> {
    let board = state.board();
    completing_cell(board, me)
        .or_else(|| completing_cell(board, me.opponent()))
        .or_else(|| center(state))
        .or_else(|| random_cell(state, rng))
}

fn hard<R: Rng + ?Sized>(state: &MatchState, me: Symbol, rng: &mut R) -> Option<usize> {
    let board = state.board();
    let opponent = me.opponent();

    if let Some(win) = completing_cell(board, me) {
        return Some(win);
    }

    if let Some(cell) = vanish_lookahead(state, me) {
        return Some(cell);
    }

    completing_cell(board, opponent)
        .or_else(|| center(state))
        .or_else(|| random_cell(state, rng))
}

/// The hard tier's one-ply simulation of the opponent's next eviction.
///
/// 1. Block an opponent threat that does not run through its oldest mark;
///    that threat survives the eviction.
/// 2. Otherwise, clear the oldest mark on a scratch board and take a winning
///    cell there, provided the cell is also empty on the real board.
fn vanish_lookahead(state: &MatchState, me: Symbol) -> Option<usize> {
    let opponent = me.opponent();
    let queues = state.queues();
    if queues.live(opponent) != LOOKAHEAD_COUNT {
        return None;
    }
    let oldest = queues.oldest(opponent)?;
    let board = state.board();

    if let Some(block) = threat_avoiding(board, opponent, oldest) {
        debug!(oldest, block, "Blocking threat that outlives eviction");
        return Some(block);
    }

    let mut after = board.clone();
    after.clear(oldest);
    completing_cell(&after, me)
        .filter(|&cell| board.is_empty(cell))
        .inspect(|&cell| debug!(oldest, cell, "Claiming line opened by eviction"))
}
