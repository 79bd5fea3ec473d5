//! Match state and the vanish policy.
//!
//! Each symbol keeps a FIFO of the cells it currently holds. Once the vanish
//! rule is armed, every move evicts the oldest live mark of the player who
//! did *not* move. Arming is keyed to `O` reaching three live marks, never to
//! `X`, and it never disarms within a match.
//!
//! Eviction does not enforce a cap of three per player. Occupancy oscillates:
//! after `O` arms the rule `X` drops to two, `X`'s reply restores three and
//! trims `O` to two, and so on.

use crate::{Board, MoveError, Placement, Square, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Live marks needed by `O` to arm the vanish rule.
pub const ARMING_COUNT: usize = 3;

/// Cells currently held by each symbol, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveQueues {
    x: VecDeque<usize>,
    o: VecDeque<usize>,
}

impl MoveQueues {
    /// Queue for `symbol`.
    pub fn get(&self, symbol: Symbol) -> &VecDeque<usize> {
        match symbol {
            Symbol::X => &self.x,
            Symbol::O => &self.o,
        }
    }

    fn get_mut(&mut self, symbol: Symbol) -> &mut VecDeque<usize> {
        match symbol {
            Symbol::X => &mut self.x,
            Symbol::O => &mut self.o,
        }
    }

    /// Number of live marks held by `symbol`.
    pub fn live(&self, symbol: Symbol) -> usize {
        self.get(symbol).len()
    }

    /// Oldest live cell of `symbol`.
    pub fn oldest(&self, symbol: Symbol) -> Option<usize> {
        self.get(symbol).front().copied()
    }
}

/// Complete state of one round.
///
/// Owned by whichever side is authoritative: the local controller in local
/// play, the room on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    board: Board,
    queues: MoveQueues,
    armed: bool,
    active_symbol: Symbol,
    turn_count: u32,
    is_active: bool,
}

impl MatchState {
    /// Fresh round: empty board, `X` to move, first turn, active.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            queues: MoveQueues::default(),
            armed: false,
            active_symbol: Symbol::X,
            turn_count: 1,
            is_active: true,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the move queues.
    pub fn queues(&self) -> &MoveQueues {
        &self.queues
    }

    /// Whether the vanish rule is armed.
    pub fn armed(&self) -> bool {
        self.armed
    }

    /// Symbol whose turn it is.
    pub fn active_symbol(&self) -> Symbol {
        self.active_symbol
    }

    /// Turn number within the round, starting at 1.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Whether the round is still being played.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Places `symbol` at `index` and applies the vanish policy.
    ///
    /// Only range and occupancy are checked here; turn order is the caller's
    /// concern.
    #[instrument(skip(self), fields(armed = self.armed))]
    pub fn apply_move(&mut self, index: usize, symbol: Symbol) -> Result<Placement, MoveError> {
        match self.board.get(index) {
            None => return Err(MoveError::OutOfRange(index)),
            Some(Square::Occupied(_)) => return Err(MoveError::Occupied(index)),
            Some(Square::Empty) => {}
        }

        self.board.set(index, Square::Occupied(symbol));
        self.queues.get_mut(symbol).push_back(index);

        let armed_now = !self.armed && self.queues.live(Symbol::O) == ARMING_COUNT;
        if armed_now {
            debug!("Vanish rule armed");
            self.armed = true;
        }

        let vanished = if self.armed {
            let other = symbol.opponent();
            self.queues.get_mut(other).pop_front().inspect(|&cell| {
                self.board.clear(cell);
                debug!(cell, symbol = %other, "Oldest mark vanished");
            })
        } else {
            None
        };

        Ok(Placement {
            index,
            symbol,
            vanished,
            armed_now,
        })
    }

    /// Hands the turn to the other symbol and bumps the turn counter.
    pub fn advance_turn(&mut self) {
        self.active_symbol = self.active_symbol.opponent();
        self.turn_count += 1;
    }

    /// Marks the round as decided.
    pub fn finish(&mut self) {
        self.is_active = false;
    }

    /// Starts a new round in place.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
