//! Move results and errors.

use crate::Symbol;
use serde::{Deserialize, Serialize};

/// What a successful move did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Cell that received the mark.
    pub index: usize,
    /// Symbol that moved.
    pub symbol: Symbol,
    /// Cell of the opposing mark evicted by this move, if any.
    pub vanished: Option<usize>,
    /// Whether this move armed the vanish rule.
    pub armed_now: bool,
}

/// Error that can occur when applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Index outside 0-8.
    #[display("Cell {} is out of range (0-8)", _0)]
    OutOfRange(#[error(not(source))] usize),

    /// The cell already holds a live mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(#[error(not(source))] usize),

    /// The match has already been decided.
    #[display("Match is already over")]
    MatchOver,
}
