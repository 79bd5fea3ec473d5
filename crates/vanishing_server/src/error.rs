//! Session error types.
//!
//! None of these reach the wire. The dispatcher logs them and the offending
//! request is dropped without touching room state.

use crate::RoomId;
use vanishing_tictactoe::MoveError;

/// Reasons a participant request was rejected.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum SessionError {
    /// The rule engine refused the move.
    #[display("Invalid move: {}", _0)]
    #[from]
    InvalidMove(MoveError),

    /// The claimed symbol differs from the sender's assignment.
    #[display("Move claims a symbol the sender does not hold")]
    SymbolMismatch,

    /// The sender does not hold the current turn.
    #[display("Not your turn")]
    NotYourTurn,

    /// The match in this room is already over.
    #[display("Match is not active")]
    MatchInactive,

    /// Stale or unknown room reference.
    #[display("Unknown room {}", _0)]
    UnknownRoom(#[error(not(source))] RoomId),

    /// The sender is not seated in the referenced room.
    #[display("Participant is not in this room")]
    NotInRoom,

    /// A second resolution of an already finished match.
    #[display("Match already resolved")]
    DoubleResolution,
}
