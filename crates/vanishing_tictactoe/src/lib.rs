//! Vanishing tic-tac-toe - pure game logic.
//!
//! Classic 3x3 tic-tac-toe with one twist: once `O` has placed its third
//! live mark, every move erases the oldest live mark of the player who did
//! not move. The rules here carry no I/O and are shared verbatim by local
//! play and the authoritative multiplayer server.
//!
//! # Example
//!
//! ```
//! use vanishing_tictactoe::{MatchState, Symbol, check_win};
//!
//! let mut state = MatchState::new();
//! state.apply_move(4, Symbol::X)?;
//! assert_eq!(check_win(state.board()), None);
//! # Ok::<(), vanishing_tictactoe::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod local;
mod planner;
pub mod rules;
mod state;
mod types;

pub use action::{MoveError, Placement};
pub use local::{LocalMatch, LocalMode, LocalResult, LocalTurn, TURN_TIMEOUT};
pub use planner::{Difficulty, EASY_BLOCK_CHANCE, plan};
pub use rules::check_win;
pub use state::{ARMING_COUNT, MatchState, MoveQueues};
pub use types::{Board, CELLS, CENTER, Square, Symbol};
