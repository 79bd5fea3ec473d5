//! Game rules for vanishing tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Rules are kept apart from
//! match bookkeeping so the planner can evaluate hypothetical boards.

pub mod threat;
pub mod win;

pub use threat::{completing_cell, threat_avoiding};
pub use win::{LINES, check_win};
