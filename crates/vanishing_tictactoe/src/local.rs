//! Local play: two players sharing a screen, or a human against the planner.
//!
//! The human is always `X` against the computer. Moves go through the same
//! [`MatchState::apply_move`] the server uses.

use crate::planner::{Difficulty, plan};
use crate::rules::check_win;
use crate::{MatchState, MoveError, Placement, Symbol};
use rand::Rng;
use std::time::Duration;
use tracing::{info, instrument};

/// Per-turn clock shared by multiplayer turns and the hard local tier.
pub const TURN_TIMEOUT: Duration = Duration::from_millis(3000);

/// Who is on the other side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalMode {
    /// Two humans alternate on one device.
    TwoPlayer,
    /// The human plays `X` against the planner at the given tier.
    VsComputer(Difficulty),
}

/// How a local match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalResult {
    /// A line was completed.
    Won(Symbol),
    /// The human's clock ran out; the computer wins.
    TimedOut,
}

/// Result of one applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTurn {
    /// Board effect of the move.
    pub placement: Placement,
    /// Set when the move ended the match.
    pub winner: Option<Symbol>,
}

/// A locally-owned match.
#[derive(Debug, Clone)]
pub struct LocalMatch {
    mode: LocalMode,
    state: MatchState,
    result: Option<LocalResult>,
}

impl LocalMatch {
    /// Starts a match in the given mode.
    #[instrument]
    pub fn new(mode: LocalMode) -> Self {
        info!("Starting local match");
        Self {
            mode,
            state: MatchState::new(),
            result: None,
        }
    }

    /// Returns the mode.
    pub fn mode(&self) -> LocalMode {
        self.mode
    }

    /// Returns the match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// How the match ended, if it has.
    pub fn result(&self) -> Option<LocalResult> {
        self.result
    }

    /// Whether the planner should move next.
    pub fn is_computer_turn(&self) -> bool {
        matches!(self.mode, LocalMode::VsComputer(_))
            && self.state.is_active()
            && self.state.active_symbol() == Symbol::O
    }

    /// Plays the active symbol at `index`.
    #[instrument(skip(self), fields(symbol = %self.state.active_symbol()))]
    pub fn play(&mut self, index: usize) -> Result<LocalTurn, MoveError> {
        if !self.state.is_active() {
            return Err(MoveError::MatchOver);
        }
        let symbol = self.state.active_symbol();
        let placement = self.state.apply_move(index, symbol)?;
        let winner = check_win(self.state.board());
        match winner {
            Some(winner) => {
                info!(%winner, "Local match won");
                self.state.finish();
                self.result = Some(LocalResult::Won(winner));
            }
            None => self.state.advance_turn(),
        }
        Ok(LocalTurn { placement, winner })
    }

    /// Lets the planner play `O`. Returns `None` when it is not the
    /// computer's turn or no cell is free.
    pub fn computer_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<LocalTurn> {
        let LocalMode::VsComputer(difficulty) = self.mode else {
            return None;
        };
        if !self.is_computer_turn() {
            return None;
        }
        let index = plan(&self.state, Symbol::O, difficulty, rng)?;
        self.play(index).ok()
    }

    /// Clock for the human's current turn.
    ///
    /// Only the hard tier times the human, and only once `X` has a mark on
    /// the board.
    pub fn human_clock(&self) -> Option<Duration> {
        let timed = self.mode == LocalMode::VsComputer(Difficulty::Hard)
            && self.state.is_active()
            && self.state.active_symbol() == Symbol::X
            && self.state.queues().live(Symbol::X) > 0;
        timed.then_some(TURN_TIMEOUT)
    }

    /// Ends the match because the human's clock expired.
    #[instrument(skip(self))]
    pub fn time_out(&mut self) {
        if self.state.is_active() {
            info!("Human clock expired");
            self.state.finish();
            self.result = Some(LocalResult::TimedOut);
        }
    }

    /// Clears the board for a new round in the same mode.
    pub fn restart(&mut self) {
        self.state.reset();
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn two_player_alternates() {
        let mut game = LocalMatch::new(LocalMode::TwoPlayer);
        game.play(0).unwrap();
        assert_eq!(game.state().active_symbol(), Symbol::O);
        assert_eq!(game.play(0), Err(MoveError::Occupied(0)));
        assert_eq!(game.state().active_symbol(), Symbol::O);
    }

    #[test]
    fn win_ends_match() {
        let mut game = LocalMatch::new(LocalMode::TwoPlayer);
        for i in [0, 3, 1, 4] {
            game.play(i).unwrap();
        }
        let turn = game.play(2).unwrap();
        assert_eq!(turn.winner, Some(Symbol::X));
        assert_eq!(game.result(), Some(LocalResult::Won(Symbol::X)));
        assert_eq!(game.play(5), Err(MoveError::MatchOver));
    }

    #[test]
    fn clock_only_in_hard_after_first_mark() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut hard = LocalMatch::new(LocalMode::VsComputer(Difficulty::Hard));
        assert_eq!(hard.human_clock(), None);
        hard.play(0).unwrap();
        assert_eq!(hard.human_clock(), None);
        hard.computer_move(&mut rng).unwrap();
        assert_eq!(hard.human_clock(), Some(TURN_TIMEOUT));

        let mut medium = LocalMatch::new(LocalMode::VsComputer(Difficulty::Medium));
        medium.play(0).unwrap();
        medium.computer_move(&mut rng).unwrap();
        assert_eq!(medium.human_clock(), None);
    }

    #[test]
    fn time_out_hands_match_to_computer() {
        let mut game = LocalMatch::new(LocalMode::VsComputer(Difficulty::Hard));
        game.time_out();
        assert_eq!(game.result(), Some(LocalResult::TimedOut));
        assert!(!game.state().is_active());
        game.restart();
        assert_eq!(game.result(), None);
        assert!(game.state().is_active());
    }

    #[test]
    fn computer_waits_for_its_turn() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = LocalMatch::new(LocalMode::VsComputer(Difficulty::Easy));
        assert!(game.computer_move(&mut rng).is_none());
        game.play(4).unwrap();
        assert!(game.computer_move(&mut rng).is_some());
        assert_eq!(game.state().active_symbol(), Symbol::X);
    }
}
