//! Open-line detection used by the move planner.
//!
//! An open line for a symbol holds exactly two of its marks and one empty
//! cell; playing the empty cell completes it.

use super::LINES;
use crate::{Board, Square, Symbol};

fn open_cell(board: &Board, line: [usize; 3], symbol: Symbol) -> Option<usize> {
    let owned = line
        .iter()
        .filter(|&&i| board.get(i) == Some(Square::Occupied(symbol)))
        .count();
    let empty = line.iter().copied().find(|&i| board.is_empty(i));
    (owned == 2).then_some(empty).flatten()
}

/// Empty cell of the first open line for `symbol`, in line scan order.
///
/// For the mover this is a winning cell; for the opponent it is the cell to
/// block.
pub fn completing_cell(board: &Board, symbol: Symbol) -> Option<usize> {
    LINES
        .iter()
        .find_map(|&line| open_cell(board, line, symbol))
}

/// Like [`completing_cell`], but skips lines that contain `excluded`.
///
/// Used with the opponent's oldest mark: a line through that mark dissolves
/// when the mark vanishes, so only the remaining threats need a block.
pub fn threat_avoiding(board: &Board, symbol: Symbol, excluded: usize) -> Option<usize> {
    LINES
        .iter()
        .filter(|line| !line.contains(&excluded))
        .find_map(|&line| open_cell(board, line, symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_gap_in_line() {
        let mut board = Board::new();
        board.set(0, Square::Occupied(Symbol::X));
        board.set(2, Square::Occupied(Symbol::X));
        assert_eq!(completing_cell(&board, Symbol::X), Some(1));
        assert_eq!(completing_cell(&board, Symbol::O), None);
    }

    #[test]
    fn blocked_line_is_not_open() {
        let mut board = Board::new();
        board.set(0, Square::Occupied(Symbol::X));
        board.set(1, Square::Occupied(Symbol::X));
        board.set(2, Square::Occupied(Symbol::O));
        assert_eq!(completing_cell(&board, Symbol::X), None);
    }

    #[test]
    fn excluded_mark_hides_its_lines() {
        let mut board = Board::new();
        board.set(0, Square::Occupied(Symbol::X));
        board.set(1, Square::Occupied(Symbol::X));
        assert_eq!(threat_avoiding(&board, Symbol::X, 0), None);
        assert_eq!(threat_avoiding(&board, Symbol::X, 5), Some(2));
    }
}
