//! Win detection.

use crate::{Board, Square, Symbol};
use tracing::instrument;

/// The eight winning lines in scan order: rows, then columns, then diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the symbol owning the first uniform line in [`LINES`] order.
#[instrument(skip(board))]
pub fn check_win(board: &Board) -> Option<Symbol> {
    LINES.iter().find_map(|&[a, b, c]| {
        let sq = board.get(a)?;
        match sq {
            Square::Occupied(symbol) if board.get(b) == Some(sq) && board.get(c) == Some(sq) => {
                Some(symbol)
            }
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(marks: &[(usize, Symbol)]) -> Board {
        let mut board = Board::new();
        for &(i, s) in marks {
            board.set(i, Square::Occupied(s));
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_win(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(&[(0, Symbol::X), (1, Symbol::X), (2, Symbol::X)]);
        assert_eq!(check_win(&board), Some(Symbol::X));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_with(&[(2, Symbol::O), (4, Symbol::O), (6, Symbol::O)]);
        assert_eq!(check_win(&board), Some(Symbol::O));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = board_with(&[(0, Symbol::X), (1, Symbol::O), (2, Symbol::X)]);
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_every_line_is_detected() {
        for line in LINES {
            let marks: Vec<_> = line.iter().map(|&i| (i, Symbol::O)).collect();
            assert_eq!(check_win(&board_with(&marks)), Some(Symbol::O), "{line:?}");
        }
    }

    #[test]
    fn test_rows_scan_top_to_bottom() {
        // O owns row 0 and X owns row 1; the earlier row is reported.
        let board = board_with(&[
            (0, Symbol::O),
            (1, Symbol::O),
            (2, Symbol::O),
            (3, Symbol::X),
            (4, Symbol::X),
            (5, Symbol::X),
        ]);
        assert_eq!(check_win(&board), Some(Symbol::O));

        let swapped = board_with(&[
            (0, Symbol::X),
            (1, Symbol::X),
            (2, Symbol::X),
            (3, Symbol::O),
            (4, Symbol::O),
            (5, Symbol::O),
        ]);
        assert_eq!(check_win(&swapped), Some(Symbol::X));
    }

    #[test]
    fn test_columns_scan_left_to_right() {
        let board = board_with(&[
            (0, Symbol::O),
            (3, Symbol::O),
            (6, Symbol::O),
            (1, Symbol::X),
            (4, Symbol::X),
            (7, Symbol::X),
        ]);
        assert_eq!(check_win(&board), Some(Symbol::O));

        let shifted = board_with(&[
            (1, Symbol::O),
            (4, Symbol::O),
            (7, Symbol::O),
            (2, Symbol::X),
            (5, Symbol::X),
            (8, Symbol::X),
        ]);
        assert_eq!(check_win(&shifted), Some(Symbol::O));
    }
}
