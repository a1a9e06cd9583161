//! Win detection logic for tic-tac-toe.

use crate::{Board, Mark, Square};
use tracing::instrument;

/// The eight winning lines, in evaluation order.
///
/// Rows first, then columns, then the two diagonals.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Checks if there is a winner on the board.
///
/// Returns the mark of the first line in [`LINES`] whose three squares hold
/// the same mark. Boards with more than one complete line cannot arise from
/// alternating play, but they still resolve to the first match.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    for [a, b, c] in LINES {
        let sq = board.get(a);
        if sq != Some(Square::Empty) && sq == board.get(b) && sq == board.get(c) {
            return sq.and_then(Square::mark);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(mark: Mark, positions: &[usize]) -> Board {
        let mut board = Board::new();
        for &pos in positions {
            board.apply_move(pos, mark).unwrap();
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_every_line_wins_in_isolation() {
        for line in LINES {
            assert_eq!(check_winner(&board_with(Mark::X, &line)), Some(Mark::X), "{line:?}");
            assert_eq!(check_winner(&board_with(Mark::O, &line)), Some(Mark::O), "{line:?}");
        }
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(Mark::X, &[0, 1, 5]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let mut board = board_with(Mark::X, &[0, 1]);
        board.apply_move(2, Mark::O).unwrap();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_first_line_in_order_wins() {
        // Not reachable by alternating play: O holds the middle row, X the top row.
        let mut board = board_with(Mark::O, &[3, 4, 5]);
        for pos in [0, 1, 2] {
            board.apply_move(pos, Mark::X).unwrap();
        }
        assert_eq!(check_winner(&board), Some(Mark::X));
    }
}
