//! Tests for the board state machine.

use strictly_tictactoe::{Board, GameStatus, Mark, MoveError, Square, rules::LINES};

fn play(board: &mut Board, moves: &[usize]) {
    let mut mark = Mark::X;
    for &pos in moves {
        board.apply_move(pos, mark).unwrap();
        mark = mark.opponent();
    }
}

#[test]
fn test_top_row_win_for_x() {
    let mut board = Board::new();
    play(&mut board, &[0, 4, 1, 5, 2]);
    assert_eq!(board.winner(), Some(Mark::X));
    assert_eq!(board.status(), GameStatus::Won(Mark::X));
    assert_eq!(board.move_count(), 5);
}

#[test]
fn test_blocked_top_row_has_no_winner() {
    // X: 0, 1, 7  O: 4, 2
    let mut board = Board::new();
    play(&mut board, &[0, 4, 1, 2, 7]);
    assert_eq!(board.winner(), None);
    assert_eq!(board.status(), GameStatus::InProgress);
}

#[test]
fn test_full_board_without_line_is_draw() {
    // X O X / X O O / O X X
    let board = Board::parse("XOXXOOOXX").unwrap();
    assert_eq!(board.winner(), None);
    assert!(board.is_full());
    assert_eq!(board.status(), GameStatus::Draw);
}

#[test]
fn test_occupied_square_rejected() {
    let mut board = Board::new();
    board.apply_move(4, Mark::X).unwrap();
    let result = board.apply_move(4, Mark::O);
    assert_eq!(result, Err(MoveError::Occupied { position: 4 }));
    assert_eq!(board.get(4), Some(Square::Occupied(Mark::X)));
    assert_eq!(board.move_count(), 1);
}

#[test]
fn test_moves_never_overwrite() {
    let mut board = Board::new();
    let mut mark = Mark::X;
    // Every position tried twice: second attempt must always fail.
    for pos in [4, 0, 8, 2, 6, 1, 7, 3, 5] {
        board.apply_move(pos, mark).unwrap();
        let before = board.clone();
        assert!(board.apply_move(pos, mark.opponent()).is_err());
        assert_eq!(board, before);
        mark = mark.opponent();
    }
    let occupied = board.squares().iter().filter(|sq| **sq != Square::Empty).count();
    assert_eq!(occupied, board.move_count());
}

#[test]
fn test_full_only_after_nine_moves() {
    let mut board = Board::new();
    let mut mark = Mark::X;
    for pos in 0..9 {
        assert!(!board.is_full());
        board.apply_move(pos, mark).unwrap();
        mark = mark.opponent();
    }
    assert!(board.is_full());
    assert!(board.empty_positions().is_empty());
}

#[test]
fn test_each_line_detected_for_both_marks() {
    for line in LINES {
        for mark in [Mark::X, Mark::O] {
            let mut board = Board::new();
            for pos in line {
                board.apply_move(pos, mark).unwrap();
            }
            assert_eq!(board.winner(), Some(mark), "line {line:?}");
        }
    }
}

#[test]
fn test_serialize_then_parse_reconstructs_board() {
    let mut board = Board::new();
    play(&mut board, &[4, 0, 8, 2]);
    let wire = format!("{}\n", board.serialize());

    let echoed = Board::parse(&wire).unwrap();
    assert_eq!(echoed, board);
    assert_eq!(echoed.serialize(), board.serialize());
}

#[test]
fn test_reset_serializes_nine_blanks() {
    let mut board = Board::new();
    play(&mut board, &[0, 1, 2]);
    board.reset();
    assert_eq!(board.serialize(), "         ");
    assert_eq!(board.empty_positions(), (0..9).collect::<Vec<_>>());
}
