//! The 3x3 board and its move state machine.

use crate::error::{BoardParseError, MoveError};
use crate::rules;
use crate::types::{GameStatus, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Number of squares on the board.
pub const CELLS: usize = 9;

/// 3x3 tic-tac-toe board.
///
/// Squares are stored in row-major order (0-8). The only way to place a mark
/// is [`Board::apply_move`], which never overwrites an occupied square, so the
/// move count always equals the number of occupied squares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [Square; CELLS],
    moves: usize,
}

impl Board {
    /// Creates a new empty board.
    #[instrument]
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; CELLS],
            moves: 0,
        }
    }

    /// Clears every square and the move count.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<Square> {
        self.squares.get(pos).copied()
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; CELLS] {
        &self.squares
    }

    /// Number of moves applied since the board was created or reset.
    pub fn move_count(&self) -> usize {
        self.moves
    }

    /// Places `mark` at `position`.
    ///
    /// Rejects positions outside 0-8 and occupied squares, leaving the board
    /// untouched. Does not look at the game status: placing marks on a
    /// finished board is the caller's mistake.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, position: usize, mark: Mark) -> Result<(), MoveError> {
        match self.squares.get(position) {
            None => Err(MoveError::OutOfRange { position }),
            Some(Square::Occupied(_)) => Err(MoveError::Occupied { position }),
            Some(Square::Empty) => {
                self.squares[position] = Square::Occupied(mark);
                self.moves += 1;
                debug!(position, %mark, moves = self.moves, "Move applied");
                Ok(())
            }
        }
    }

    /// Returns the winning mark, if any line is complete.
    pub fn winner(&self) -> Option<Mark> {
        rules::check_winner(self)
    }

    /// True when no empty square remains.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// Terminal check. A win takes precedence over a full board.
    #[instrument(skip(self))]
    pub fn status(&self) -> GameStatus {
        if let Some(mark) = self.winner() {
            GameStatus::Won(mark)
        } else if self.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    /// Positions of all empty squares, in index order.
    pub fn empty_positions(&self) -> Vec<usize> {
        (0..CELLS).filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Renders the board as nine wire glyphs in index order.
    pub fn serialize(&self) -> String {
        self.squares.iter().map(|sq| sq.glyph()).collect()
    }

    /// Rebuilds a board from its wire text.
    ///
    /// A trailing `\n` or `\r\n` is accepted. The move count is taken to be
    /// the number of occupied squares.
    #[instrument]
    pub fn parse(text: &str) -> Result<Self, BoardParseError> {
        let cells = text.trim_end_matches(['\r', '\n']);
        let found = cells.chars().count();
        if found != CELLS {
            return Err(BoardParseError::WrongLength { found });
        }

        let mut board = Self::new();
        for (index, glyph) in cells.chars().enumerate() {
            let square = Square::from_glyph(glyph)
                .ok_or(BoardParseError::UnknownGlyph { glyph, index })?;
            if square != Square::Empty {
                board.moves += 1;
            }
            board.squares[index] = square;
        }
        Ok(board)
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty squares show their index so a player can see which number to
    /// type.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.squares[pos] {
                    Square::Empty => result.push_str(&pos.to_string()),
                    Square::Occupied(mark) => result.push(mark.glyph()),
                }
                if col < 2 {
                    result.push_str(" | ");
                }
            }
            if row < 2 {
                result.push_str("\n--+---+--\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
