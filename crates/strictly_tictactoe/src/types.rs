//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Glyph used on the wire for an empty square.
pub const EMPTY_GLYPH: char = ' ';

/// Mark a player places on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Player X (always moves first).
    X,
    /// Player O (moves second).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    #[instrument]
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Returns the wire glyph for this mark.
    pub fn glyph(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the wire glyph for this square.
    pub fn glyph(self) -> char {
        match self {
            Square::Empty => EMPTY_GLYPH,
            Square::Occupied(mark) => mark.glyph(),
        }
    }

    /// Parses a wire glyph back into a square.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            EMPTY_GLYPH => Some(Square::Empty),
            'X' => Some(Square::Occupied(Mark::X)),
            'O' => Some(Square::Occupied(Mark::O)),
            _ => None,
        }
    }

    /// Returns the occupying mark, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// Current status of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended with three in a row.
    Won(Mark),
    /// Board is full with no line.
    Draw,
}

impl GameStatus {
    /// Returns true for won and drawn boards.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}
