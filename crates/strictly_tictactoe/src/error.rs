//! Errors raised by the board.

use derive_more::{Display, Error};

/// A move the board refused to apply.
///
/// Both variants are recoverable: the square is left untouched and the
/// same player may try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// Position is not one of the nine squares.
    #[display("Position {position} is out of range (must be 0-8)")]
    OutOfRange {
        /// The rejected position.
        position: usize,
    },

    /// The square already holds a mark.
    #[display("Square {position} is already occupied")]
    Occupied {
        /// The rejected position.
        position: usize,
    },
}

/// Board text that could not be turned back into a board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardParseError {
    /// Wrong number of glyphs.
    #[display("Board text has {found} cells, expected 9")]
    WrongLength {
        /// Number of glyphs found before the line terminator.
        found: usize,
    },

    /// A glyph outside `' '`, `'X'`, `'O'`.
    #[display("Unknown glyph {glyph:?} at cell {index}")]
    UnknownGlyph {
        /// The offending character.
        glyph: char,
        /// Cell index of the offending character.
        index: usize,
    },
}
