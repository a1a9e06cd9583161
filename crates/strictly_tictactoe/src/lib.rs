//! Pure tic-tac-toe game logic.
//!
//! The [`Board`] is the single source of truth for a game: it validates and
//! applies moves, detects wins and draws, and converts itself to and from the
//! nine-glyph text used on the wire between the referee and its players.
//!
//! ```
//! use strictly_tictactoe::{Board, GameStatus, Mark};
//!
//! let mut board = Board::new();
//! for (pos, mark) in [(0, Mark::X), (4, Mark::O), (1, Mark::X), (2, Mark::O), (7, Mark::X)] {
//!     board.apply_move(pos, mark).unwrap();
//! }
//! assert_eq!(board.serialize(), "XXO O  X ");
//! assert_eq!(board.status(), GameStatus::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod types;

pub mod rules;

pub use board::{Board, CELLS};
pub use error::{BoardParseError, MoveError};
pub use types::{EMPTY_GLYPH, GameStatus, Mark, Square};
