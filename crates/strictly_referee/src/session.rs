//! One game between two seated players.
//!
//! The turn loop is strictly sequential: the board goes to the player whose
//! mark is to move, the referee waits for that one reply, validates it and
//! either re-prompts the same player or applies the move and checks for a
//! result. Nothing else talks to a player in the meantime.

use crate::error::SessionError;
use crate::player::{Player, parse_move};
use derive_new::new;
use strictly_tictactoe::{Board, CELLS, GameStatus, Mark};
use tracing::{debug, info, instrument, warn};

/// Messages sent from the session to whoever renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A turn is about to be requested; carries the current board.
    BoardChanged {
        /// Board as it stands.
        board: Board,
        /// Mark to move.
        to_move: Mark,
    },
    /// A reply was rejected; the same player is asked again.
    InvalidMove {
        /// Player that sent it.
        player: String,
        /// Raw reply, trimmed.
        reply: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Move was made.
    MoveMade {
        /// Player that moved.
        player: String,
        /// Mark placed.
        mark: Mark,
        /// Square taken.
        position: usize,
    },
    /// Game ended.
    GameOver {
        /// Final board.
        board: Board,
        /// Result.
        outcome: Outcome,
    },
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Outcome {
    /// Three in a row.
    #[display("Winner: {mark} ({player})")]
    Won {
        /// Winning mark.
        mark: Mark,
        /// Player holding it.
        player: String,
    },
    /// Full board, no line.
    #[display("It's a draw!")]
    Draw,
}

/// A mark bound to a player for one session.
#[derive(new)]
pub struct Seat {
    mark: Mark,
    player: Box<dyn Player>,
}

impl Seat {
    /// Mark played from this seat.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Player name.
    pub fn name(&self) -> &str {
        self.player.name()
    }

    /// Releases the player behind the seat.
    pub async fn shutdown(&mut self) {
        debug!(player = %self.player.name(), "Shutting down seat");
        self.player.shutdown().await;
    }
}

impl std::fmt::Debug for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seat")
            .field("mark", &self.mark)
            .field("player", &self.player.name())
            .finish()
    }
}

/// Board plus seated players.
///
/// The session owns its board and seats; nothing is shared between
/// sessions.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    seats: Vec<Seat>,
    to_move: Mark,
}

impl GameSession {
    /// Creates a session over already-connected seats. X moves first.
    #[instrument(skip(seats), fields(seats = seats.len()))]
    pub fn new(seats: Vec<Seat>) -> Self {
        info!("Creating new game session");
        Self {
            board: Board::new(),
            seats,
            to_move: Mark::X,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves applied so far.
    pub fn move_count(&self) -> usize {
        self.board.move_count()
    }

    /// Seats, in roster order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Plays until a win, a draw, or a player stops answering.
    ///
    /// Rejected replies re-prompt the same player with the same board, with
    /// no limit: a player that never sends a legal move stalls its turn.
    #[instrument(skip_all)]
    pub async fn play<F>(&mut self, mut observe: F) -> Result<Outcome, SessionError>
    where
        F: FnMut(&GameEvent) + Send,
    {
        info!("Starting game");

        loop {
            let mark = self.to_move;
            observe(&GameEvent::BoardChanged {
                board: self.board.clone(),
                to_move: mark,
            });

            let seat = self
                .seats
                .iter_mut()
                .find(|seat| seat.mark == mark)
                .ok_or(SessionError::Unseated { mark })?;
            let name = seat.player.name().to_string();

            let board_text = format!("{}\n", self.board.serialize());
            debug!(player = %name, %mark, "Waiting for move");
            let reply = seat.player.request_move(&board_text).await.map_err(|source| {
                warn!(player = %name, error = %source, "Player failed to provide a move");
                SessionError::Communication {
                    peer: name.clone(),
                    mark,
                    source,
                }
            })?;

            let applied = in_range(&reply).and_then(|position| {
                self.board
                    .apply_move(position, mark)
                    .map(|()| position)
                    .map_err(|e| e.to_string())
            });
            let position = match applied {
                Ok(position) => position,
                Err(reason) => {
                    warn!(player = %name, reply = %reply.trim(), %reason, "Invalid move");
                    observe(&GameEvent::InvalidMove {
                        player: name,
                        reply: reply.trim().to_string(),
                        reason,
                    });
                    continue;
                }
            };
            info!(player = %name, %mark, position, "Move made");
            observe(&GameEvent::MoveMade {
                player: name.clone(),
                mark,
                position,
            });

            let outcome = match self.board.status() {
                GameStatus::InProgress => {
                    self.to_move = mark.opponent();
                    continue;
                }
                GameStatus::Won(mark) => Outcome::Won { mark, player: name },
                GameStatus::Draw => Outcome::Draw,
            };

            info!(%outcome, moves = self.board.move_count(), "Game over");
            observe(&GameEvent::GameOver {
                board: self.board.clone(),
                outcome: outcome.clone(),
            });
            return Ok(outcome);
        }
    }

    /// Shuts down every seat. Safe to call more than once.
    #[instrument(skip(self))]
    pub async fn teardown(&mut self) {
        for seat in &mut self.seats {
            seat.shutdown().await;
        }
    }
}

/// Reads a reply as a board position, or says why it is not one.
fn in_range(reply: &str) -> Result<usize, String> {
    let value = parse_move(reply);
    usize::try_from(value)
        .ok()
        .filter(|&pos| pos < CELLS)
        .ok_or_else(|| format!("Move {} is outside 0-8", value))
}
