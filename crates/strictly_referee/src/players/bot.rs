//! Automated players.

use crate::error::PlayerError;
use crate::player::{Player, format_move};
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use strictly_tictactoe::Board;
use tracing::{debug, info, instrument, warn};

/// Picks a square for a bot.
pub trait Strategy: Send {
    /// Returns an empty position, or `None` when there is none.
    fn choose(&mut self, board: &Board) -> Option<usize>;
}

/// Uniformly random empty square, from a generator the bot owns.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
    seed: u64,
}

impl RandomStrategy {
    /// Reproducible strategy for a fixed seed.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        info!(seed, "Seeding random strategy");
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Strategy seeded from OS randomness. The seed is logged so a game can
    /// be replayed.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    /// Seed this strategy started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Strategy for RandomStrategy {
    fn choose(&mut self, board: &Board) -> Option<usize> {
        board.empty_positions().choose(&mut self.rng).copied()
    }
}

/// First empty square in index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFreeStrategy;

impl Strategy for FirstFreeStrategy {
    fn choose(&mut self, board: &Board) -> Option<usize> {
        board.empty_positions().first().copied()
    }
}

/// Automated player driven by a [`Strategy`].
#[derive(Debug)]
pub struct BotPlayer<S> {
    name: String,
    strategy: S,
}

impl<S: Strategy> BotPlayer<S> {
    /// Creates a bot.
    pub fn new(name: impl Into<String>, strategy: S) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }
}

#[async_trait::async_trait]
impl<S: Strategy> Player for BotPlayer<S> {
    #[instrument(skip(self), fields(bot = %self.name))]
    async fn request_move(&mut self, board_text: &str) -> Result<String, PlayerError> {
        let choice = match Board::parse(board_text) {
            Ok(board) if board.status().is_terminal() => {
                debug!(status = ?board.status(), "Game already over, passing");
                None
            }
            Ok(board) => self.strategy.choose(&board),
            Err(e) => {
                warn!(error = %e, "Unreadable board text, passing");
                None
            }
        };
        debug!(?choice, "Bot chose move");
        Ok(format_move(choice))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_free_takes_lowest_index() {
        let board = Board::parse("XO X     ").unwrap();
        assert_eq!(FirstFreeStrategy.choose(&board), Some(2));
    }

    #[test]
    fn test_strategies_pass_on_full_board() {
        let board = Board::parse("XOXXOOOXX").unwrap();
        assert_eq!(FirstFreeStrategy.choose(&board), None);
        assert_eq!(RandomStrategy::seeded(7).choose(&board), None);
    }

    #[test]
    fn test_random_is_reproducible_and_legal() {
        let board = Board::parse("X   O   X").unwrap();
        let mut a = RandomStrategy::seeded(42);
        let mut b = RandomStrategy::seeded(42);
        for _ in 0..20 {
            let pick = a.choose(&board);
            assert_eq!(pick, b.choose(&board));
            assert!(board.is_empty(pick.unwrap()));
        }
    }

    #[tokio::test]
    async fn test_bot_answers_board_text() {
        let mut bot = BotPlayer::new("Bot2", FirstFreeStrategy);
        assert_eq!(bot.request_move("XO       \n").await.unwrap(), "2\n");
        assert_eq!(bot.request_move("garbage").await.unwrap(), "-1\n");
    }

    #[tokio::test]
    async fn test_bot_passes_on_finished_game() {
        let mut bot = BotPlayer::new("Bot1", FirstFreeStrategy);
        // X already has the top row; squares 5-8 are still empty.
        assert_eq!(bot.request_move("XXXOO    \n").await.unwrap(), "-1\n");
    }

    #[test]
    fn test_seed_is_kept() {
        assert_eq!(RandomStrategy::seeded(99).seed(), 99);
    }
}
