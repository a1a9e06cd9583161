//! Human player that types moves on a terminal.

use crate::error::PlayerError;
use crate::player::{Player, format_move};
use strictly_tictactoe::{Board, CELLS};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::io::{BufReader, Stdin, Stdout};
use tracing::{debug, instrument, warn};

/// Human player reading moves from a line-oriented input.
pub struct HumanPlayer<R, W> {
    name: String,
    input: R,
    output: W,
}

impl HumanPlayer<BufReader<Stdin>, Stdout> {
    /// Human player on the process's own terminal.
    pub fn stdio(name: impl Into<String>) -> Self {
        Self::new(name, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> HumanPlayer<R, W> {
    /// Creates a human player over arbitrary streams.
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    /// Consumes the player, returning its output stream.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R, W> HumanPlayer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn write(&mut self, text: &str) -> Result<(), PlayerError> {
        self.output
            .write_all(text.as_bytes())
            .await
            .map_err(|source| PlayerError::Input { source })?;
        self.output
            .flush()
            .await
            .map_err(|source| PlayerError::Input { source })
    }
}

#[async_trait::async_trait]
impl<R, W> Player for HumanPlayer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    #[instrument(skip(self), fields(player = %self.name))]
    async fn request_move(&mut self, board_text: &str) -> Result<String, PlayerError> {
        let shown = match Board::parse(board_text) {
            Ok(board) => board.display(),
            Err(e) => {
                warn!(error = %e, "Unreadable board text");
                board_text.trim_end().to_string()
            }
        };
        self.write(&format!("\n{}\n\nEnter your move (0-8): ", shown))
            .await?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .await
            .map_err(|source| PlayerError::Input { source })?;
        if read == 0 {
            return Err(PlayerError::InputClosed);
        }

        let position = line.trim().parse::<usize>().ok().filter(|&pos| pos < CELLS);
        match position {
            Some(pos) => debug!(position = pos, "Move entered"),
            None => {
                self.write(&format!("Invalid move input: {}\n", line.trim()))
                    .await?;
            }
        }
        Ok(format_move(position))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
