//! Player trait: anything that can answer a board with a move.
//!
//! The referee only ever talks to `dyn Player`. Remote peers
//! ([`PeerEndpoint`](crate::PeerEndpoint)) and the local implementations the
//! peer binaries run ([`HumanPlayer`](crate::HumanPlayer),
//! [`BotPlayer`](crate::BotPlayer)) all sit behind it.

use crate::error::PlayerError;

/// Move value meaning "no legal move" or "could not decide".
pub const NO_MOVE: i64 = -1;

/// Trait for players that can make moves.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Answers a serialized board with move text.
    ///
    /// The reply is expected to be a decimal position 0-8, or `-1`, but the
    /// caller validates it; a player is free to send anything.
    async fn request_move(&mut self, board_text: &str) -> Result<String, PlayerError>;

    /// Returns the player's display name.
    fn name(&self) -> &str;

    /// Releases whatever the player holds. Must be safe to call twice.
    async fn shutdown(&mut self) {}
}

/// Reads a move reply: a decimal integer, surrounding whitespace ignored.
///
/// Anything unparseable counts as [`NO_MOVE`].
pub fn parse_move(reply: &str) -> i64 {
    reply.trim().parse().unwrap_or(NO_MOVE)
}

/// Formats a move for the wire.
pub fn format_move(position: Option<usize>) -> String {
    match position {
        Some(position) => format!("{}\n", position),
        None => format!("{}\n", NO_MOVE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("4"), 4);
        assert_eq!(parse_move("7\n"), 7);
        assert_eq!(parse_move(" 8\r\n"), 8);
        assert_eq!(parse_move("-1\n"), NO_MOVE);
        assert_eq!(parse_move("12"), 12);
        assert_eq!(parse_move("center"), NO_MOVE);
        assert_eq!(parse_move(""), NO_MOVE);
    }

    #[test]
    fn test_format_move() {
        assert_eq!(format_move(Some(3)), "3\n");
        assert_eq!(format_move(None), "-1\n");
    }
}
