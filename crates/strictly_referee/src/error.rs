//! Error types for the referee.
//!
//! Setup failures ([`PeerError`]) and failures to answer a turn
//! ([`PlayerError`]) are both fatal to a session and end up wrapped in a
//! [`SessionError`] that names the peer responsible.

use crate::channel::ChannelId;
use crate::config::ConfigError;
use derive_more::{Display, Error};
use strictly_tictactoe::Mark;

/// Transport failure on a single channel.
#[derive(Debug, Display, Error)]
pub enum ChannelError {
    /// Nobody was listening on the channel before the connect timeout.
    #[display("Channel {identifier} unavailable after {timeout_ms}ms")]
    Unavailable {
        /// Channel that could not be opened.
        identifier: ChannelId,
        /// How long we kept retrying.
        timeout_ms: u64,
    },

    /// The other end went away.
    #[display("Channel {identifier} closed by peer")]
    Closed {
        /// Channel that closed.
        identifier: ChannelId,
    },

    /// A message larger than the agreed limit.
    #[display("Message of {len} bytes on {identifier} exceeds limit of {limit}")]
    Oversized {
        /// Channel carrying the message.
        identifier: ChannelId,
        /// Size of the message.
        len: usize,
        /// Largest size accepted.
        limit: usize,
    },

    /// Any other I/O failure.
    #[display("Channel {identifier} {operation} failed: {source}")]
    Transport {
        /// Channel that failed.
        identifier: ChannelId,
        /// What we were doing (bind, accept, connect, send, receive).
        operation: &'static str,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ChannelError {
    /// True when the error means the peer is gone rather than misbehaving.
    pub fn is_closed(&self) -> bool {
        matches!(self, ChannelError::Closed { .. })
    }
}

/// Failure to bring a peer process up and connected.
#[derive(Debug, Display, Error)]
pub enum PeerError {
    /// Creating or accepting on the channel failed.
    #[display("Peer {peer}: {source}")]
    Channel {
        /// Peer label.
        peer: String,
        /// Channel failure.
        source: ChannelError,
    },

    /// The executable could not be launched.
    #[display("Peer {peer}: failed to launch {executable}: {source}")]
    Spawn {
        /// Peer label.
        peer: String,
        /// Program we tried to run.
        executable: String,
        /// Launch failure.
        source: std::io::Error,
    },

    /// The process started but never connected.
    #[display("Peer {peer} did not attach to {identifier} within {timeout_ms}ms")]
    AttachTimeout {
        /// Peer label.
        peer: String,
        /// Channel the peer was told to use.
        identifier: ChannelId,
        /// Attach timeout.
        timeout_ms: u64,
    },

    /// The process exited before connecting.
    #[display("Peer {peer} exited before attaching ({status})")]
    ExitedEarly {
        /// Peer label.
        peer: String,
        /// Exit status as reported by the OS.
        status: String,
    },
}

/// A player that could not produce an answer for its turn.
#[derive(Debug, Display, Error)]
pub enum PlayerError {
    /// The channel to a remote player failed.
    #[display("{source}")]
    Channel {
        /// Channel failure.
        source: ChannelError,
    },

    /// The local input stream ended.
    #[display("Input closed")]
    InputClosed,

    /// Reading local input failed.
    #[display("Input error: {source}")]
    Input {
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl From<ChannelError> for PlayerError {
    fn from(source: ChannelError) -> Self {
        PlayerError::Channel { source }
    }
}

/// A session that could not be played to a result.
#[derive(Debug, Display, Error)]
pub enum SessionError {
    /// The roster could not be built from configuration.
    #[display("Configuration: {source}")]
    Config {
        /// Configuration failure.
        source: ConfigError,
    },

    /// A peer could not be attached; nothing was played.
    #[display("Setup failed: {source}")]
    Setup {
        /// Peer that failed.
        peer: String,
        /// Attach failure.
        source: PeerError,
    },

    /// A peer stopped answering mid-game.
    #[display("Communication with {peer} ({mark}) failed: {source}")]
    Communication {
        /// Peer that failed.
        peer: String,
        /// Mark the peer was playing.
        mark: Mark,
        /// Failure reported by the player.
        source: PlayerError,
    },

    /// The roster has no seat for the mark to move.
    #[display("No player seated for {mark}")]
    Unseated {
        /// Mark without a seat.
        mark: Mark,
    },

    /// The session was cancelled (Ctrl+C) before a result.
    #[display("Interrupted")]
    Interrupted,
}

impl SessionError {
    /// Label of the peer the failure is attributed to, if any.
    pub fn peer(&self) -> Option<&str> {
        match self {
            SessionError::Setup { peer, .. } | SessionError::Communication { peer, .. } => {
                Some(peer)
            }
            SessionError::Config { .. }
            | SessionError::Unseated { .. }
            | SessionError::Interrupted => None,
        }
    }
}
