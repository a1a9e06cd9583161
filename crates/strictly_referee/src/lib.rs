//! Strictly Referee - tic-tac-toe between separate player processes.
//!
//! The referee launches one process per player, hands each its own local
//! socket, and then runs the game turn by turn: the current board goes to the
//! player to move, the reply comes back, the referee validates it against the
//! [`Board`](strictly_tictactoe::Board) and either applies it or asks again.
//!
//! # Architecture
//!
//! - **Channel**: length-framed messages over a Unix domain socket
//! - **Process**: spawn a peer, wait for it to attach, terminate it
//! - **Session**: the sequential turn loop over `dyn Player` seats
//! - **Orchestrator**: roster setup, play, unconditional teardown
//! - **Peer**: the loop run inside player processes
//!
//! # Example
//!
//! ```no_run
//! use strictly_referee::{GameConfig, GameMode, Orchestrator, console};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let orchestrator = Orchestrator::new(GameConfig::load(None)?);
//! let outcome = orchestrator.run(GameMode::BotVsBot, console::print).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod channel;
mod config;
mod error;
mod orchestrator;
mod peer;
mod player;
mod players;
mod process;
mod roster;
mod session;
mod telemetry;

pub mod console;

// Crate-level exports - Transport
pub use channel::{Channel, ChannelId, ChannelListener, connect, listen_and_accept};

// Crate-level exports - Configuration
pub use config::{CONFIG_ENV, ConfigError, DEFAULT_CONFIG_FILE, GameConfig, resolve_executable};

// Crate-level exports - Errors
pub use error::{ChannelError, PeerError, PlayerError, SessionError};

// Crate-level exports - Peer processes
pub use process::{PeerEndpoint, PeerSpec, attach, spawn};

// Crate-level exports - Players
pub use peer::{run_peer, serve};
pub use player::{NO_MOVE, Player, format_move, parse_move};
pub use players::{BotPlayer, FirstFreeStrategy, HumanPlayer, RandomStrategy, Strategy};

// Crate-level exports - Sessions
pub use orchestrator::Orchestrator;
pub use roster::{GameMode, Program, Role, Roster, RosterEntry, SeatTemplate};
pub use session::{GameEvent, GameSession, Outcome, Seat};

// Crate-level exports - Tracing
pub use telemetry::init_tracing;
