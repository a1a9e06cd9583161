//! Game modes and the rosters they expand to.
//!
//! A mode is nothing but data: an ordered list of seat templates. Setup,
//! turn dispatch and teardown all walk the roster generically.

use crate::channel::ChannelId;
use crate::config::{ConfigError, GameConfig, resolve_executable};
use crate::process::PeerSpec;
use derive_getters::Getters;
use strictly_tictactoe::Mark;
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// Pairing of players for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
pub enum GameMode {
    /// Two humans at the terminal.
    #[strum(to_string = "Human vs Human")]
    HumanVsHuman,
    /// A human (X) against a random bot (O).
    #[strum(to_string = "Human vs Bot")]
    HumanVsBot,
    /// A random bot (X) against an ordered bot (O).
    #[strum(to_string = "Bot vs Bot")]
    BotVsBot,
}

impl GameMode {
    /// Menu number of this mode (1-3).
    pub fn selection(self) -> u8 {
        match self {
            GameMode::HumanVsHuman => 1,
            GameMode::HumanVsBot => 2,
            GameMode::BotVsBot => 3,
        }
    }

    /// Mode for a menu number.
    #[instrument]
    pub fn from_selection(selection: u8) -> Option<Self> {
        Self::iter().find(|mode| mode.selection() == selection)
    }

    /// Parses a menu answer such as `"2\n"`.
    pub fn parse_selection(text: &str) -> Option<Self> {
        text.trim().parse().ok().and_then(Self::from_selection)
    }

    /// The seats this mode plays, X first.
    pub fn seats(self) -> &'static [SeatTemplate; 2] {
        match self {
            GameMode::HumanVsHuman => &HUMAN_VS_HUMAN,
            GameMode::HumanVsBot => &HUMAN_VS_BOT,
            GameMode::BotVsBot => &BOT_VS_BOT,
        }
    }
}

/// Who sits behind a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Role {
    /// Prompted on a terminal.
    Human,
    /// Decides by itself.
    Automated,
}

/// Peer program a seat runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Program {
    /// `ttt-human`.
    Human,
    /// `ttt-bot`.
    RandomBot,
    /// `ttt-bot-ordered`.
    OrderedBot,
}

impl Program {
    /// Default binary name.
    pub fn binary_name(self) -> &'static str {
        match self {
            Program::Human => "ttt-human",
            Program::RandomBot => "ttt-bot",
            Program::OrderedBot => "ttt-bot-ordered",
        }
    }

    /// Role this program plays.
    pub fn role(self) -> Role {
        match self {
            Program::Human => Role::Human,
            Program::RandomBot | Program::OrderedBot => Role::Automated,
        }
    }
}

/// One seat of a mode before anything is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatTemplate {
    /// Mark played from this seat.
    pub mark: Mark,
    /// Label used in reports.
    pub label: &'static str,
    /// Program launched for the seat.
    pub program: Program,
}

const HUMAN_VS_HUMAN: [SeatTemplate; 2] = [
    SeatTemplate {
        mark: Mark::X,
        label: "Human1",
        program: Program::Human,
    },
    SeatTemplate {
        mark: Mark::O,
        label: "Human2",
        program: Program::Human,
    },
];

const HUMAN_VS_BOT: [SeatTemplate; 2] = [
    SeatTemplate {
        mark: Mark::X,
        label: "Human1",
        program: Program::Human,
    },
    SeatTemplate {
        mark: Mark::O,
        label: "Bot1",
        program: Program::RandomBot,
    },
];

const BOT_VS_BOT: [SeatTemplate; 2] = [
    SeatTemplate {
        mark: Mark::X,
        label: "Bot1",
        program: Program::RandomBot,
    },
    SeatTemplate {
        mark: Mark::O,
        label: "Bot2",
        program: Program::OrderedBot,
    },
];

/// A seat with its program and channel resolved.
#[derive(Debug, Clone, Getters)]
pub struct RosterEntry {
    /// Mark played.
    mark: Mark,
    /// Human or automated.
    role: Role,
    /// Launch instructions.
    peer: PeerSpec,
    /// Channel the peer is told to open.
    channel: ChannelId,
}

/// Resolved seats for one session, in turn order.
#[derive(Debug, Clone, Getters)]
pub struct Roster {
    /// Mode the roster was built from.
    mode: GameMode,
    /// Seats, X first.
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Resolves a mode's seats against the configuration.
    #[instrument(skip(config))]
    pub fn for_mode(mode: GameMode, config: &GameConfig) -> Result<Self, ConfigError> {
        let entries = mode
            .seats()
            .iter()
            .map(|seat| {
                let configured = match seat.program {
                    Program::Human => config.human_executable(),
                    Program::RandomBot => config.bot_executable(),
                    Program::OrderedBot => config.ordered_bot_executable(),
                };
                let executable =
                    resolve_executable(configured.as_deref(), seat.program.binary_name())?;
                debug!(seat = seat.label, executable = %executable.display(), "Resolved seat");

                Ok(RosterEntry {
                    mark: seat.mark,
                    role: seat.program.role(),
                    peer: PeerSpec::new(seat.label.to_string(), executable)
                        .with_launcher(config.launcher().clone())
                        .with_config_path(config.loaded_from().clone()),
                    channel: ChannelId::for_seat(config.channel_dir(), seat.label),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self { mode, entries })
    }
}
