//! Referee configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tictactoe.toml";

/// Environment variable through which the referee hands its config file to
/// the peers it launches.
pub const CONFIG_ENV: &str = "TTT_CONFIG";

/// Configuration for a referee run.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct GameConfig {
    /// Directory where channel sockets are created.
    channel_dir: PathBuf,

    /// Largest message, in bytes, accepted on a channel.
    buffer_size: usize,

    /// How long a spawned peer has to connect.
    attach_timeout_ms: u64,

    /// How long a peer keeps retrying to open its channel.
    connect_timeout_ms: u64,

    /// Human peer program. Defaults to `ttt-human` next to the referee.
    #[setters(strip_option)]
    human_executable: Option<PathBuf>,

    /// Random bot program. Defaults to `ttt-bot` next to the referee.
    #[setters(strip_option)]
    bot_executable: Option<PathBuf>,

    /// Ordered bot program. Defaults to `ttt-bot-ordered` next to the referee.
    #[setters(strip_option)]
    ordered_bot_executable: Option<PathBuf>,

    /// Command prefix used to launch every peer (e.g. `["xterm", "-e"]`).
    launcher: Vec<String>,

    /// Absolute path of the file this config was read from, if any.
    #[serde(skip)]
    #[setters(skip)]
    loaded_from: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            channel_dir: std::env::temp_dir(),
            buffer_size: 512,
            attach_timeout_ms: 30_000,
            connect_timeout_ms: 5_000,
            human_executable: None,
            bot_executable: None,
            ordered_bot_executable: None,
            launcher: Vec::new(),
            loaded_from: None,
        }
    }
}

impl GameConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        config.loaded_from = Some(
            std::path::absolute(path.as_ref()).unwrap_or_else(|_| path.as_ref().to_path_buf()),
        );
        info!(channel_dir = %config.channel_dir.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads the explicit file if given, else the file named by
    /// `TTT_CONFIG`, else `tictactoe.toml` if present, else the defaults.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let inherited = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::locate(path, inherited.as_deref())
    }

    #[instrument]
    fn locate(explicit: Option<&Path>, inherited: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit.or(inherited) {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Attach timeout as a duration.
    pub fn attach_timeout(&self) -> Duration {
        Duration::from_millis(self.attach_timeout_ms)
    }

    /// Connect timeout as a duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[instrument(skip(self))]
    fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size < strictly_tictactoe::CELLS + 1 {
            return Err(ConfigError::new(format!(
                "buffer_size {} cannot hold a board message",
                self.buffer_size
            )));
        }
        if u32::try_from(self.buffer_size).is_err() {
            return Err(ConfigError::new(format!(
                "buffer_size {} exceeds the largest frame length",
                self.buffer_size
            )));
        }
        if self.launcher.iter().any(|part| part.is_empty()) {
            return Err(ConfigError::new("launcher contains an empty argument".to_string()));
        }
        Ok(())
    }
}

/// Finds a peer program: the configured path, or `name` in the directory of
/// the running executable.
#[instrument]
pub fn resolve_executable(configured: Option<&Path>, name: &str) -> Result<PathBuf, ConfigError> {
    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    let exe = std::env::current_exe()
        .map_err(|e| ConfigError::new(format!("Failed to get current executable path: {}", e)))?;
    let file_name = format!("{}{}", name, std::env::consts::EXE_SUFFIX);
    let resolved = exe.with_file_name(file_name);
    debug!(path = %resolved.display(), "Resolved peer executable");
    Ok(resolved)
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
