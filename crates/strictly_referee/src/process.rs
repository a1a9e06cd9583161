//! Peer process lifecycle.
//!
//! A peer is an executable started with its channel identifier as the only
//! argument. [`attach`] binds the channel, starts the process and waits for
//! it to connect; [`PeerEndpoint::terminate`] ends it. Every failure path
//! kills the process and removes the socket before returning.

use crate::channel::{Channel, ChannelId, ChannelListener};
use crate::config::CONFIG_ENV;
use crate::error::{ChannelError, PeerError, PlayerError};
use crate::player::Player;
use derive_getters::Getters;
use derive_new::new;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, instrument, warn};

/// How to start one peer.
#[derive(Debug, Clone, Getters, new)]
pub struct PeerSpec {
    /// Label used in logs and failure reports (e.g. `Human1`).
    label: String,
    /// Peer program.
    executable: PathBuf,
    /// Optional command prefix (terminal emulator, sandbox, ...).
    #[new(default)]
    launcher: Vec<String>,
    /// Config file handed to the peer through `TTT_CONFIG`.
    #[new(default)]
    config_path: Option<PathBuf>,
}

impl PeerSpec {
    /// Returns the spec with a launcher prefix.
    pub fn with_launcher(mut self, launcher: Vec<String>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Returns the spec with a config file for the peer to load.
    pub fn with_config_path(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }
}

/// Launches the peer program with the channel identifier as its sole
/// argument.
#[instrument(skip(spec), fields(peer = %spec.label, executable = %spec.executable.display()))]
pub fn spawn(spec: &PeerSpec, identifier: &ChannelId) -> Result<Child, PeerError> {
    let mut command = match spec.launcher.split_first() {
        Some((launcher, prefix)) => {
            let mut command = Command::new(launcher);
            command.args(prefix).arg(&spec.executable);
            command
        }
        None => Command::new(&spec.executable),
    };
    command.arg(identifier.path()).kill_on_drop(true);
    if let Some(config_path) = &spec.config_path {
        debug!(config = %config_path.display(), "Passing config file to peer");
        command.env(CONFIG_ENV, config_path);
    }

    let child = command.spawn().map_err(|source| PeerError::Spawn {
        peer: spec.label.clone(),
        executable: spec.executable.display().to_string(),
        source,
    })?;
    info!(pid = ?child.id(), "Launched peer process");
    Ok(child)
}

/// Binds `identifier`, launches the peer and waits until it connects.
///
/// Fails if the peer does not connect within `timeout` or exits first. On
/// failure nothing is left behind: the process is killed and reaped and the
/// socket file is removed.
#[instrument(skip(spec), fields(peer = %spec.label, channel = %identifier))]
pub async fn attach(
    spec: &PeerSpec,
    identifier: ChannelId,
    buffer_size: usize,
    timeout: Duration,
) -> Result<PeerEndpoint, PeerError> {
    let listener =
        ChannelListener::bind(&identifier, buffer_size).map_err(|source| PeerError::Channel {
            peer: spec.label.clone(),
            source,
        })?;
    let mut child = spawn(spec, &identifier)?;

    let attached = tokio::select! {
        biased;
        accepted = tokio::time::timeout(timeout, listener.accept()) => match accepted {
            Ok(Ok(channel)) => Ok(channel),
            Ok(Err(source)) => Err(PeerError::Channel {
                peer: spec.label.clone(),
                source,
            }),
            Err(_) => Err(PeerError::AttachTimeout {
                peer: spec.label.clone(),
                identifier: identifier.clone(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        },
        status = child.wait() => Err(PeerError::ExitedEarly {
            peer: spec.label.clone(),
            status: match status {
                Ok(status) => status.to_string(),
                Err(e) => e.to_string(),
            },
        }),
    };

    match attached {
        Ok(channel) => {
            info!("Peer attached");
            Ok(PeerEndpoint {
                label: spec.label.clone(),
                identifier,
                channel: Some(channel),
                process: Some(child),
            })
        }
        Err(e) => {
            warn!(error = %e, "Attach failed, releasing peer");
            reap(&spec.label, &mut child).await;
            Err(e)
        }
    }
}

/// Kills a child if it is still running and waits for it.
#[instrument(skip(child))]
async fn reap(label: &str, child: &mut Child) {
    if let Ok(Some(status)) = child.try_wait() {
        debug!(%status, "Peer already exited");
        return;
    }
    if let Err(e) = child.start_kill() {
        warn!(error = %e, "Failed to kill peer process");
    }
    match child.wait().await {
        Ok(status) => debug!(%status, "Peer process reaped"),
        Err(e) => warn!(error = %e, "Failed to wait for peer process"),
    }
}

/// A connected peer: its channel and its process.
///
/// Owned by the session from attach until [`terminate`](Self::terminate).
/// Dropping an endpoint that was never terminated still kills the process.
#[derive(Debug)]
pub struct PeerEndpoint {
    label: String,
    identifier: ChannelId,
    channel: Option<Channel>,
    process: Option<Child>,
}

impl PeerEndpoint {
    /// Peer label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// True until [`terminate`](Self::terminate) runs.
    pub fn is_attached(&self) -> bool {
        self.channel.is_some() || self.process.is_some()
    }

    /// Sends one board and waits for the reply.
    #[instrument(skip(self), fields(peer = %self.label))]
    pub async fn exchange(&mut self, board_text: &str) -> Result<String, ChannelError> {
        let channel = self.channel.as_mut().ok_or_else(|| ChannelError::Closed {
            identifier: self.identifier.clone(),
        })?;
        channel.send(board_text).await?;
        let limit = channel.buffer_size();
        channel.receive(limit).await
    }

    /// Forcibly ends the peer and releases its channel.
    ///
    /// Calling it again does nothing.
    #[instrument(skip(self), fields(peer = %self.label))]
    pub async fn terminate(&mut self) {
        if !self.is_attached() {
            debug!("Peer already terminated");
            return;
        }

        // Closing first lets a well-behaved peer leave its loop on its own.
        drop(self.channel.take());
        if let Some(mut child) = self.process.take() {
            reap(&self.label, &mut child).await;
        }
        info!("Peer terminated");
    }
}

impl Drop for PeerEndpoint {
    fn drop(&mut self) {
        if let Some(child) = self.process.as_mut() {
            debug!(peer = %self.label, "Killing peer process on drop");
            let _ = child.start_kill();
        }
    }
}

#[async_trait::async_trait]
impl Player for PeerEndpoint {
    async fn request_move(&mut self, board_text: &str) -> Result<String, PlayerError> {
        Ok(self.exchange(board_text).await?)
    }

    fn name(&self) -> &str {
        &self.label
    }

    async fn shutdown(&mut self) {
        self.terminate().await;
    }
}
