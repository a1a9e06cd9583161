//! Session orchestration: setup, play, teardown.

use crate::config::GameConfig;
use crate::error::SessionError;
use crate::process;
use crate::roster::{GameMode, Roster};
use crate::session::{GameEvent, GameSession, Outcome, Seat};
use tracing::{error, info, instrument, warn};

/// Runs complete sessions from a configuration.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: GameConfig,
}

impl Orchestrator {
    /// Creates a new orchestrator.
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Plays one game in `mode`, reporting progress to `observe`.
    ///
    /// Ctrl+C during setup or play abandons the game. Every peer that was
    /// attached is terminated before this returns, however the game ended.
    pub async fn run<F>(&self, mode: GameMode, observe: F) -> Result<Outcome, SessionError>
    where
        F: FnMut(&GameEvent) + Send,
    {
        self.run_until(mode, observe, interrupted()).await
    }

    /// Like [`run`](Self::run), but abandons the game when `cancel` resolves.
    #[instrument(skip(self, observe, cancel))]
    pub async fn run_until<F, C>(
        &self,
        mode: GameMode,
        observe: F,
        cancel: C,
    ) -> Result<Outcome, SessionError>
    where
        F: FnMut(&GameEvent) + Send,
        C: Future<Output = ()>,
    {
        info!("{} mode selected", mode);
        let roster = Roster::for_mode(mode, &self.config)
            .map_err(|source| SessionError::Config { source })?;
        tokio::pin!(cancel);

        let mut seats = Vec::with_capacity(roster.entries().len());
        let attached = tokio::select! {
            attached = self.setup(&roster, &mut seats) => attached,
            () = &mut cancel => {
                warn!("Interrupted during setup");
                Err(SessionError::Interrupted)
            }
        };
        if let Err(e) = attached {
            for seat in &mut seats {
                seat.shutdown().await;
            }
            error!(error = %e, "Session failed during setup");
            return Err(e);
        }

        let mut session = GameSession::new(seats);
        let result = tokio::select! {
            result = session.play(observe) => result,
            () = &mut cancel => {
                warn!("Interrupted, abandoning game");
                Err(SessionError::Interrupted)
            }
        };

        session.teardown().await;
        match &result {
            Ok(outcome) => info!(%outcome, "Session finished"),
            Err(e) => error!(error = %e, "Session failed"),
        }
        result
    }

    /// Attaches every seat of the roster, in order, pushing each onto
    /// `seats` as soon as it is up.
    ///
    /// Stops at the first failure. Seats attached before it stay in `seats`
    /// for the caller to shut down.
    #[instrument(skip_all, fields(mode = %roster.mode()))]
    pub async fn setup(&self, roster: &Roster, seats: &mut Vec<Seat>) -> Result<(), SessionError> {
        for entry in roster.entries() {
            info!(peer = %entry.peer().label(), role = %entry.role(), "Attaching peer");
            let endpoint = process::attach(
                entry.peer(),
                entry.channel().clone(),
                *self.config.buffer_size(),
                self.config.attach_timeout(),
            )
            .await
            .map_err(|source| {
                error!(peer = %entry.peer().label(), error = %source, "Failed to set up peer");
                SessionError::Setup {
                    peer: entry.peer().label().clone(),
                    source,
                }
            })?;
            seats.push(Seat::new(*entry.mark(), Box::new(endpoint)));
        }

        Ok(())
    }
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
