//! Ordered bot peer: always plays the lowest-numbered empty square.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use strictly_referee::{BotPlayer, ChannelId, FirstFreeStrategy, GameConfig};
use strictly_referee::{init_tracing, run_peer};
use tracing::info;

/// Deterministic tic-tac-toe bot
#[derive(Parser, Debug)]
#[command(name = "ttt-bot-ordered")]
struct Args {
    /// Channel to open (passed by the referee)
    channel: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing("warn");

    let config = GameConfig::load(None)?;
    let mut bot = BotPlayer::new("Ordered bot", FirstFreeStrategy);
    let turns = run_peer(&ChannelId::new(args.channel), &config, &mut bot).await?;

    info!(turns, "Game finished");
    Ok(())
}
