//! Random bot peer.
//!
//! Plays a uniformly random empty square. Set `TTT_BOT_SEED` to replay a
//! game; otherwise the seed comes from the OS and is logged.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use strictly_referee::{BotPlayer, ChannelId, GameConfig, RandomStrategy, init_tracing, run_peer};
use tracing::info;

/// Random tic-tac-toe bot
#[derive(Parser, Debug)]
#[command(name = "ttt-bot")]
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
    let strategy = match std::env::var("TTT_BOT_SEED") {
        Ok(seed) => RandomStrategy::seeded(
            seed.trim()
                .parse()
                .with_context(|| format!("TTT_BOT_SEED is not a number: {}", seed))?,
        ),
        Err(_) => RandomStrategy::from_entropy(),
    };

    info!(seed = strategy.seed(), "Random bot ready");
    let mut bot = BotPlayer::new("Random bot", strategy);
    let turns = run_peer(&ChannelId::new(args.channel), &config, &mut bot).await?;

    info!(turns, "Game finished");
    Ok(())
}
