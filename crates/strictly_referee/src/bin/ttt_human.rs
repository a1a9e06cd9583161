//! Human player peer: shows each board on the terminal and sends back the
//! move typed in.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use strictly_referee::{ChannelId, GameConfig, HumanPlayer, init_tracing, run_peer};
use tracing::info;

/// Human tic-tac-toe player
#[derive(Parser, Debug)]
#[command(name = "ttt-human")]
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
    let mut human = HumanPlayer::stdio("Human");
    let turns = run_peer(&ChannelId::new(args.channel), &config, &mut human).await?;

    info!(turns, "Game finished");
    Ok(())
}
