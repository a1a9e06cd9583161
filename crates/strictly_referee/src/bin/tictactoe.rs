//! Tic-tac-toe referee.
//!
//! Prompts for a game mode, launches the peer processes for it and plays one
//! game to a result.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use strictly_referee::{GameConfig, GameMode, Orchestrator, console, init_tracing};
use tracing::{error, info};

/// Play tic-tac-toe between separate player processes
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(version)]
struct Cli {
    /// Game mode (1 = Human vs Human, 2 = Human vs Bot, 3 = Bot vs Bot).
    /// Prompted for when omitted.
    #[arg(short, long)]
    mode: Option<String>,

    /// Path to a TOML config file (defaults to ./tictactoe.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing("warn");

    let config = GameConfig::load(cli.config.as_deref())?;

    let answer = match cli.mode {
        Some(mode) => mode,
        None => prompt_mode()?,
    };
    let Some(mode) = GameMode::parse_selection(&answer) else {
        error!(answer = %answer.trim(), "Rejected mode selection");
        eprintln!("Invalid game mode.");
        return Ok(ExitCode::FAILURE);
    };
    info!(%mode, "Mode selected");

    match Orchestrator::new(config).run(mode, console::print).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            match e.peer() {
                Some(peer) => eprintln!("Game aborted ({}): {}", peer, e),
                None => eprintln!("Game aborted: {}", e),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Shows the mode menu and reads one line of answer.
fn prompt_mode() -> Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", console::mode_menu())?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}
