//! Plain-text rendering of session events.

use crate::roster::GameMode;
use crate::session::GameEvent;
use strum::IntoEnumIterator;

/// Mode selection menu.
pub fn mode_menu() -> String {
    let mut menu = String::from("Select game mode:\n");
    for mode in GameMode::iter() {
        menu.push_str(&format!("{}. {}\n", mode.selection(), mode));
    }
    menu.push_str("Enter your choice: ");
    menu
}

/// Text shown for one event.
pub fn render(event: &GameEvent) -> String {
    match event {
        GameEvent::BoardChanged { board, to_move } => {
            format!("\n{}\n\n{} to move", board.display(), to_move)
        }
        GameEvent::InvalidMove {
            player,
            reply,
            reason,
        } => format!("Invalid move from {} ({:?}): {}", player, reply, reason),
        GameEvent::MoveMade {
            player,
            mark,
            position,
        } => format!("{} ({}) chose move: {}", player, mark, position),
        GameEvent::GameOver { board, outcome } => format!("\n{}\n\n{}", board.display(), outcome),
    }
}

/// Prints an event: diagnostics to stderr, everything else to stdout.
pub fn print(event: &GameEvent) {
    match event {
        GameEvent::InvalidMove { .. } => eprintln!("{}", render(event)),
        _ => println!("{}", render(event)),
    }
}
