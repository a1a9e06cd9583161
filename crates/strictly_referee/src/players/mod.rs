//! Player implementations run inside peer processes.

mod bot;
mod human;

pub use bot::{BotPlayer, FirstFreeStrategy, RandomStrategy, Strategy};
pub use human::HumanPlayer;
