//! Peer-side runtime: the loop every peer binary runs.

use crate::channel::{self, Channel, ChannelId};
use crate::config::GameConfig;
use crate::error::{ChannelError, PlayerError};
use crate::player::Player;
use tracing::{debug, info, instrument};

/// Connects to the referee and answers boards until it hangs up.
///
/// Uses the connect timeout and buffer size from `config`.
#[instrument(skip(config, player), fields(player = %player.name()))]
pub async fn run_peer<P>(
    identifier: &ChannelId,
    config: &GameConfig,
    player: &mut P,
) -> Result<usize, PlayerError>
where
    P: Player + ?Sized,
{
    let mut channel =
        channel::connect(identifier, config.connect_timeout(), *config.buffer_size()).await?;
    serve(&mut channel, player).await
}

/// Answers boards on an open channel until the referee closes it.
///
/// Returns the number of turns answered.
#[instrument(skip_all, fields(channel = %channel.identifier(), player = %player.name()))]
pub async fn serve<P>(channel: &mut Channel, player: &mut P) -> Result<usize, PlayerError>
where
    P: Player + ?Sized,
{
    let mut turns = 0;
    loop {
        let limit = channel.buffer_size();
        let board_text = match channel.receive(limit).await {
            Ok(text) => text,
            Err(ChannelError::Closed { .. }) => {
                info!(turns, "Referee disconnected");
                return Ok(turns);
            }
            Err(e) => return Err(e.into()),
        };
        debug!(board = %board_text.trim_end(), "Received board state");

        let reply = player.request_move(&board_text).await?;
        channel.send(&reply).await?;
        turns += 1;
        debug!(reply = %reply.trim_end(), "Sent move");
    }
}
