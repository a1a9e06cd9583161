//! Message-framed duplex channels over Unix domain sockets.
//!
//! Each frame is a 4-byte big-endian length followed by that many bytes of
//! UTF-8 text, so one `send` always arrives as exactly one `receive`.
//! A channel joins the referee to exactly one peer; the listening side
//! accepts a single connection and then unlinks its socket path.

use crate::error::ChannelError;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument, warn};

/// Pause between connect attempts while the listener is not up yet.
const CONNECT_RETRY: Duration = Duration::from_millis(50);

/// Name of a channel: the path of its socket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(PathBuf);

impl ChannelId {
    /// Wraps an existing path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Identifier for one seat of one referee process.
    ///
    /// The process id keeps concurrent referees apart; the seat label keeps
    /// the two peers of a session apart.
    pub fn for_seat(dir: &Path, seat: &str) -> Self {
        let seat: String = seat
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        Self(dir.join(format!("tictactoe-{}-{}.sock", std::process::id(), seat)))
    }

    /// Socket path.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A connected, message-framed channel.
#[derive(Debug)]
pub struct Channel {
    stream: UnixStream,
    identifier: ChannelId,
    buffer_size: usize,
}

impl Channel {
    fn new(stream: UnixStream, identifier: ChannelId, buffer_size: usize) -> Self {
        Self {
            stream,
            identifier,
            buffer_size,
        }
    }

    /// Channel name.
    pub fn identifier(&self) -> &ChannelId {
        &self.identifier
    }

    /// Largest message this side will send.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Sends one message.
    #[instrument(skip(self), fields(channel = %self.identifier))]
    pub async fn send(&mut self, text: &str) -> Result<(), ChannelError> {
        let len = text.len();
        if len > self.buffer_size {
            return Err(ChannelError::Oversized {
                identifier: self.identifier.clone(),
                len,
                limit: self.buffer_size,
            });
        }

        let header = u32::try_from(len).map_err(|_| ChannelError::Oversized {
            identifier: self.identifier.clone(),
            len,
            limit: u32::MAX as usize,
        })?;

        let mut frame = Vec::with_capacity(4 + len);
        frame.extend_from_slice(&header.to_be_bytes());
        frame.extend_from_slice(text.as_bytes());

        self.stream
            .write_all(&frame)
            .await
            .map_err(|e| self.io_error("send", e))?;
        debug!(len, "Message sent");
        Ok(())
    }

    /// Waits for one message of at most `max_size` bytes.
    #[instrument(skip(self), fields(channel = %self.identifier))]
    pub async fn receive(&mut self, max_size: usize) -> Result<String, ChannelError> {
        let mut header = [0u8; 4];
        let read = self
            .stream
            .read(&mut header)
            .await
            .map_err(|e| self.io_error("receive", e))?;
        if read == 0 {
            debug!("Peer closed channel");
            return Err(ChannelError::Closed {
                identifier: self.identifier.clone(),
            });
        }
        self.stream
            .read_exact(&mut header[read..])
            .await
            .map_err(|e| self.truncated("receive", e))?;

        let len = u32::from_be_bytes(header) as usize;
        if len > max_size {
            return Err(ChannelError::Oversized {
                identifier: self.identifier.clone(),
                len,
                limit: max_size,
            });
        }

        let mut payload = vec![0u8; len];
        self.stream
            .read_exact(&mut payload)
            .await
            .map_err(|e| self.truncated("receive", e))?;

        // A complete frame leaves the channel healthy whatever its bytes.
        let text = match String::from_utf8(payload) {
            Ok(text) => text,
            Err(e) => {
                warn!(len, error = %e, "Message is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        debug!(len, "Message received");
        Ok(text)
    }

    /// Maps an I/O failure, treating a vanished peer as a close.
    fn io_error(&self, operation: &'static str, source: std::io::Error) -> ChannelError {
        match source.kind() {
            ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::NotConnected => {
                ChannelError::Closed {
                    identifier: self.identifier.clone(),
                }
            }
            _ => ChannelError::Transport {
                identifier: self.identifier.clone(),
                operation,
                source,
            },
        }
    }

    /// EOF inside a frame is a transport fault, not a clean close.
    fn truncated(&self, operation: &'static str, source: std::io::Error) -> ChannelError {
        if source.kind() == ErrorKind::UnexpectedEof {
            ChannelError::Transport {
                identifier: self.identifier.clone(),
                operation,
                source,
            }
        } else {
            self.io_error(operation, source)
        }
    }
}

/// Listening end of a channel that has not been attached yet.
///
/// The socket file is removed when the listener is dropped, whether or not a
/// peer ever attached.
#[derive(Debug)]
pub struct ChannelListener {
    listener: UnixListener,
    identifier: ChannelId,
    buffer_size: usize,
}

impl ChannelListener {
    /// Creates the channel endpoint.
    #[instrument(fields(channel = %identifier))]
    pub fn bind(identifier: &ChannelId, buffer_size: usize) -> Result<Self, ChannelError> {
        if identifier.path().exists() {
            warn!("Removing stale channel socket");
            std::fs::remove_file(identifier.path()).map_err(|source| ChannelError::Transport {
                identifier: identifier.clone(),
                operation: "bind",
                source,
            })?;
        }

        let listener =
            UnixListener::bind(identifier.path()).map_err(|source| ChannelError::Transport {
                identifier: identifier.clone(),
                operation: "bind",
                source,
            })?;
        debug!(buffer_size, "Channel listening");

        Ok(Self {
            listener,
            identifier: identifier.clone(),
            buffer_size,
        })
    }

    /// Blocks until one peer attaches. Consumes the listener: no second peer
    /// can attach to the same channel.
    #[instrument(skip(self), fields(channel = %self.identifier))]
    pub async fn accept(self) -> Result<Channel, ChannelError> {
        let (stream, _addr) =
            self.listener
                .accept()
                .await
                .map_err(|source| ChannelError::Transport {
                    identifier: self.identifier.clone(),
                    operation: "accept",
                    source,
                })?;
        info!("Peer attached");
        Ok(Channel::new(stream, self.identifier.clone(), self.buffer_size))
    }
}

impl Drop for ChannelListener {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(self.identifier.path())
            && e.kind() != ErrorKind::NotFound
        {
            warn!(channel = %self.identifier, error = %e, "Failed to remove channel socket");
        }
    }
}

/// Creates a channel and waits for exactly one peer to attach.
#[instrument(fields(channel = %identifier))]
pub async fn listen_and_accept(
    identifier: &ChannelId,
    buffer_size: usize,
) -> Result<Channel, ChannelError> {
    ChannelListener::bind(identifier, buffer_size)?.accept().await
}

/// Opens an existing channel, retrying until `timeout` while nobody is
/// listening yet.
#[instrument(fields(channel = %identifier))]
pub async fn connect(
    identifier: &ChannelId,
    timeout: Duration,
    buffer_size: usize,
) -> Result<Channel, ChannelError> {
    let deadline = Instant::now() + timeout;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match UnixStream::connect(identifier.path()).await {
            Ok(stream) => {
                info!(attempt, "Connected to channel");
                return Ok(Channel::new(stream, identifier.clone(), buffer_size));
            }
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::ConnectionRefused) => {
                if Instant::now() >= deadline {
                    warn!(attempt, "Channel never became available");
                    return Err(ChannelError::Unavailable {
                        identifier: identifier.clone(),
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                debug!(attempt, error = %e, "Channel not ready, retrying");
                sleep(CONNECT_RETRY).await;
            }
            Err(source) => {
                return Err(ChannelError::Transport {
                    identifier: identifier.clone(),
                    operation: "connect",
                    source,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pair(dir: &Path) -> (Channel, Channel) {
        let id = ChannelId::for_seat(dir, "pair");
        let listener = ChannelListener::bind(&id, 64).unwrap();
        let client = connect(&id, Duration::from_secs(1), 64);
        let (server, client) = tokio::join!(listener.accept(), client);
        (server.unwrap(), client.unwrap())
    }

    #[tokio::test]
    async fn test_messages_keep_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let (mut server, mut client) = pair(dir.path()).await;

        server.send("X O      \n").await.unwrap();
        server.send("second").await.unwrap();
        assert_eq!(client.receive(64).await.unwrap(), "X O      \n");
        assert_eq!(client.receive(64).await.unwrap(), "second");

        client.send("4\n").await.unwrap();
        assert_eq!(server.receive(64).await.unwrap(), "4\n");
    }

    #[tokio::test]
    async fn test_receive_reports_close() {
        let dir = tempfile::tempdir().unwrap();
        let (mut server, client) = pair(dir.path()).await;
        drop(client);

        let err = server.receive(64).await.unwrap_err();
        assert!(err.is_closed(), "{err}");
    }

    #[tokio::test]
    async fn test_socket_file_removed_after_accept() {
        let dir = tempfile::tempdir().unwrap();
        let id = ChannelId::for_seat(dir.path(), "pair");
        let (_server, _client) = pair(dir.path()).await;
        assert!(!id.path().exists());
    }

    #[tokio::test]
    async fn test_oversized_send_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut server, _client) = pair(dir.path()).await;

        let err = server.send(&"x".repeat(65)).await.unwrap_err();
        assert!(matches!(err, ChannelError::Oversized { len: 65, limit: 64, .. }));
    }

    #[tokio::test]
    async fn test_oversized_receive_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut server, mut client) = pair(dir.path()).await;

        server.send("0123456789").await.unwrap();
        let err = client.receive(4).await.unwrap_err();
        assert!(matches!(err, ChannelError::Oversized { len: 10, limit: 4, .. }));
    }

    #[tokio::test]
    async fn test_connect_times_out_without_listener() {
        let dir = tempfile::tempdir().unwrap();
        let id = ChannelId::for_seat(dir.path(), "nobody");

        let err = connect(&id, Duration::from_millis(120), 64).await.unwrap_err();
        assert!(matches!(err, ChannelError::Unavailable { timeout_ms: 120, .. }));
    }

    #[tokio::test]
    async fn test_connect_waits_for_late_listener() {
        let dir = tempfile::tempdir().unwrap();
        let id = ChannelId::for_seat(dir.path(), "late");

        let client = tokio::spawn({
            let id = id.clone();
            async move { connect(&id, Duration::from_secs(2), 64).await }
        });
        sleep(Duration::from_millis(150)).await;
        let mut server = listen_and_accept(&id, 64).await.unwrap();
        let mut client = client.await.unwrap().unwrap();

        client.send("ready").await.unwrap();
        assert_eq!(server.receive(64).await.unwrap(), "ready");
    }

    #[tokio::test]
    async fn test_undecodable_frame_is_delivered_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let id = ChannelId::for_seat(dir.path(), "raw");
        let listener = ChannelListener::bind(&id, 64).unwrap();
        let (server, raw) = tokio::join!(listener.accept(), UnixStream::connect(id.path()));
        let (mut server, mut raw) = (server.unwrap(), raw.unwrap());

        raw.write_all(&[0, 0, 0, 2, 0xff, b'\n']).await.unwrap();
        raw.write_all(&[0, 0, 0, 2, b'4', b'\n']).await.unwrap();

        assert_eq!(server.receive(64).await.unwrap(), "\u{fffd}\n");
        assert_eq!(server.receive(64).await.unwrap(), "4\n");
    }

    #[test]
    fn test_seat_identifier_is_path_safe() {
        let id = ChannelId::for_seat(Path::new("/tmp"), "Bot 1");
        let name = id.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("tictactoe-"));
        assert!(name.ends_with("-bot-1.sock"));
    }
}
