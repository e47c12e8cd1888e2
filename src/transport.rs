//! Message transport between the two peers.
//!
//! One logical message is one line of text. Line framing guarantees that
//! two small control tokens sent back to back are never read as one.

use async_trait::async_trait;
use derive_more::{Display, Error};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, instrument, trace, warn};

/// Frames longer than this many bytes (excluding the newline) are refused.
pub const MAX_FRAME_LEN: usize = 64;

/// Receive timeout used when the configuration does not set one.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(60);

/// Failure of the underlying connection. Always terminal for a session.
#[derive(Debug, Display, Error)]
pub enum TransportError {
    /// The peer closed or reset the connection.
    #[display("peer disconnected")]
    PeerDisconnected,

    /// No message arrived within the receive bound.
    #[display("no message from peer within {after:?}")]
    Timeout {
        /// The bound that elapsed.
        after: Duration,
    },

    /// The peer sent a line longer than [`MAX_FRAME_LEN`].
    #[display("frame exceeds {limit} bytes")]
    FrameTooLong {
        /// The frame limit.
        limit: usize,
    },

    /// A message to send contained a line break.
    #[display("outgoing message contains a line break")]
    EmbeddedNewline,

    /// Any other I/O failure.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof => Self::PeerDisconnected,
            _ => Self::Io(err),
        }
    }
}

/// A reliable, ordered, message-delimited connection to the peer.
#[async_trait]
pub trait Transport: Send {
    /// Delivers one message to the peer.
    async fn send(&mut self, message: &str) -> Result<(), TransportError>;

    /// Waits for the next message from the peer.
    ///
    /// Fails with [`TransportError::PeerDisconnected`] when the peer closes
    /// the connection and [`TransportError::Timeout`] when nothing arrives
    /// within the receive bound.
    async fn receive(&mut self) -> Result<String, TransportError>;

    /// Closes the sending side so the peer observes a disconnect.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Newline-framed transport over any async byte stream halves.
#[derive(Debug)]
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
    receive_timeout: Duration,
}

/// Transport over a TCP connection.
pub type TcpTransport = LineTransport<OwnedReadHalf, OwnedWriteHalf>;

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Wraps a reader/writer pair.
    pub fn new(reader: R, writer: W, receive_timeout: Duration) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            receive_timeout,
        }
    }

    /// The receive bound.
    pub fn receive_timeout(&self) -> Duration {
        self.receive_timeout
    }
}

impl TcpTransport {
    /// Splits a connected stream into a transport.
    #[instrument(skip(stream), fields(peer = ?stream.peer_addr().ok()))]
    pub fn from_stream(stream: TcpStream, receive_timeout: Duration) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            warn!(error = %e, "Failed to disable Nagle's algorithm");
        }
        let (reader, writer) = stream.into_split();
        Self::new(reader, writer, receive_timeout)
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    #[instrument(skip(self))]
    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        if message.contains('\n') {
            return Err(TransportError::EmbeddedNewline);
        }
        let mut frame = String::with_capacity(message.len() + 1);
        frame.push_str(message);
        frame.push('\n');
        self.writer.write_all(frame.as_bytes()).await?;
        self.writer.flush().await?;
        trace!("Frame sent");
        Ok(())
    }

    #[instrument(skip(self), fields(timeout = ?self.receive_timeout))]
    async fn receive(&mut self) -> Result<String, TransportError> {
        let mut line = Vec::new();
        let limit = (MAX_FRAME_LEN + 1) as u64;
        let read = tokio::time::timeout(
            self.receive_timeout,
            (&mut self.reader).take(limit).read_until(b'\n', &mut line),
        )
        .await
        .map_err(|_| TransportError::Timeout {
            after: self.receive_timeout,
        })??;

        if read == 0 {
            debug!("Peer closed the connection");
            return Err(TransportError::PeerDisconnected);
        }
        if line.last() != Some(&b'\n') {
            if line.len() > MAX_FRAME_LEN {
                warn!(len = line.len(), "Oversized frame from peer");
                return Err(TransportError::FrameTooLong {
                    limit: MAX_FRAME_LEN,
                });
            }
            debug!(partial = %String::from_utf8_lossy(&line), "Connection closed mid-frame");
            return Err(TransportError::PeerDisconnected);
        }

        // Invalid UTF-8 is passed on with replacement characters; the codec
        // rejects it as a malformed token.
        let text = match String::from_utf8(line) {
            Ok(text) => text,
            Err(err) => {
                warn!("Frame from peer is not valid UTF-8");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        let message = text.trim_end_matches(['\n', '\r']).to_string();
        trace!(%message, "Frame received");
        Ok(message)
    }

    #[instrument(skip(self))]
    async fn close(&mut self) -> Result<(), TransportError> {
        self.writer.shutdown().await?;
        debug!("Transport closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{DuplexStream, ReadHalf, WriteHalf};

    type DuplexTransport = LineTransport<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

    fn pair(timeout: Duration) -> (DuplexTransport, DuplexTransport) {
        let (a, b) = tokio::io::duplex(256);
        let (ar, aw) = tokio::io::split(a);
        let (br, bw) = tokio::io::split(b);
        (
            LineTransport::new(ar, aw, timeout),
            LineTransport::new(br, bw, timeout),
        )
    }

    #[tokio::test]
    async fn back_to_back_messages_stay_separate() {
        let (mut left, mut right) = pair(DEFAULT_RECEIVE_TIMEOUT);

        left.send("X").await.unwrap();
        left.send("1 1").await.unwrap();
        left.send("yes").await.unwrap();

        assert_eq!(right.receive().await.unwrap(), "X");
        assert_eq!(right.receive().await.unwrap(), "1 1");
        assert_eq!(right.receive().await.unwrap(), "yes");
    }

    #[tokio::test]
    async fn close_is_observed_as_disconnect() {
        let (mut left, mut right) = pair(DEFAULT_RECEIVE_TIMEOUT);

        left.close().await.unwrap();

        assert!(matches!(
            right.receive().await,
            Err(TransportError::PeerDisconnected)
        ));
    }

    #[tokio::test]
    async fn dropped_peer_is_observed_as_disconnect() {
        let (left, mut right) = pair(DEFAULT_RECEIVE_TIMEOUT);
        drop(left);

        assert!(matches!(
            right.receive().await,
            Err(TransportError::PeerDisconnected)
        ));
    }

    #[tokio::test]
    async fn silence_times_out() {
        let (_left, mut right) = pair(Duration::from_millis(50));

        assert!(matches!(
            right.receive().await,
            Err(TransportError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn oversized_frame_is_refused() {
        let (mut left, mut right) = pair(DEFAULT_RECEIVE_TIMEOUT);

        left.send(&"7".repeat(MAX_FRAME_LEN + 10)).await.unwrap();

        assert!(matches!(
            right.receive().await,
            Err(TransportError::FrameTooLong { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_utf8_frame_is_delivered_for_decoding() {
        let (a, b) = tokio::io::duplex(64);
        let (_ar, mut aw) = tokio::io::split(a);
        let (br, bw) = tokio::io::split(b);
        let mut right = LineTransport::new(br, bw, DEFAULT_RECEIVE_TIMEOUT);

        aw.write_all(b"\xff\xfe\n1 1\n").await.unwrap();

        assert_eq!(right.receive().await.unwrap(), "\u{FFFD}\u{FFFD}");
        // The connection stays usable for the next frame.
        assert_eq!(right.receive().await.unwrap(), "1 1");
    }

    #[tokio::test]
    async fn embedded_newline_is_refused() {
        let (mut left, _right) = pair(DEFAULT_RECEIVE_TIMEOUT);

        assert!(matches!(
            left.send("1 1\n2 2").await,
            Err(TransportError::EmbeddedNewline)
        ));
    }

    #[tokio::test]
    async fn crlf_is_stripped() {
        let (a, b) = tokio::io::duplex(64);
        let (_ar, mut aw) = tokio::io::split(a);
        let (br, bw) = tokio::io::split(b);
        let mut right = LineTransport::new(br, bw, DEFAULT_RECEIVE_TIMEOUT);

        aw.write_all(b"0 2\r\n").await.unwrap();

        assert_eq!(right.receive().await.unwrap(), "0 2");
    }
}
