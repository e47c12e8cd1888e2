//! Session-level error taxonomy.
//!
//! Invalid local moves never show up here: they are handled inside the
//! local turn by asking again. Everything in [`SessionError`] ends the
//! current game session.

use crate::codec::CodecError;
use crate::transport::TransportError;
use derive_more::{Display, Error};
use tracing::instrument;

/// Error that terminates a game session.
#[derive(Debug, Display, Error)]
pub enum SessionError {
    /// The connection failed, closed, or went silent.
    #[display("Connection lost: {_0}")]
    Transport(TransportError),

    /// The peer sent a token outside the protocol grammar.
    #[display("Protocol error: {_0}")]
    Malformed(CodecError),

    /// Local input ended (stdin closed) before the player answered.
    #[display("Local input closed")]
    InputClosed,
}

impl SessionError {
    /// True for failures caused by the connection rather than the protocol.
    ///
    /// A timeout counts as a disconnect.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            SessionError::Transport(
                TransportError::PeerDisconnected | TransportError::Timeout { .. }
            )
        )
    }
}

impl From<TransportError> for SessionError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<CodecError> for SessionError {
    fn from(err: CodecError) -> Self {
        Self::Malformed(err)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
