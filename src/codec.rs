//! Wire tokens exchanged between the two peers.
//!
//! Every message is one short ASCII token:
//!
//! | Message | Token |
//! |---|---|
//! | move | `"row col"`, two digits `0-2` separated by whitespace |
//! | role announcement | `"X"` or `"O"` |
//! | replay vote | `"yes"` or `"no"` (lowercase on send, any case on receipt) |
//!
//! The three alphabets are disjoint, so the receiver can always tell them
//! apart. Framing is the transport's concern.

use derive_more::{Display, Error};
use ttt_board::{Mark, Position};

/// Longest token this codec ever produces.
pub const MAX_TOKEN_LEN: usize = 3;

/// A decoded protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Message {
    /// A placement at a board position.
    #[display("move {_0}")]
    Move(Position),
    /// The sender's chosen mark, sent once by the connecting side.
    #[display("role {_0}")]
    Role(Mark),
    /// The sender's replay vote.
    #[display("replay vote ({_0})")]
    Replay(bool),
}

/// A token that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CodecError {
    /// The token matches none of the message grammars.
    #[display("malformed token {token:?}")]
    Malformed {
        /// The received token.
        token: String,
    },

    /// A well-formed token of the wrong kind for this point in the protocol.
    #[display("expected a {expected}, received {token:?}")]
    Unexpected {
        /// What the protocol expected.
        expected: &'static str,
        /// The received token.
        token: String,
    },
}

impl Message {
    /// Encodes the message as its wire token.
    pub fn encode(&self) -> String {
        match self {
            Message::Move(pos) => format!("{} {}", pos.row(), pos.col()),
            Message::Role(Mark::X) => "X".to_string(),
            Message::Role(Mark::O) => "O".to_string(),
            Message::Replay(true) => "yes".to_string(),
            Message::Replay(false) => "no".to_string(),
        }
    }

    /// Decodes a wire token.
    pub fn decode(token: &str) -> Result<Self, CodecError> {
        let trimmed = token.trim();
        match trimmed {
            "X" => return Ok(Message::Role(Mark::X)),
            "O" => return Ok(Message::Role(Mark::O)),
            _ => {}
        }
        if let Some(vote) = parse_vote(trimmed) {
            return Ok(Message::Replay(vote));
        }
        parse_move(trimmed)
            .map(Message::Move)
            .ok_or_else(|| CodecError::Malformed {
                token: token.to_string(),
            })
    }
}

/// Decodes a token that must be a move.
pub fn decode_move(token: &str) -> Result<Position, CodecError> {
    match Message::decode(token)? {
        Message::Move(pos) => Ok(pos),
        _ => Err(unexpected("move", token)),
    }
}

/// Decodes a token that must be a role announcement.
pub fn decode_role(token: &str) -> Result<Mark, CodecError> {
    match Message::decode(token)? {
        Message::Role(mark) => Ok(mark),
        _ => Err(unexpected("role announcement", token)),
    }
}

/// Decodes a token that must be a replay vote.
pub fn decode_vote(token: &str) -> Result<bool, CodecError> {
    match Message::decode(token)? {
        Message::Replay(vote) => Ok(vote),
        _ => Err(unexpected("replay vote", token)),
    }
}

fn unexpected(expected: &'static str, token: &str) -> CodecError {
    CodecError::Unexpected {
        expected,
        token: token.to_string(),
    }
}

fn parse_vote(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Exactly two single-digit coordinates, each `0-2`.
fn parse_move(token: &str) -> Option<Position> {
    let mut parts = token.split_whitespace();
    let row = parse_coordinate(parts.next()?)?;
    let col = parse_coordinate(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Position::from_coords(row, col)
}

fn parse_coordinate(part: &str) -> Option<usize> {
    match part.as_bytes() {
        [digit @ b'0'..=b'2'] => Some(usize::from(digit - b'0')),
        _ => None,
    }
}
