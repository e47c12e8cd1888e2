//! ttt_duel library - networked two-player tic-tac-toe
//!
//! Two processes play one game over a single TCP connection. Each keeps
//! its own board and validates its own moves; only coordinates, the
//! connecting side's mark choice and replay votes cross the wire.
//!
//! # Architecture
//!
//! - **Board**: pure game rules, in the `ttt_board` crate
//! - **Codec**: wire tokens for moves, roles and votes
//! - **Transport**: newline-framed messages with a receive timeout
//! - **Session**: the turn-taking state machine and rematch negotiation
//! - **Bootstrap**: listening, dialing and role negotiation
//! - **Players**: terminal and scripted participants
//!
//! # Example
//!
//! ```no_run
//! use ttt_duel::{DuelConfig, HumanPlayer, SessionFactory};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let factory = SessionFactory::new(DuelConfig::default());
//! let mut player = HumanPlayer::stdio("client", None);
//! let report = factory.connect(&mut player).await?;
//! println!("played {} rounds", report.outcomes().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bootstrap;
mod codec;
mod config;
mod error;
mod events;
mod players;
mod session;
mod transport;

// Crate-level exports - Connection setup
pub use bootstrap::{Roles, SessionFactory, Side, negotiate_roles, start_session};

// Crate-level exports - Wire format
pub use codec::{CodecError, MAX_TOKEN_LEN, Message, decode_move, decode_role, decode_vote};

// Crate-level exports - Configuration
pub use config::{DEFAULT_PORT, DuelConfig};

// Crate-level exports - Errors
pub use error::{ConfigError, SessionError};

// Crate-level exports - Events
pub use events::{GameEvent, Outcome};

// Crate-level exports - Players
pub use players::{HumanPlayer, Player, ScriptedPlayer, TurnInput, parse_turn_input};

// Crate-level exports - Session
pub use session::{EndReason, GameSession, RoundEnd, SessionReport, Turn, TurnResult};

// Crate-level exports - Transport
pub use transport::{
    DEFAULT_RECEIVE_TIMEOUT, LineTransport, MAX_FRAME_LEN, TcpTransport, Transport,
    TransportError,
};

// Crate-level exports - Board types
pub use ttt_board::{Board, GameStatus, Mark, MoveError, Position, Square};
