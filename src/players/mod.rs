//! Player trait and implementations.
//!
//! A player is the local side's console: it supplies the mark choice,
//! candidate moves and replay votes, and receives [`GameEvent`]s to show.

mod human;
mod scripted;

pub use human::{HumanPlayer, parse_turn_input};
pub use scripted::ScriptedPlayer;

use crate::error::SessionError;
use crate::events::GameEvent;
use ttt_board::{Board, Mark};

/// What the local player entered on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnInput {
    /// Candidate placement at zero-based coordinates. Not yet validated.
    Move {
        /// Row.
        row: usize,
        /// Column.
        col: usize,
    },
    /// Leave the game and close the connection.
    Quit,
}

/// Trait for the local participant of a session.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Picks the local mark. Only the connecting side is asked.
    async fn choose_mark(&mut self) -> Result<Mark, SessionError>;

    /// Gets a candidate move for the current board.
    ///
    /// The session validates it; a refused move is reported through
    /// [`GameEvent::InvalidMove`] and this method is called again.
    async fn get_move(&mut self, board: &Board) -> Result<TurnInput, SessionError>;

    /// Whether the player wants another round on the same connection.
    async fn wants_rematch(&mut self) -> Result<bool, SessionError>;

    /// After a failed connection: whether to dial the server again.
    async fn wants_reconnect(&mut self) -> Result<bool, SessionError> {
        Ok(false)
    }

    /// Shows an event to the player.
    fn notify(&mut self, event: GameEvent);

    /// Returns the player's display name.
    fn name(&self) -> &str;
}
