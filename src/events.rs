//! Events the session reports to the local player.

use crate::bootstrap::Roles;
use ttt_board::{Board, Mark, MoveError, Position};

/// Result of a finished game from the local player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Outcome {
    /// The local mark completed a line.
    #[display("You win!")]
    Win,
    /// The remote mark completed a line.
    #[display("You lose!")]
    Loss,
    /// The board filled up without a line.
    #[display("It's a draw!")]
    Draw,
}

/// Something the local player should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The server is waiting for a client.
    Listening {
        /// Bound address.
        addr: String,
    },
    /// A connection to the peer is established.
    Connected,
    /// The session ended because of a connection or protocol failure.
    ConnectionLost {
        /// Human-readable cause.
        reason: String,
    },
    /// The previous client is gone; the server waits for the next one.
    AwaitingNextClient,
    /// Marks and turn order are settled.
    RolesAssigned(Roles),
    /// A new round is starting on a fresh board.
    RoundStarted {
        /// One-based round number.
        round: usize,
    },
    /// The local player should enter a move.
    YourTurn {
        /// Current board.
        board: Board,
    },
    /// Waiting on the peer's move.
    WaitingForOpponent,
    /// The local candidate move was refused; the player moves again.
    InvalidMove(MoveError),
    /// A mark was placed.
    MovePlayed {
        /// Who placed it.
        mark: Mark,
        /// Where.
        position: Position,
        /// Board after the move.
        board: Board,
    },
    /// The round reached a terminal state.
    GameOver {
        /// Local result.
        outcome: Outcome,
        /// Final board.
        board: Board,
    },
    /// Both replay votes are known.
    ReplayDecided {
        /// Local vote.
        local: bool,
        /// Peer vote.
        remote: bool,
    },
    /// The session is over and the connection is being closed.
    Closing,
}
