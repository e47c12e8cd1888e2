//! The game session state machine.
//!
//! One [`GameSession`] drives the local side of a connection through
//! alternating local and remote turns until the board is terminal, then
//! negotiates a rematch. The peer runs its own session on its own board;
//! the two stay in agreement only through the messages exchanged here.
//!
//! Rematch votes follow a fixed order so that exactly one side is waiting
//! on the connection at any time:
//!
//! 1. the listener asks its player and sends its vote,
//! 2. the connector receives that vote, asks its player (only if the
//!    listener said yes), and sends its own vote,
//! 3. the listener receives the connector's vote.
//!
//! A new round starts when both votes are yes. It keeps the marks and the
//! first mover of the previous round.

use crate::bootstrap::{Roles, Side};
use crate::codec::{self, Message};
use crate::error::SessionError;
use crate::events::{GameEvent, Outcome};
use crate::players::{Player, TurnInput};
use crate::transport::Transport;
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};
use ttt_board::{Board, GameStatus};

/// Which side may submit the next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    /// This process.
    Local,
    /// The peer.
    Remote,
}

impl Turn {
    /// The other side.
    pub fn flip(self) -> Self {
        match self {
            Turn::Local => Turn::Remote,
            Turn::Remote => Turn::Local,
        }
    }

    /// Opening turn for a side. The listener always moves first.
    pub fn opening(side: Side) -> Self {
        match side {
            Side::Listener => Turn::Local,
            Side::Connector => Turn::Remote,
        }
    }
}

/// What happened during one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    /// The move was applied and the other side is now to move.
    Continue,
    /// The move ended the round.
    Finished(Outcome),
    /// The local player quit instead of moving.
    Quit,
}

/// How one round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// The board reached a terminal state.
    Finished(Outcome),
    /// The local player quit mid-round.
    Quit,
}

/// Why a session ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// At least one side voted against a rematch.
    Declined,
    /// The local player quit.
    Quit,
}

/// Summary of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SessionReport {
    /// Outcome of every finished round, in order.
    outcomes: Vec<Outcome>,
    /// Why the session ended.
    ended_by: EndReason,
}

/// Local side of a game over one connection.
///
/// Owns the board and the turn; borrows the transport and the player
/// from the bootstrap layer, which may run several sessions over time.
pub struct GameSession<'a, T, P> {
    transport: &'a mut T,
    player: &'a mut P,
    roles: Roles,
    board: Board,
    turn: Turn,
    round: usize,
}

impl<'a, T, P> GameSession<'a, T, P>
where
    T: Transport,
    P: Player,
{
    /// Creates a session on a fresh board with settled roles.
    #[instrument(skip(transport, player), fields(player = %player.name()))]
    pub fn new(transport: &'a mut T, player: &'a mut P, roles: Roles) -> Self {
        info!(local = %roles.local(), side = ?roles.side(), "Creating game session");
        Self {
            transport,
            player,
            roles,
            board: Board::new(),
            turn: Turn::opening(roles.side()),
            round: 1,
        }
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move next.
    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Settled roles.
    pub fn roles(&self) -> Roles {
        self.roles
    }

    /// One-based round number.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Plays rounds until a rematch is declined or the player quits.
    ///
    /// Closes the transport before returning `Ok`. Errors are returned as
    /// soon as they occur; the caller drops the connection.
    #[instrument(skip(self), fields(side = ?self.roles.side()))]
    pub async fn run(mut self) -> Result<SessionReport, SessionError> {
        let mut outcomes = Vec::new();
        loop {
            self.player.notify(GameEvent::RoundStarted { round: self.round });
            match self.play_round().await? {
                RoundEnd::Quit => {
                    info!(round = self.round, "Local player quit");
                    self.close().await;
                    return Ok(SessionReport {
                        outcomes,
                        ended_by: EndReason::Quit,
                    });
                }
                RoundEnd::Finished(outcome) => outcomes.push(outcome),
            }

            if !self.negotiate_replay().await? {
                self.close().await;
                return Ok(SessionReport {
                    outcomes,
                    ended_by: EndReason::Declined,
                });
            }
            self.reset();
        }
    }

    /// Alternates turns until the round ends.
    #[instrument(skip(self), fields(round = self.round))]
    pub async fn play_round(&mut self) -> Result<RoundEnd, SessionError> {
        loop {
            let result = match self.turn {
                Turn::Local => self.local_turn().await?,
                Turn::Remote => self.remote_turn().await?,
            };
            match result {
                TurnResult::Continue => {}
                TurnResult::Quit => return Ok(RoundEnd::Quit),
                TurnResult::Finished(outcome) => {
                    info!(?outcome, "Round finished");
                    self.player.notify(GameEvent::GameOver {
                        outcome,
                        board: self.board.clone(),
                    });
                    return Ok(RoundEnd::Finished(outcome));
                }
            }
        }
    }

    /// Asks the local player until a legal move is entered, then sends it.
    ///
    /// A refused move sends nothing and keeps the turn.
    #[instrument(skip(self))]
    pub async fn local_turn(&mut self) -> Result<TurnResult, SessionError> {
        self.player.notify(GameEvent::YourTurn {
            board: self.board.clone(),
        });
        loop {
            let (row, col) = match self.player.get_move(&self.board).await? {
                TurnInput::Quit => return Ok(TurnResult::Quit),
                TurnInput::Move { row, col } => (row, col),
            };
            let mark = self.roles.local();
            match self.board.make_move(row, col, mark) {
                Ok(position) => {
                    self.transport
                        .send(&Message::Move(position).encode())
                        .await?;
                    debug!(%position, %mark, "Local move sent");
                    self.player.notify(GameEvent::MovePlayed {
                        mark,
                        position,
                        board: self.board.clone(),
                    });
                    return Ok(self.advance());
                }
                Err(err) => {
                    debug!(row, col, error = %err, "Local move refused");
                    self.player.notify(GameEvent::InvalidMove(err));
                }
            }
        }
    }

    /// Waits for the peer's move and applies it.
    ///
    /// The peer validated the move on its own board, so it is not checked
    /// again here. A move onto an occupied square cannot be applied; it is
    /// logged and skipped, and the turn passes anyway.
    #[instrument(skip(self))]
    pub async fn remote_turn(&mut self) -> Result<TurnResult, SessionError> {
        self.player.notify(GameEvent::WaitingForOpponent);
        let token = self.transport.receive().await?;
        let position = codec::decode_move(&token).inspect_err(|err| {
            warn!(error = %err, "Peer sent an undecodable move");
        })?;

        let mark = self.roles.remote();
        match self.board.place(position, mark) {
            Ok(()) => {
                debug!(%position, %mark, "Remote move applied");
                self.player.notify(GameEvent::MovePlayed {
                    mark,
                    position,
                    board: self.board.clone(),
                });
            }
            Err(err) => warn!(error = %err, "Peer move conflicts with local board; skipped"),
        }
        Ok(self.advance())
    }

    /// Exchanges rematch votes in the fixed order described at module level.
    #[instrument(skip(self))]
    pub async fn negotiate_replay(&mut self) -> Result<bool, SessionError> {
        let (local, remote) = match self.roles.side() {
            Side::Listener => {
                let local = self.player.wants_rematch().await?;
                self.transport.send(&Message::Replay(local).encode()).await?;
                let remote = codec::decode_vote(&self.transport.receive().await?)?;
                (local, remote)
            }
            Side::Connector => {
                let remote = codec::decode_vote(&self.transport.receive().await?)?;
                let local = if remote {
                    self.player.wants_rematch().await?
                } else {
                    false
                };
                self.transport.send(&Message::Replay(local).encode()).await?;
                (local, remote)
            }
        };
        info!(local, remote, "Replay votes exchanged");
        self.player.notify(GameEvent::ReplayDecided { local, remote });
        Ok(local && remote)
    }

    /// Evaluates the board after a move and flips the turn if play goes on.
    fn advance(&mut self) -> TurnResult {
        match self.outcome() {
            Some(outcome) => TurnResult::Finished(outcome),
            None => {
                self.turn = self.turn.flip();
                TurnResult::Continue
            }
        }
    }

    /// Terminal result from the local point of view, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.board.status() {
            GameStatus::InProgress => None,
            GameStatus::Won(mark) if mark == self.roles.local() => Some(Outcome::Win),
            GameStatus::Won(_) => Some(Outcome::Loss),
            GameStatus::Draw => Some(Outcome::Draw),
        }
    }

    fn reset(&mut self) {
        self.board = Board::new();
        self.turn = Turn::opening(self.roles.side());
        self.round += 1;
        debug!(round = self.round, "Board reset for rematch");
    }

    async fn close(&mut self) {
        self.player.notify(GameEvent::Closing);
        if let Err(err) = self.transport.close().await {
            debug!(error = %err, "Transport already closed");
        }
    }
}
