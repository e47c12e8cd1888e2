//! Scripted player for automated games and tests.

use super::{Player, TurnInput};
use crate::error::SessionError;
use crate::events::GameEvent;
use std::collections::VecDeque;
use tracing::debug;
use ttt_board::{Board, Mark};

/// Player that replays a fixed list of inputs and records every event.
///
/// Running out of moves behaves like a closed input.
#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    name: String,
    mark: Mark,
    moves: VecDeque<TurnInput>,
    votes: VecDeque<bool>,
    reconnects: VecDeque<bool>,
    events: Vec<GameEvent>,
}

impl ScriptedPlayer {
    /// Creates a scripted player with no moves that would choose X.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mark: Mark::X,
            moves: VecDeque::new(),
            votes: VecDeque::new(),
            reconnects: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Mark returned when asked to choose one.
    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.mark = mark;
        self
    }

    /// Appends candidate moves, in order.
    pub fn with_moves(mut self, moves: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.moves
            .extend(moves.into_iter().map(|(row, col)| TurnInput::Move { row, col }));
        self
    }

    /// Appends a quit after the queued moves.
    pub fn then_quit(mut self) -> Self {
        self.moves.push_back(TurnInput::Quit);
        self
    }

    /// Appends replay votes, in order. Missing votes count as "no".
    pub fn with_votes(mut self, votes: impl IntoIterator<Item = bool>) -> Self {
        self.votes.extend(votes);
        self
    }

    /// Appends answers to the reconnect question. Missing answers count
    /// as "no".
    pub fn with_reconnects(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.reconnects.extend(answers);
        self
    }

    /// Every event received so far.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Inputs not yet consumed.
    pub fn remaining_moves(&self) -> usize {
        self.moves.len()
    }
}

#[async_trait::async_trait]
impl Player for ScriptedPlayer {
    async fn choose_mark(&mut self) -> Result<Mark, SessionError> {
        Ok(self.mark)
    }

    async fn get_move(&mut self, _board: &Board) -> Result<TurnInput, SessionError> {
        let input = self.moves.pop_front().ok_or(SessionError::InputClosed)?;
        debug!(player = %self.name, ?input, "Scripted input");
        Ok(input)
    }

    async fn wants_rematch(&mut self) -> Result<bool, SessionError> {
        Ok(self.votes.pop_front().unwrap_or(false))
    }

    async fn wants_reconnect(&mut self) -> Result<bool, SessionError> {
        Ok(self.reconnects.pop_front().unwrap_or(false))
    }

    fn notify(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn name(&self) -> &str {
        &self.name
    }
}
