//! Human player reading from a line-oriented input and printing to stdout.

use super::{Player, TurnInput};
use crate::error::SessionError;
use crate::events::GameEvent;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, instrument, warn};
use ttt_board::{Board, Mark};

/// Parses one line of move input: `"row col"` or `q` to quit.
///
/// Returns `None` for anything else. Coordinates are not range-checked
/// here; the board does that.
pub fn parse_turn_input(line: &str) -> Option<TurnInput> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Some(TurnInput::Quit);
    }
    let mut parts = line.split_whitespace();
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(TurnInput::Move { row, col })
}

/// Human player at a terminal.
pub struct HumanPlayer<R> {
    name: String,
    input: Lines<R>,
    preset_mark: Option<Mark>,
}

impl HumanPlayer<BufReader<Stdin>> {
    /// Creates a player reading from stdin.
    pub fn stdio(name: impl Into<String>, preset_mark: Option<Mark>) -> Self {
        Self::new(name, BufReader::new(tokio::io::stdin()), preset_mark)
    }
}

impl<R> HumanPlayer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Creates a player reading lines from `reader`.
    ///
    /// With a `preset_mark` the mark prompt is skipped.
    pub fn new(name: impl Into<String>, reader: R, preset_mark: Option<Mark>) -> Self {
        Self {
            name: name.into(),
            input: reader.lines(),
            preset_mark,
        }
    }

    async fn prompt(&mut self, text: &str) -> Result<String, SessionError> {
        print!("{text}");
        if let Err(e) = std::io::stdout().flush() {
            warn!(error = %e, "Failed to flush stdout");
        }
        match self.input.next_line().await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => {
                debug!("Input reached end of file");
                Err(SessionError::InputClosed)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read input");
                Err(SessionError::InputClosed)
            }
        }
    }
}

#[async_trait::async_trait]
impl<R> Player for HumanPlayer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    #[instrument(skip(self), fields(player = %self.name))]
    async fn choose_mark(&mut self) -> Result<Mark, SessionError> {
        if let Some(mark) = self.preset_mark {
            return Ok(mark);
        }
        let mut text = "Choose your player (X/O): ";
        loop {
            let line = self.prompt(text).await?;
            if let Some(mark) = Mark::from_input(&line) {
                return Ok(mark);
            }
            text = "Invalid choice. Choose your player (X/O): ";
        }
    }

    #[instrument(skip(self, _board), fields(player = %self.name))]
    async fn get_move(&mut self, _board: &Board) -> Result<TurnInput, SessionError> {
        loop {
            let line = self
                .prompt("Enter your move as row and column (e.g. top left: 0 0, bottom right: 2 2) or q to quit: ")
                .await?;
            match parse_turn_input(&line) {
                Some(input) => return Ok(input),
                None => println!("Invalid move. Try again."),
            }
        }
    }

    #[instrument(skip(self), fields(player = %self.name))]
    async fn wants_rematch(&mut self) -> Result<bool, SessionError> {
        let answer = self.prompt("Do you want to play again? (y/n): ").await?;
        let answer = answer.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    #[instrument(skip(self), fields(player = %self.name))]
    async fn wants_reconnect(&mut self) -> Result<bool, SessionError> {
        let answer = self
            .prompt("Press enter to play again or type \"q\" to quit: ")
            .await?;
        Ok(!answer.trim().eq_ignore_ascii_case("q"))
    }

    fn notify(&mut self, event: GameEvent) {
        match event {
            GameEvent::Listening { addr } => {
                println!("Server started on {addr}, waiting for a client...");
            }
            GameEvent::Connected => println!("Connected. Setting up the game..."),
            GameEvent::ConnectionLost { reason } => println!("{reason}"),
            GameEvent::AwaitingNextClient => {
                println!("Client disconnected, waiting for new connections...");
            }
            GameEvent::RolesAssigned(roles) => {
                let order = if roles.moves_first() {
                    "You move first."
                } else {
                    "Your opponent moves first."
                };
                println!("You are {}. {order}", roles.local());
            }
            GameEvent::RoundStarted { round } if round > 1 => {
                println!("Starting round {round}.");
            }
            GameEvent::RoundStarted { .. } => {}
            GameEvent::YourTurn { board } => {
                let free: Vec<String> = board
                    .valid_moves()
                    .iter()
                    .map(|pos| format!("{} {}", pos.row(), pos.col()))
                    .collect();
                println!("Your turn. Free cells: {}", free.join(", "));
            }
            GameEvent::WaitingForOpponent => println!("Waiting for the opponent's move..."),
            GameEvent::InvalidMove(err) => println!("Invalid move. Try again. ({err})"),
            GameEvent::MovePlayed { board, .. } => println!("{board}\n"),
            GameEvent::GameOver { outcome, .. } => {
                println!("{outcome}");
                println!("Game over.");
            }
            GameEvent::ReplayDecided { local, remote } => {
                if local && remote {
                    println!("Both players want a rematch.");
                } else {
                    println!("Not everyone wants to play again. Goodbye!");
                }
            }
            GameEvent::Closing => println!("Closing connection."),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
