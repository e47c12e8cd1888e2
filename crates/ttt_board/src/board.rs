//! The 3x3 grid and its move legality.

use super::position::Position;
use super::rules;
use super::types::{GameStatus, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Reason a move was refused. The board is left untouched in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Coordinates outside `0..=2`.
    #[display("({row}, {col}) is off the board")]
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The square already holds a mark.
    #[display("{position} is already occupied by {mark}")]
    Occupied {
        /// The occupied square.
        position: Position,
        /// The mark already on it.
        mark: Mark,
    },
}

/// 3x3 tic-tac-toe board.
///
/// A square goes from empty to a mark at most once; nothing in this type
/// clears or overwrites a placed mark.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of marks placed so far.
    pub fn filled(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Places `mark` at zero-based `(row, col)`.
    ///
    /// Returns the placed position on success.
    #[instrument(skip(self))]
    pub fn make_move(&mut self, row: usize, col: usize, mark: Mark) -> Result<Position, MoveError> {
        let position =
            Position::from_coords(row, col).ok_or(MoveError::OutOfRange { row, col })?;
        self.place(position, mark)?;
        Ok(position)
    }

    /// Places `mark` at an already-resolved position.
    #[instrument(skip(self))]
    pub fn place(&mut self, position: Position, mark: Mark) -> Result<(), MoveError> {
        if let Square::Occupied(existing) = self.get(position) {
            debug!(%position, %existing, "Refusing move onto occupied square");
            return Err(MoveError::Occupied {
                position,
                mark: existing,
            });
        }
        self.squares[position.to_index()] = Square::Occupied(mark);
        Ok(())
    }

    /// The mark owning a complete line, if any.
    pub fn winner(&self) -> Option<Mark> {
        rules::check_winner(self)
    }

    /// True iff no square is empty.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// Derives the game status from the squares.
    pub fn status(&self) -> GameStatus {
        if let Some(mark) = self.winner() {
            GameStatus::Won(mark)
        } else if self.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    /// Positions that are still empty.
    pub fn valid_moves(&self) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|pos| self.is_empty(*pos))
            .collect()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let symbol = match self.squares[row * 3 + col] {
                    Square::Empty => ' ',
                    Square::Occupied(Mark::X) => 'X',
                    Square::Occupied(Mark::O) => 'O',
                };
                write!(f, "{symbol}")?;
                if col < 2 {
                    f.write_str("|")?;
                }
            }
            if row < 2 {
                f.write_str("\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}
