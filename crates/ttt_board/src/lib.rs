//! Pure tic-tac-toe board logic.
//!
//! This crate has no I/O. It owns the 3x3 grid, decides whether a move is
//! legal, and derives the game status (in progress, won, drawn) from the
//! squares alone. Both peers of a networked game run this same logic on
//! their own copy of the board.
//!
//! # Example
//!
//! ```
//! use ttt_board::{Board, GameStatus, Mark};
//!
//! let mut board = Board::new();
//! board.make_move(1, 1, Mark::O).unwrap();
//! assert!(board.make_move(1, 1, Mark::X).is_err());
//! assert_eq!(board.status(), GameStatus::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod position;
pub mod rules;
mod types;

pub use board::{Board, MoveError};
pub use position::Position;
pub use types::{GameStatus, Mark, Square};
