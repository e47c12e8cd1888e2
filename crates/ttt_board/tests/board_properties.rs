//! Property tests for board legality and outcome detection.

use proptest::prelude::*;
use ttt_board::rules::LINES;
use ttt_board::{Board, GameStatus, Mark, MoveError, Position, Square};

/// A random order in which to fill all nine cells.
fn fill_order() -> impl Strategy<Value = Vec<usize>> {
    Just((0..9).collect::<Vec<usize>>()).prop_shuffle()
}

fn owns_a_line(board: &Board, mark: Mark) -> bool {
    LINES
        .iter()
        .any(|line| line.iter().all(|pos| board.get(*pos) == Square::Occupied(mark)))
}

proptest! {
    #[test]
    fn winner_appears_only_with_a_complete_line(order in fill_order(), first in prop_oneof![Just(Mark::X), Just(Mark::O)]) {
        let mut board = Board::new();
        let mut mark = first;

        for index in order {
            let pos = Position::from_index(index).unwrap();
            board.place(pos, mark).unwrap();

            match board.winner() {
                Some(winner) => {
                    // Only the mover can complete a line.
                    prop_assert_eq!(winner, mark);
                    prop_assert!(owns_a_line(&board, winner));
                    prop_assert!(!owns_a_line(&board, winner.opponent()));
                    break;
                }
                None => {
                    prop_assert!(!owns_a_line(&board, Mark::X));
                    prop_assert!(!owns_a_line(&board, Mark::O));
                }
            }
            mark = mark.opponent();
        }

        match board.status() {
            GameStatus::Won(winner) => prop_assert!(owns_a_line(&board, winner)),
            GameStatus::Draw => {
                prop_assert!(board.is_full());
                prop_assert_eq!(board.winner(), None);
            }
            GameStatus::InProgress => prop_assert!(false, "all moves played without a result"),
        }
    }

    #[test]
    fn refused_moves_never_mutate(order in fill_order(), row in 0usize..6, col in 0usize..6) {
        let mut board = Board::new();
        let mut mark = Mark::X;
        for index in order.into_iter().take(4) {
            board.place(Position::from_index(index).unwrap(), mark).unwrap();
            mark = mark.opponent();
        }
        let before = board.clone();

        match board.make_move(row, col, mark) {
            Ok(pos) => {
                prop_assert!(before.is_empty(pos));
                prop_assert_eq!(board.filled(), before.filled() + 1);
            }
            Err(MoveError::OutOfRange { .. }) => {
                prop_assert!(row > 2 || col > 2);
                prop_assert_eq!(&board, &before);
            }
            Err(MoveError::Occupied { position, .. }) => {
                prop_assert!(!before.is_empty(position));
                prop_assert_eq!(&board, &before);
            }
        }
    }
}

#[test]
fn nine_moves_without_a_line_is_a_draw() {
    // X O X / X O O / O X X, played alternately starting with X.
    let sequence = [
        (0, 0, Mark::X),
        (0, 1, Mark::O),
        (0, 2, Mark::X),
        (1, 1, Mark::O),
        (1, 0, Mark::X),
        (1, 2, Mark::O),
        (2, 1, Mark::X),
        (2, 0, Mark::O),
        (2, 2, Mark::X),
    ];

    let mut board = Board::new();
    for (row, col, mark) in sequence {
        assert_eq!(board.status(), GameStatus::InProgress);
        board.make_move(row, col, mark).unwrap();
    }

    assert!(board.is_full());
    assert_eq!(board.winner(), None);
    assert_eq!(board.status(), GameStatus::Draw);
}
