//! Full games between two in-process sessions over an in-memory pipe.

use tokio::io::{DuplexStream, ReadHalf, WriteHalf};
use ttt_duel::{
    DEFAULT_RECEIVE_TIMEOUT, EndReason, GameEvent, LineTransport, Mark, Outcome, ScriptedPlayer,
    SessionError, Side, start_session,
};

type PipeTransport = LineTransport<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

fn pipe() -> (PipeTransport, PipeTransport) {
    let (a, b) = tokio::io::duplex(1024);
    let (ar, aw) = tokio::io::split(a);
    let (br, bw) = tokio::io::split(b);
    (
        LineTransport::new(ar, aw, DEFAULT_RECEIVE_TIMEOUT),
        LineTransport::new(br, bw, DEFAULT_RECEIVE_TIMEOUT),
    )
}

fn final_boards(events: &[GameEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::GameOver { board, .. } => Some(board.to_string()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn full_board_without_a_line_is_a_draw_on_both_sides() {
    let (mut server_pipe, mut client_pipe) = pipe();
    // Server is O and opens; the board ends as
    //   O X O
    //   O X X
    //   X O O
    let mut server =
        ScriptedPlayer::new("server").with_moves([(0, 0), (0, 2), (1, 0), (2, 1), (2, 2)]);
    let mut client = ScriptedPlayer::new("client")
        .with_mark(Mark::X)
        .with_moves([(0, 1), (1, 1), (1, 2), (2, 0)]);

    let (server_report, client_report) = tokio::join!(
        start_session(Side::Listener, &mut server_pipe, &mut server),
        start_session(Side::Connector, &mut client_pipe, &mut client),
    );

    let server_report = server_report.unwrap();
    let client_report = client_report.unwrap();
    assert_eq!(server_report.outcomes(), &vec![Outcome::Draw]);
    assert_eq!(client_report.outcomes(), &vec![Outcome::Draw]);
    assert_eq!(*server_report.ended_by(), EndReason::Declined);
    assert_eq!(final_boards(server.events()), final_boards(client.events()));
}

#[tokio::test]
async fn rematch_keeps_marks_and_opening_side() {
    let (mut server_pipe, mut client_pipe) = pipe();
    let server_moves = [(1, 1), (0, 1), (2, 1)];
    let client_moves = [(0, 0), (2, 2)];
    let mut server = ScriptedPlayer::new("server")
        .with_moves(server_moves.into_iter().chain(server_moves))
        .with_votes([true, false]);
    let mut client = ScriptedPlayer::new("client")
        .with_mark(Mark::X)
        .with_moves(client_moves.into_iter().chain(client_moves))
        .with_votes([true]);

    let (server_report, client_report) = tokio::join!(
        start_session(Side::Listener, &mut server_pipe, &mut server),
        start_session(Side::Connector, &mut client_pipe, &mut client),
    );

    let server_report = server_report.unwrap();
    let client_report = client_report.unwrap();
    assert_eq!(server_report.outcomes(), &vec![Outcome::Win, Outcome::Win]);
    assert_eq!(client_report.outcomes(), &vec![Outcome::Loss, Outcome::Loss]);
    assert_eq!(server.remaining_moves(), 0);
    assert_eq!(client.remaining_moves(), 0);
    assert!(client.events().contains(&GameEvent::RoundStarted { round: 2 }));
    assert!(client.events().contains(&GameEvent::ReplayDecided {
        local: true,
        remote: true,
    }));
    // Roles are announced once per connection, not per round.
    let announcements = client
        .events()
        .iter()
        .filter(|event| matches!(event, GameEvent::RolesAssigned(_)))
        .count();
    assert_eq!(announcements, 1);
}

#[tokio::test]
async fn declined_rematch_closes_both_sides() {
    let (mut server_pipe, mut client_pipe) = pipe();
    let mut server = ScriptedPlayer::new("server")
        .with_moves([(1, 1), (0, 1), (2, 1)])
        .with_votes([true]);
    let mut client = ScriptedPlayer::new("client")
        .with_mark(Mark::X)
        .with_moves([(0, 0), (2, 2)])
        .with_votes([false]);

    let (server_report, client_report) = tokio::join!(
        start_session(Side::Listener, &mut server_pipe, &mut server),
        start_session(Side::Connector, &mut client_pipe, &mut client),
    );

    assert_eq!(*server_report.unwrap().ended_by(), EndReason::Declined);
    assert_eq!(*client_report.unwrap().ended_by(), EndReason::Declined);
    assert_eq!(server.events().last(), Some(&GameEvent::Closing));
    assert!(server.events().contains(&GameEvent::ReplayDecided {
        local: true,
        remote: false,
    }));
}

#[tokio::test]
async fn quitting_mid_game_disconnects_the_peer() {
    let (mut server_pipe, mut client_pipe) = pipe();
    let mut server = ScriptedPlayer::new("server").with_moves([(1, 1), (0, 0)]);
    let mut client = ScriptedPlayer::new("client").with_mark(Mark::O).then_quit();

    let (server_result, client_result) = tokio::join!(
        start_session(Side::Listener, &mut server_pipe, &mut server),
        start_session(Side::Connector, &mut client_pipe, &mut client),
    );

    let client_report = client_result.unwrap();
    assert_eq!(*client_report.ended_by(), EndReason::Quit);
    assert!(client_report.outcomes().is_empty());

    let err = server_result.unwrap_err();
    assert!(err.is_disconnect(), "unexpected error: {err}");
    assert!(matches!(err, SessionError::Transport(_)));
}
