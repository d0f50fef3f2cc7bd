//! Tests for the match session lifecycle.

use std::collections::BTreeSet;
use strictly_sim_session::{
    Edge, FailureKind, MoveReply, Outcome, Phase, ProtocolError, Recovery, Session, SessionError,
    Side, Trigger, ValidationError,
};

fn edge(a: u8, b: u8) -> Edge {
    Edge::from_indices(a, b).expect("valid edge")
}

fn pool(edges: &[(u8, u8)]) -> BTreeSet<Edge> {
    edges.iter().map(|&(a, b)| edge(a, b)).collect()
}

/// A session that has received `available` as its opening pool.
fn started(available: &[(u8, u8)]) -> Session {
    let mut session = Session::new();
    let ticket = session.request_start(3).expect("start accepted");
    session
        .on_start_response(ticket, pool(available))
        .expect("start response applied");
    session
}

#[test]
fn test_start_installs_pool() {
    let session = started(&[(0, 1), (0, 2), (1, 2)]);

    assert_eq!(session.phase(), Phase::Selecting);
    assert_eq!(session.available(), &pool(&[(0, 1), (0, 2), (1, 2)]));
    assert_eq!(session.difficulty().map(|d| d.level()), Some(3));
    assert!(session.player_claims().is_empty());
    assert!(session.opponent_claims().is_empty());
    assert_eq!(session.outcome(), None);
}

#[test]
fn test_move_is_claimed_optimistically() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);

    session.request_move(Some(edge(0, 2))).expect("move accepted");

    assert_eq!(session.phase(), Phase::AwaitingResponse);
    assert!(session.player_claims().contains(&edge(0, 2)));
    assert!(!session.available().contains(&edge(0, 2)));
    assert_eq!(session.pending(), Some(edge(0, 2)));
}

#[test]
fn test_continue_response_records_opponent_and_replaces_pool() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (ticket, _) = session.request_move(Some(edge(0, 2))).unwrap();

    session
        .on_move_response(
            ticket,
            MoveReply::Continue {
                opponent: edge(0, 1),
                available: pool(&[(1, 2)]),
            },
        )
        .expect("response applied");

    assert_eq!(session.phase(), Phase::Selecting);
    assert!(session.opponent_claims().contains(&edge(0, 1)));
    assert!(session.player_claims().contains(&edge(0, 2)));
    assert_eq!(session.available(), &pool(&[(1, 2)]));
    assert_eq!(session.pending(), None);
    assert_eq!(session.owner(edge(0, 1)), Some(Side::Opponent));
    assert_eq!(session.owner(edge(1, 2)), None);
}

#[test]
fn test_opponent_loss_ends_match() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (ticket, _) = session.request_move(Some(edge(1, 2))).unwrap();

    session
        .on_move_response(
            ticket,
            MoveReply::Lost {
                loser: Side::Opponent,
                opponent: None,
            },
        )
        .unwrap();

    assert_eq!(session.phase(), Phase::Ended);
    assert_eq!(session.outcome(), Some(Outcome::OpponentLost));
    assert_eq!(session.winner(), Some(Side::Player));
    assert!(session.opponent_claims().is_empty());
    assert!(session.available().is_empty());
}

#[test]
fn test_reported_losing_move_is_recorded() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (ticket, _) = session.request_move(Some(edge(1, 2))).unwrap();

    session
        .on_move_response(
            ticket,
            MoveReply::Lost {
                loser: Side::Opponent,
                opponent: Some(edge(0, 1)),
            },
        )
        .unwrap();

    assert_eq!(session.outcome(), Some(Outcome::OpponentLost));
    assert!(session.opponent_claims().contains(&edge(0, 1)));
}

#[test]
fn test_player_loss_keeps_losing_move_with_player() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (ticket, _) = session.request_move(Some(edge(0, 1))).unwrap();

    session
        .on_move_response(
            ticket,
            MoveReply::Lost {
                loser: Side::Player,
                opponent: None,
            },
        )
        .unwrap();

    assert_eq!(session.outcome(), Some(Outcome::PlayerLost));
    assert!(session.player_claims().contains(&edge(0, 1)));
    assert!(session.opponent_claims().is_empty());
}

#[test]
fn test_move_outside_pool_is_rejected_without_change() {
    let mut session = started(&[(1, 2)]);
    let before_claims = session.player_claims().clone();

    let err = session.request_move(Some(edge(4, 5))).unwrap_err();

    assert_eq!(err, SessionError::Validation(ValidationError::Unavailable(edge(4, 5))));
    assert_eq!(session.phase(), Phase::Selecting);
    assert_eq!(session.player_claims(), &before_claims);
    assert_eq!(session.outstanding(), None);
}

#[test]
fn test_empty_selection_is_rejected() {
    let mut session = started(&[(1, 2)]);

    let err = session.request_move(None).unwrap_err();

    assert_eq!(err, SessionError::Validation(ValidationError::NoMoveSelected));
    assert_eq!(session.phase(), Phase::Selecting);
}

#[test]
fn test_reset_after_end_clears_everything() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (ticket, _) = session.request_move(Some(edge(0, 1))).unwrap();
    session
        .on_move_response(
            ticket,
            MoveReply::Lost {
                loser: Side::Opponent,
                opponent: Some(edge(0, 2)),
            },
        )
        .unwrap();
    let ended_match = session.match_id();

    session.reset();

    assert_eq!(session.phase(), Phase::NotStarted);
    assert!(session.player_claims().is_empty());
    assert!(session.opponent_claims().is_empty());
    assert!(session.available().is_empty());
    assert_eq!(session.outcome(), None);
    assert_eq!(session.difficulty(), None);
    assert_ne!(session.match_id(), ended_match);
}

#[test]
fn test_out_of_range_difficulty_is_rejected() {
    let mut session = Session::new();

    for level in [0, 9] {
        let err = session.request_start(level).unwrap_err();
        assert_eq!(
            err,
            SessionError::Validation(ValidationError::DifficultyOutOfRange(level))
        );
    }
    assert_eq!(session.phase(), Phase::NotStarted);
    assert_eq!(session.outstanding(), None);
}

#[test]
fn test_second_start_without_reset_is_rejected() {
    let mut session = started(&[(0, 1)]);

    let err = session.request_start(2).unwrap_err();

    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::WrongPhase {
            trigger: Trigger::Start,
            phase: Phase::Selecting,
        })
    ));
}

#[test]
fn test_moves_rejected_while_awaiting_arbiter() {
    let mut session = Session::new();
    session.request_start(1).unwrap();

    let err = session.request_move(Some(edge(0, 1))).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::WrongPhase {
            phase: Phase::AwaitingStart,
            ..
        })
    ));

    let mut session = started(&[(0, 1), (0, 2)]);
    session.request_move(Some(edge(0, 1))).unwrap();
    let err = session.request_move(Some(edge(0, 2))).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::WrongPhase {
            phase: Phase::AwaitingResponse,
            ..
        })
    ));
    assert!(!session.player_claims().contains(&edge(0, 2)));
}

#[test]
fn test_empty_pool_without_outcome_is_protocol_error() {
    let mut session = started(&[(0, 1), (0, 2)]);
    let (ticket, _) = session.request_move(Some(edge(0, 1))).unwrap();

    let err = session
        .on_move_response(
            ticket,
            MoveReply::Continue {
                opponent: edge(0, 2),
                available: BTreeSet::new(),
            },
        )
        .unwrap_err();

    assert_eq!(err, SessionError::Protocol(ProtocolError::EmptyPool));
    assert_eq!(session.phase(), Phase::Interrupted(Recovery::ResetRequired));
    assert_eq!(session.outcome(), None);
    assert!(session.player_claims().is_empty());
    assert!(session.opponent_claims().is_empty());
}

#[test]
fn test_empty_opening_pool_is_protocol_error() {
    let mut session = Session::new();
    let ticket = session.request_start(3).unwrap();

    let err = session.on_start_response(ticket, BTreeSet::new()).unwrap_err();

    assert_eq!(err, SessionError::Protocol(ProtocolError::EmptyPool));
    assert!(session.phase().needs_reset());
}

#[test]
fn test_opponent_double_claim_is_protocol_error() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (ticket, _) = session.request_move(Some(edge(0, 1))).unwrap();

    let err = session
        .on_move_response(
            ticket,
            MoveReply::Continue {
                opponent: edge(0, 1),
                available: pool(&[(1, 2)]),
            },
        )
        .unwrap_err();

    assert_eq!(err, SessionError::Protocol(ProtocolError::AlreadyClaimed(edge(0, 1))));
    assert!(session.player_claims().is_empty());
}

#[test]
fn test_pool_offering_claimed_edge_is_protocol_error() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (ticket, _) = session.request_move(Some(edge(0, 1))).unwrap();

    let err = session
        .on_move_response(
            ticket,
            MoveReply::Continue {
                opponent: edge(0, 2),
                available: pool(&[(0, 2), (1, 2)]),
            },
        )
        .unwrap_err();

    assert_eq!(
        err,
        SessionError::Protocol(ProtocolError::PoolOverlapsClaims(edge(0, 2)))
    );
}

#[test]
fn test_transport_failure_rolls_back_and_allows_retry() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (ticket, _) = session.request_move(Some(edge(0, 1))).unwrap();

    let phase = session.on_failure(ticket, FailureKind::Transport).unwrap();

    assert_eq!(phase, Phase::Interrupted(Recovery::RetryMove));
    assert!(session.player_claims().is_empty());
    assert_eq!(session.available(), &pool(&[(0, 1), (0, 2), (1, 2)]));

    let (retry, _) = session.request_move(Some(edge(0, 1))).expect("retry accepted");
    assert_ne!(retry, ticket);
    assert_eq!(session.phase(), Phase::AwaitingResponse);
}

#[test]
fn test_start_transport_failure_allows_retry() {
    let mut session = Session::new();
    let ticket = session.request_start(5).unwrap();

    session.on_failure(ticket, FailureKind::Transport).unwrap();
    assert_eq!(session.phase(), Phase::Interrupted(Recovery::RetryStart));

    let retry = session.request_start(5).unwrap();
    session.on_start_response(retry, pool(&[(2, 3)])).unwrap();
    assert_eq!(session.phase(), Phase::Selecting);
}

#[test]
fn test_start_retry_keeps_difficulty() {
    let mut session = Session::new();
    let ticket = session.request_start(5).unwrap();
    session.on_failure(ticket, FailureKind::Transport).unwrap();

    let err = session.request_start(2).unwrap_err();

    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::DifficultyFixed { requested: 2, .. })
    ));
    assert_eq!(session.phase(), Phase::Interrupted(Recovery::RetryStart));
    assert_eq!(session.difficulty().map(|d| d.level()), Some(5));
    assert_eq!(session.outstanding(), None);

    session.reset();
    assert!(session.request_start(2).is_ok());
}

#[test]
fn test_accepted_move_returns_the_claimed_edge() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);

    let (ticket, claimed) = session.request_move(Some(edge(2, 1))).unwrap();

    assert_eq!(claimed, edge(1, 2));
    assert_eq!(session.pending(), Some(claimed));
    assert_eq!(session.outstanding(), Some(ticket));
}

#[test]
fn test_protocol_failure_requires_reset() {
    let mut session = started(&[(0, 1), (0, 2)]);
    let (ticket, _) = session.request_move(Some(edge(0, 1))).unwrap();

    session.on_failure(ticket, FailureKind::Protocol).unwrap();

    assert_eq!(session.phase(), Phase::Interrupted(Recovery::ResetRequired));
    assert!(session.request_move(Some(edge(0, 1))).is_err());
    assert!(session.request_start(3).is_err());
    session.reset();
    assert!(session.request_start(3).is_ok());
}

#[test]
fn test_stale_response_after_reset_is_discarded() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (old_ticket, _) = session.request_move(Some(edge(0, 1))).unwrap();

    session.reset();
    let ticket = session.request_start(3).unwrap();
    session.on_start_response(ticket, pool(&[(3, 4), (3, 5)])).unwrap();

    let err = session
        .on_move_response(
            old_ticket,
            MoveReply::Continue {
                opponent: edge(0, 2),
                available: pool(&[(1, 2)]),
            },
        )
        .unwrap_err();

    assert!(matches!(err, SessionError::Stale { ticket, .. } if ticket == old_ticket));
    assert_eq!(session.phase(), Phase::Selecting);
    assert!(session.opponent_claims().is_empty());
    assert_eq!(session.available(), &pool(&[(3, 4), (3, 5)]));
}

#[test]
fn test_duplicate_response_is_discarded() {
    let mut session = started(&[(0, 1), (0, 2), (1, 2)]);
    let (ticket, _) = session.request_move(Some(edge(0, 1))).unwrap();
    let reply = MoveReply::Continue {
        opponent: edge(0, 2),
        available: pool(&[(1, 2)]),
    };

    session.on_move_response(ticket, reply.clone()).unwrap();
    let err = session.on_move_response(ticket, reply).unwrap_err();

    assert!(matches!(err, SessionError::Stale { outstanding: None, .. }));
    assert_eq!(session.opponent_claims().len(), 1);
}
