//! Error types for the session state machine.

use crate::board::Edge;
use crate::difficulty::Difficulty;
use crate::phases::Phase;
use crate::session::Ticket;

/// Why a point pair is not an edge.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EdgeError {
    /// Point index outside `0..=5`.
    #[display("point {} is not on the board", _0)]
    OutOfRange(u8),

    /// Both endpoints are the same point.
    #[display("edge from point {} to itself", _0)]
    Loop(u8),

    /// Text that does not spell two point indices.
    #[display("cannot read an edge from {:?}", _0)]
    Unparsable(String),
}

impl std::error::Error for EdgeError {}

/// The trigger a session was asked to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Trigger {
    /// `request_start`.
    #[strum(to_string = "start a match")]
    Start,
    /// `on_start_response`.
    #[strum(to_string = "apply a start response")]
    StartResponse,
    /// `request_move`.
    #[strum(to_string = "submit a move")]
    Move,
    /// `on_move_response`.
    #[strum(to_string = "apply a move response")]
    MoveResponse,
}

/// A request the client refuses before anything reaches the arbiter.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ValidationError {
    /// Difficulty outside `1..=8`.
    #[display("difficulty {} is outside 1..=8", _0)]
    DifficultyOutOfRange(u8),

    /// Submit pressed with nothing selected.
    #[display("no move selected")]
    NoMoveSelected,

    /// A retried start asked for a different difficulty.
    #[display("difficulty is fixed at {} for this match, not {}", fixed, requested)]
    DifficultyFixed {
        /// The level chosen for the match.
        fixed: Difficulty,
        /// The level the retry asked for.
        requested: u8,
    },

    /// The edge is not in the arbiter's last announced pool.
    #[display("edge {} is not available", _0)]
    Unavailable(Edge),

    /// The trigger is not allowed in the current phase.
    #[display("cannot {} while {}", trigger, phase)]
    WrongPhase {
        /// What was attempted.
        trigger: Trigger,
        /// The phase it was attempted in.
        phase: Phase,
    },
}

impl std::error::Error for ValidationError {}

/// The arbiter answered with something that breaks its contract.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ProtocolError {
    /// No legal moves and no outcome. Never read as a loss.
    #[display("arbiter reported an empty pool without an outcome")]
    EmptyPool,

    /// The opponent's reply is an edge somebody already owns.
    #[display("opponent move {} is already claimed", _0)]
    AlreadyClaimed(Edge),

    /// The reported pool offers an edge somebody already owns.
    #[display("pool offers claimed edge {}", _0)]
    PoolOverlapsClaims(Edge),

    /// The payload could not be read at all.
    #[display("malformed arbiter response: {}", _0)]
    Malformed(String),
}

impl std::error::Error for ProtocolError {}

/// Error returned by [`Session`](crate::Session) transitions.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum SessionError {
    /// Rejected locally; state unchanged.
    #[display("{}", _0)]
    Validation(ValidationError),

    /// Arbiter contract violated; the match needs a reset.
    #[display("{}", _0)]
    Protocol(ProtocolError),

    /// A response for a request that is no longer outstanding.
    #[display("discarded stale response for {}", ticket)]
    #[from(ignore)]
    Stale {
        /// Ticket the response carried.
        ticket: Ticket,
        /// Ticket the session is waiting on, if any.
        outstanding: Option<Ticket>,
    },
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Validation(err) => Some(err),
            SessionError::Protocol(err) => Some(err),
            SessionError::Stale { .. } => None,
        }
    }
}
