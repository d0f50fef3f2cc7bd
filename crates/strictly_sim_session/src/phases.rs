//! Match phases and outcomes.
//!
//! A match is always in exactly one [`Phase`]. Everything a UI needs to
//! decide (show the difficulty picker, enable the submit button, show a
//! spinner) is derived from it rather than tracked in parallel flags.

use serde::{Deserialize, Serialize};

/// Where a match currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Phase {
    /// No match requested yet.
    #[display("not started")]
    NotStarted,
    /// Start request sent, waiting for the opening pool.
    #[display("awaiting start")]
    AwaitingStart,
    /// The player may pick an edge from the pool.
    #[display("selecting")]
    Selecting,
    /// Move sent, waiting for the arbiter's verdict and reply.
    #[display("awaiting response")]
    AwaitingResponse,
    /// Someone completed a triangle.
    #[display("ended")]
    Ended,
    /// The last request failed.
    #[display("interrupted ({})", _0)]
    Interrupted(Recovery),
}

impl Phase {
    /// Whether a new match can be requested.
    pub fn can_start(self) -> bool {
        matches!(self, Phase::NotStarted | Phase::Interrupted(Recovery::RetryStart))
    }

    /// Whether a move can be submitted.
    pub fn can_submit(self) -> bool {
        matches!(self, Phase::Selecting | Phase::Interrupted(Recovery::RetryMove))
    }

    /// Whether a request to the arbiter is in flight.
    pub fn is_waiting(self) -> bool {
        matches!(self, Phase::AwaitingStart | Phase::AwaitingResponse)
    }

    /// Whether only [`Session::reset`](crate::Session::reset) can move the match on.
    pub fn needs_reset(self) -> bool {
        matches!(self, Phase::Ended | Phase::Interrupted(Recovery::ResetRequired))
    }
}

/// How an interrupted match can continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Recovery {
    /// The start request may be re-issued.
    #[display("retry start")]
    RetryStart,
    /// A move may be re-submitted; the pool is as it was before the failed move.
    #[display("retry move")]
    RetryMove,
    /// The arbiter broke its contract; the match must be reset.
    #[display("reset required")]
    ResetRequired,
}

/// One of the two sides of a match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// The local human player.
    Player,
    /// The arbiter's AI.
    Opponent,
}

impl Side {
    /// Returns the other side.
    pub fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

/// Result of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player completed a triangle.
    PlayerLost,
    /// The opponent completed a triangle.
    OpponentLost,
}

impl Outcome {
    /// Builds the outcome in which `loser` lost.
    pub fn lost_by(loser: Side) -> Self {
        match loser {
            Side::Player => Outcome::PlayerLost,
            Side::Opponent => Outcome::OpponentLost,
        }
    }

    /// The side that lost.
    pub fn loser(self) -> Side {
        match self {
            Outcome::PlayerLost => Side::Player,
            Outcome::OpponentLost => Side::Opponent,
        }
    }

    /// The side that won.
    pub fn winner(self) -> Side {
        self.loser().other()
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} lost", self.loser())
    }
}
