//! The match session state machine.
//!
//! [`Session`] never decides legality or spots triangles. It records what
//! the arbiter has acknowledged and refuses anything that would break the
//! two client-side guarantees: a move is only ever sent from the last
//! announced pool, and no edge is ever claimed twice.
//!
//! Every outgoing request is issued a [`Ticket`]. A response is applied
//! only when it carries the one ticket the session is waiting on, which
//! keeps a late reply from a reset match out of the next one.

use crate::board::Edge;
use crate::difficulty::Difficulty;
use crate::error::{ProtocolError, SessionError, Trigger, ValidationError};
use crate::phases::{Outcome, Phase, Recovery, Side};
use std::collections::BTreeSet;
use tracing::{debug, error, info, instrument, warn};

/// Identifies one match of a session; advanced by every reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("match {}", _0)]
pub struct MatchId(u64);

impl MatchId {
    fn next(self) -> Self {
        MatchId(self.0 + 1)
    }
}

/// Correlates one arbiter request with its response.
///
/// Only a [`Session`] can mint tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{} request {}", match_id, seq)]
pub struct Ticket {
    match_id: MatchId,
    seq: u32,
}

impl Ticket {
    /// The match the request belongs to.
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Position of the request within its match.
    pub fn seq(&self) -> u32 {
        self.seq
    }
}

/// The arbiter's verdict on a submitted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveReply {
    /// Nobody lost; the opponent answered and a new pool was announced.
    Continue {
        /// The opponent's counter-move.
        opponent: Edge,
        /// Every edge still legal to claim.
        available: BTreeSet<Edge>,
    },
    /// Someone completed a triangle.
    Lost {
        /// Who completed it.
        loser: Side,
        /// The opponent's final move, when the arbiter reports one.
        opponent: Option<Edge>,
    },
}

/// Why an outstanding request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FailureKind {
    /// Network failure or non-success status; the request may be retried.
    #[display("transport")]
    Transport,
    /// Unreadable or contract-breaking response; the match needs a reset.
    #[display("protocol")]
    Protocol,
}

/// One player's view of a SIM match against the arbiter.
#[derive(Debug, Clone)]
pub struct Session {
    match_id: MatchId,
    seq: u32,
    phase: Phase,
    difficulty: Option<Difficulty>,
    player_claims: BTreeSet<Edge>,
    opponent_claims: BTreeSet<Edge>,
    available: BTreeSet<Edge>,
    outcome: Option<Outcome>,
    pending: Option<Edge>,
    outstanding: Option<Ticket>,
}

impl Session {
    /// Creates a session with no match started.
    #[instrument]
    pub fn new() -> Self {
        Self {
            match_id: MatchId(0),
            seq: 0,
            phase: Phase::NotStarted,
            difficulty: None,
            player_claims: BTreeSet::new(),
            opponent_claims: BTreeSet::new(),
            available: BTreeSet::new(),
            outcome: None,
            pending: None,
            outstanding: None,
        }
    }

    /// The current match.
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The difficulty fixed for the current match, once requested.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Edges owned by the player, including a move awaiting its verdict.
    pub fn player_claims(&self) -> &BTreeSet<Edge> {
        &self.player_claims
    }

    /// Edges owned by the opponent.
    pub fn opponent_claims(&self) -> &BTreeSet<Edge> {
        &self.opponent_claims
    }

    /// Edges the arbiter last announced as legal.
    pub fn available(&self) -> &BTreeSet<Edge> {
        &self.available
    }

    /// How the match ended; `None` until the phase is [`Phase::Ended`].
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The player's optimistic move while awaiting its verdict.
    pub fn pending(&self) -> Option<Edge> {
        self.pending
    }

    /// The ticket the session is waiting on.
    pub fn outstanding(&self) -> Option<Ticket> {
        self.outstanding
    }

    /// Which side owns `edge`, if any.
    pub fn owner(&self, edge: Edge) -> Option<Side> {
        if self.player_claims.contains(&edge) {
            Some(Side::Player)
        } else if self.opponent_claims.contains(&edge) {
            Some(Side::Opponent)
        } else {
            None
        }
    }

    /// The winning side once the match has ended.
    pub fn winner(&self) -> Option<Side> {
        self.outcome.map(Outcome::winner)
    }

    /// Asks to start a match at `difficulty`.
    ///
    /// Allowed from [`Phase::NotStarted`], or to retry a start whose request
    /// never got through. A retry must ask for the level already chosen;
    /// the difficulty is fixed for the life of the match. The caller sends
    /// the start request with the returned ticket.
    #[instrument(skip(self), fields(match_id = %self.match_id, phase = %self.phase))]
    pub fn request_start(&mut self, difficulty: u8) -> Result<Ticket, SessionError> {
        if !self.phase.can_start() {
            return Err(self.reject(Trigger::Start));
        }
        let requested = difficulty;
        let difficulty = Difficulty::try_from(requested).inspect_err(|err| {
            warn!(%err, "Rejected start");
        })?;
        if let Some(fixed) = self.difficulty.filter(|fixed| *fixed != difficulty) {
            warn!(%fixed, requested, "Rejected retry at a different difficulty");
            return Err(ValidationError::DifficultyFixed { fixed, requested }.into());
        }

        self.difficulty = Some(difficulty);
        self.phase = Phase::AwaitingStart;
        let ticket = self.issue_ticket();
        info!(%difficulty, %ticket, "Match start requested");
        Ok(ticket)
    }

    /// Installs the opening pool announced by the arbiter.
    #[instrument(skip(self, available), fields(match_id = %self.match_id, pool = available.len()))]
    pub fn on_start_response(
        &mut self,
        ticket: Ticket,
        available: BTreeSet<Edge>,
    ) -> Result<(), SessionError> {
        self.accept(ticket, Trigger::StartResponse, Phase::AwaitingStart)?;

        if let Err(err) = self.check_pool(&available, None) {
            return Err(self.break_match(err));
        }

        self.available = available;
        self.phase = Phase::Selecting;
        self.assert_invariants();
        info!(pool = self.available.len(), "Match started");
        Ok(())
    }

    /// Submits the player's chosen edge.
    ///
    /// `None` models a submit with nothing selected. On success the edge is
    /// claimed optimistically and leaves the pool; the caller sends the
    /// returned edge to the arbiter along with the returned ticket. A
    /// rejected move leaves the session untouched.
    #[instrument(skip(self), fields(match_id = %self.match_id, phase = %self.phase))]
    pub fn request_move(&mut self, choice: Option<Edge>) -> Result<(Ticket, Edge), SessionError> {
        if !self.phase.can_submit() {
            return Err(self.reject(Trigger::Move));
        }
        let edge = choice.ok_or(ValidationError::NoMoveSelected)?;
        if !self.available.contains(&edge) {
            warn!(%edge, "Rejected move outside the pool");
            return Err(ValidationError::Unavailable(edge).into());
        }

        self.available.remove(&edge);
        self.player_claims.insert(edge);
        self.pending = Some(edge);
        self.phase = Phase::AwaitingResponse;
        let ticket = self.issue_ticket();
        self.assert_invariants();
        info!(%edge, %ticket, "Move submitted");
        Ok((ticket, edge))
    }

    /// Applies the arbiter's verdict on the pending move.
    #[instrument(skip(self, reply), fields(match_id = %self.match_id))]
    pub fn on_move_response(&mut self, ticket: Ticket, reply: MoveReply) -> Result<(), SessionError> {
        self.accept(ticket, Trigger::MoveResponse, Phase::AwaitingResponse)?;
        debug!(?reply, "Applying move response");

        match reply {
            MoveReply::Continue { opponent, available } => {
                let checked = self
                    .check_opponent(opponent)
                    .and_then(|()| self.check_pool(&available, Some(opponent)));
                if let Err(err) = checked {
                    return Err(self.break_match(err));
                }

                self.pending = None;
                self.opponent_claims.insert(opponent);
                self.available = available;
                self.phase = Phase::Selecting;
                info!(%opponent, pool = self.available.len(), "Opponent replied");
            }
            MoveReply::Lost { loser, opponent } => {
                if let Some(edge) = opponent {
                    if let Err(err) = self.check_opponent(edge) {
                        return Err(self.break_match(err));
                    }
                }

                self.pending = None;
                if let Some(edge) = opponent {
                    self.opponent_claims.insert(edge);
                }
                self.available.clear();
                let outcome = Outcome::lost_by(loser);
                self.outcome = Some(outcome);
                self.phase = Phase::Ended;
                info!(%outcome, "Match ended");
            }
        }

        self.assert_invariants();
        Ok(())
    }

    /// Records that the outstanding request failed.
    ///
    /// Rolls back the optimistic claim, if any. After a transport failure the
    /// same request may be issued again; after a protocol failure only
    /// [`reset`](Self::reset) moves the match on.
    #[instrument(skip(self), fields(match_id = %self.match_id, phase = %self.phase))]
    pub fn on_failure(&mut self, ticket: Ticket, kind: FailureKind) -> Result<Phase, SessionError> {
        self.claim_ticket(ticket)?;

        let recovery = match (kind, self.phase) {
            (FailureKind::Transport, Phase::AwaitingStart) => Recovery::RetryStart,
            (FailureKind::Transport, Phase::AwaitingResponse) => Recovery::RetryMove,
            _ => Recovery::ResetRequired,
        };
        self.interrupt(recovery);
        warn!(%kind, phase = %self.phase, "Request failed");
        Ok(self.phase)
    }

    /// Discards the match and returns to [`Phase::NotStarted`].
    ///
    /// Allowed from any phase. Responses still in flight for the discarded
    /// match become stale.
    #[instrument(skip(self), fields(match_id = %self.match_id, phase = %self.phase))]
    pub fn reset(&mut self) {
        let next = self.match_id.next();
        *self = Self {
            match_id: next,
            ..Self::new()
        };
        info!(match_id = %next, "Session reset");
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.seq += 1;
        let ticket = Ticket {
            match_id: self.match_id,
            seq: self.seq,
        };
        self.outstanding = Some(ticket);
        ticket
    }

    /// Consumes the outstanding ticket if `ticket` is it.
    fn claim_ticket(&mut self, ticket: Ticket) -> Result<(), SessionError> {
        if self.outstanding != Some(ticket) {
            warn!(%ticket, outstanding = ?self.outstanding, "Discarding stale response");
            return Err(SessionError::Stale {
                ticket,
                outstanding: self.outstanding,
            });
        }
        self.outstanding = None;
        Ok(())
    }

    fn accept(&mut self, ticket: Ticket, trigger: Trigger, expected: Phase) -> Result<(), SessionError> {
        if self.outstanding != Some(ticket) {
            return self.claim_ticket(ticket);
        }
        if self.phase != expected {
            return Err(self.reject(trigger));
        }
        self.claim_ticket(ticket)
    }

    fn reject(&self, trigger: Trigger) -> SessionError {
        warn!(%trigger, phase = %self.phase, "Trigger not allowed in this phase");
        ValidationError::WrongPhase {
            trigger,
            phase: self.phase,
        }
        .into()
    }

    fn check_opponent(&self, edge: Edge) -> Result<(), ProtocolError> {
        if self.owner(edge).is_some() {
            return Err(ProtocolError::AlreadyClaimed(edge));
        }
        Ok(())
    }

    fn check_pool(&self, pool: &BTreeSet<Edge>, incoming: Option<Edge>) -> Result<(), ProtocolError> {
        if pool.is_empty() {
            return Err(ProtocolError::EmptyPool);
        }
        match pool
            .iter()
            .find(|edge| self.owner(**edge).is_some() || Some(**edge) == incoming)
        {
            Some(edge) => Err(ProtocolError::PoolOverlapsClaims(*edge)),
            None => Ok(()),
        }
    }

    fn break_match(&mut self, err: ProtocolError) -> SessionError {
        error!(%err, "Arbiter broke its contract");
        self.interrupt(Recovery::ResetRequired);
        err.into()
    }

    fn interrupt(&mut self, recovery: Recovery) {
        if let Some(edge) = self.pending.take() {
            self.player_claims.remove(&edge);
            self.available.insert(edge);
            debug!(%edge, "Rolled back optimistic claim");
        }
        self.outstanding = None;
        self.phase = Phase::Interrupted(recovery);
        self.assert_invariants();
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.player_claims.is_disjoint(&self.opponent_claims),
            "an edge is claimed by both sides"
        );
        debug_assert!(
            self.available.is_disjoint(&self.player_claims)
                && self.available.is_disjoint(&self.opponent_claims),
            "the pool offers a claimed edge"
        );
        debug_assert_eq!(
            self.outcome.is_some(),
            self.phase == Phase::Ended,
            "outcome present outside the ended phase"
        );
        debug_assert_eq!(
            self.outstanding.is_some(),
            self.phase.is_waiting(),
            "outstanding ticket does not match phase"
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
