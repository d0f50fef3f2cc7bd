//! Drives one session against an arbiter.

use crate::arbiter::{Arbiter, ArbiterError, TransportError};
use derive_more::Display;
use strictly_sim_session::{
    Edge, FailureKind, ProtocolError, Session, SessionError, Ticket, ValidationError,
};
use tracing::{info, instrument, warn};

/// Failure of a client operation.
#[derive(Debug, Clone, Display)]
pub enum ClientError {
    /// Refused locally; nothing was sent.
    #[display("{}", _0)]
    Validation(ValidationError),

    /// The arbiter broke its contract; the match must be reset.
    #[display("{}", _0)]
    Protocol(ProtocolError),

    /// The arbiter could not be reached; the request may be retried.
    #[display("{}", _0)]
    Transport(TransportError),

    /// A response arrived for a request that is no longer outstanding.
    #[display("discarded stale response for {}", _0)]
    Stale(Ticket),
}

impl ClientError {
    /// Whether the same request may be issued again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Validation(err) => Some(err),
            ClientError::Protocol(err) => Some(err),
            ClientError::Transport(err) => Some(err),
            ClientError::Stale(_) => None,
        }
    }
}

impl From<SessionError> for ClientError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(err) => ClientError::Validation(err),
            SessionError::Protocol(err) => ClientError::Protocol(err),
            SessionError::Stale { ticket, .. } => ClientError::Stale(ticket),
        }
    }
}

impl From<ArbiterError> for ClientError {
    fn from(err: ArbiterError) -> Self {
        match err {
            ArbiterError::Transport(err) => ClientError::Transport(err),
            ArbiterError::Protocol(err) => ClientError::Protocol(err),
        }
    }
}

/// A match session wired to an arbiter.
///
/// Every operation takes `&mut self`, so calls to the arbiter for one match
/// are strictly one at a time.
#[derive(Debug)]
pub struct MatchClient<A> {
    arbiter: A,
    session: Session,
}

impl<A: Arbiter> MatchClient<A> {
    /// Creates a client with a fresh session.
    pub fn new(arbiter: A) -> Self {
        Self {
            arbiter,
            session: Session::new(),
        }
    }

    /// The session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The arbiter.
    pub fn arbiter(&self) -> &A {
        &self.arbiter
    }

    /// Starts a match at `difficulty` and installs the opening pool.
    ///
    /// Called once per match. After a transport failure it may be called
    /// again with the same difficulty; any other level is refused.
    #[instrument(skip(self), fields(match_id = %self.session.match_id()))]
    pub async fn start_match(&mut self, difficulty: u8) -> Result<&Session, ClientError> {
        let ticket = self.session.request_start(difficulty)?;
        let level = self.session.difficulty().unwrap_or_default();

        match self.arbiter.start(level).await {
            Ok(pool) => {
                self.session.on_start_response(ticket, pool)?;
                Ok(&self.session)
            }
            Err(err) => Err(self.fail(ticket, err)),
        }
    }

    /// Plays the player's selection and applies the arbiter's verdict.
    ///
    /// The opponent's reply is recorded before this returns. Moves outside
    /// the current pool are refused without contacting the arbiter.
    #[instrument(skip(self), fields(match_id = %self.session.match_id()))]
    pub async fn submit_move(&mut self, choice: Option<Edge>) -> Result<&Session, ClientError> {
        let (ticket, edge) = self.session.request_move(choice)?;

        match self.arbiter.respond(edge).await {
            Ok(reply) => {
                self.session.on_move_response(ticket, reply)?;
                if let Some(outcome) = self.session.outcome() {
                    info!(%outcome, "Match over");
                }
                Ok(&self.session)
            }
            Err(err) => Err(self.fail(ticket, err)),
        }
    }

    /// Discards the current match.
    #[instrument(skip(self), fields(match_id = %self.session.match_id()))]
    pub fn reset(&mut self) {
        self.session.reset();
    }

    fn fail(&mut self, ticket: Ticket, err: ArbiterError) -> ClientError {
        let kind = if err.is_retryable() {
            FailureKind::Transport
        } else {
            FailureKind::Protocol
        };
        if let Err(stale) = self.session.on_failure(ticket, kind) {
            warn!(%stale, "Failure arrived for a request no longer outstanding");
        }
        warn!(error = %err, phase = %self.session.phase(), "Arbiter call failed");
        err.into()
    }
}
