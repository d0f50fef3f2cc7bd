//! Arbiter error types.

use derive_more::{Display, Error, From};
use strictly_sim_session::ProtocolError;
use tracing::instrument;

/// The request never produced a usable response.
#[derive(Debug, Clone, Display, Error)]
#[display("{} failed: {}", route, message)]
pub struct TransportError {
    /// Arbiter route that was called.
    pub route: &'static str,
    /// HTTP status, when the arbiter answered with a non-success one.
    pub status: Option<u16>,
    /// Error message.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error for `route`.
    #[instrument(skip(message))]
    pub fn new(route: &'static str, message: impl Into<String>) -> Self {
        Self {
            route,
            status: None,
            message: message.into(),
        }
    }

    /// Creates a transport error for a non-success status.
    #[instrument(skip(body))]
    pub fn status(route: &'static str, status: u16, body: &str) -> Self {
        Self {
            route,
            status: Some(status),
            message: format!("HTTP {}: {}", status, body.trim()),
        }
    }
}

/// Failure of a single arbiter call.
#[derive(Debug, Clone, Display, From)]
pub enum ArbiterError {
    /// Network failure, timeout or non-success status. Retryable.
    #[display("{}", _0)]
    Transport(TransportError),

    /// The arbiter answered with something unreadable. Not retryable.
    #[display("{}", _0)]
    Protocol(ProtocolError),
}

impl ArbiterError {
    /// Whether the same request may be issued again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ArbiterError::Transport(_))
    }
}

impl std::error::Error for ArbiterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArbiterError::Transport(err) => Some(err),
            ArbiterError::Protocol(err) => Some(err),
        }
    }
}
