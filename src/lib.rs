//! Strictly SIM - client for the SIM line-drawing game
//!
//! Two sides take turns drawing edges between six points; whoever completes
//! a triangle of their own edges loses. A remote arbiter owns the rules and
//! plays the opponent. This crate is the client half: it keeps the match
//! session honest and talks to the arbiter.
//!
//! # Architecture
//!
//! - **Session**: phases, claim sets and response correlation, from
//!   [`strictly_sim_session`]
//! - **Arbiter**: the [`Arbiter`] seam and its HTTP implementation
//! - **MatchClient**: runs a session against an arbiter, one call at a time
//!
//! # Example
//!
//! ```no_run
//! use strictly_sim::{ClientConfig, HttpArbiter, MatchClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::load(None)?;
//! let mut client = MatchClient::new(HttpArbiter::from_config(&config)?);
//!
//! let session = client.start_match(3).await?;
//! let first = session.available().iter().next().copied();
//! client.submit_move(first).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod arbiter;
mod client_config;
mod match_client;

// Crate-level exports - Arbiter
pub use arbiter::{Arbiter, ArbiterError, HttpArbiter, TransportError};

// Crate-level exports - Configuration
pub use client_config::{ARBITER_URL_VAR, ClientConfig, ConfigError};

// Crate-level exports - Match orchestration
pub use match_client::{ClientError, MatchClient};

// Crate-level exports - Session types
pub use strictly_sim_session::{
    Difficulty, Edge, EdgeError, FailureKind, MatchId, MoveReply, Outcome, Phase, Point,
    ProtocolError, Recovery, Session, SessionError, Side, Ticket, ValidationError,
};
