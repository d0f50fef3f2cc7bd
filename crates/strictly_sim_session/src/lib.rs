//! Match session state machine for SIM.
//!
//! SIM is played on six points. Two sides take turns claiming the edges
//! between them and whoever completes a triangle in their own colour loses.
//! This crate holds no rules engine: legality, triangle detection and the
//! opponent's replies come from a remote arbiter. What lives here is the
//! client-side bookkeeping that sits in front of that arbiter:
//!
//! - **Board**: [`Point`] and canonical [`Edge`] types
//! - **Phases**: the single [`Phase`] enum a UI derives its affordances from
//! - **Session**: [`Session`], a strictly validating proxy over what the
//!   arbiter has acknowledged, with [`Ticket`]-based response correlation
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use strictly_sim_session::{Edge, MoveReply, Phase, Session};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new();
//! let ticket = session.request_start(3)?;
//! let pool: BTreeSet<Edge> = Edge::all().collect();
//! session.on_start_response(ticket, pool)?;
//! assert_eq!(session.phase(), Phase::Selecting);
//!
//! let (ticket, _) = session.request_move(Some(Edge::from_indices(0, 1)?))?;
//! let available: BTreeSet<Edge> = Edge::all().skip(2).collect();
//! session.on_move_response(
//!     ticket,
//!     MoveReply::Continue { opponent: Edge::from_indices(0, 2)?, available },
//! )?;
//! assert_eq!(session.opponent_claims().len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod difficulty;
mod error;
mod phases;
mod session;

pub use board::{Edge, Point};
pub use difficulty::Difficulty;
pub use error::{EdgeError, ProtocolError, SessionError, Trigger, ValidationError};
pub use phases::{Outcome, Phase, Recovery, Side};
pub use session::{FailureKind, MatchId, MoveReply, Session, Ticket};
