//! The remote arbiter: contract, errors and the HTTP implementation.

mod error;
mod http;
mod wire;

pub use error::{ArbiterError, TransportError};
pub use http::HttpArbiter;

use std::collections::BTreeSet;
use strictly_sim_session::{Difficulty, Edge, MoveReply};

/// The service that owns the rules of a match.
///
/// It decides which edges are legal, spots triangles and plays the
/// opponent. Calls take `&mut self`: one arbiter serves one match and never
/// sees two requests at once.
#[async_trait::async_trait]
pub trait Arbiter: Send {
    /// Starts a fresh match and returns the opening pool.
    async fn start(&mut self, difficulty: Difficulty) -> Result<BTreeSet<Edge>, ArbiterError>;

    /// Plays the player's edge and returns the verdict.
    async fn respond(&mut self, edge: Edge) -> Result<MoveReply, ArbiterError>;
}
