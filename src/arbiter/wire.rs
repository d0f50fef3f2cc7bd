//! JSON bodies exchanged with the arbiter.
//!
//! Edges travel as `[a, b]` arrays in responses and as an `"a,b"` string in
//! the move request. Arrays are canonicalised on the way in, so `[3, 1]`
//! and `[1, 3]` are the same edge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strictly_sim_session::{Difficulty, Edge, MoveReply, ProtocolError, Side};

/// Body of `POST /start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StartRequest {
    pub difficulty: Difficulty,
}

/// Response of `POST /start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StartResponse {
    pub available: Vec<Edge>,
}

impl StartResponse {
    pub fn into_pool(self) -> BTreeSet<Edge> {
        self.available.into_iter().collect()
    }
}

/// Body of `POST /respond`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RespondRequest {
    pub response: String,
}

impl RespondRequest {
    pub fn new(edge: Edge) -> Self {
        Self {
            response: format!("{},{}", edge.a(), edge.b()),
        }
    }
}

/// Who the arbiter says lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Loser {
    #[serde(rename = "player")]
    Player,
    #[serde(rename = "AI")]
    Ai,
}

impl From<Loser> for Side {
    fn from(loser: Loser) -> Side {
        match loser {
            Loser::Player => Side::Player,
            Loser::Ai => Side::Opponent,
        }
    }
}

/// Response of `POST /respond`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RespondResponse {
    #[serde(default)]
    pub available: Option<Vec<Edge>>,
    #[serde(default, rename = "move")]
    pub opponent_move: Option<Edge>,
    #[serde(default)]
    pub lost: Option<Loser>,
}

impl RespondResponse {
    /// Reads the verdict. A continuing match must name the opponent's move
    /// and the new pool.
    pub fn into_reply(self) -> Result<MoveReply, ProtocolError> {
        match self.lost {
            Some(loser) => Ok(MoveReply::Lost {
                loser: loser.into(),
                opponent: self.opponent_move,
            }),
            None => {
                let opponent = self.opponent_move.ok_or_else(|| {
                    ProtocolError::Malformed("continuing response without `move`".to_string())
                })?;
                let available = self.available.ok_or_else(|| {
                    ProtocolError::Malformed("continuing response without `available`".to_string())
                })?;
                Ok(MoveReply::Continue {
                    opponent,
                    available: available.into_iter().collect(),
                })
            }
        }
    }
}

/// Response of `GET /dummy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PingResponse {
    pub result: i64,
}
