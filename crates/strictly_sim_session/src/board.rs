//! Points and edges of the SIM board.

use crate::error::EdgeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// One of the six fixed points of the board (`0..=5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Point(u8);

impl Point {
    /// Number of points on the board.
    pub const COUNT: u8 = 6;

    /// Display coordinates of each point, indexed by point.
    const LAYOUT: [[f32; 3]; Self::COUNT as usize] = [
        [-7.0, -1.5, 0.0],
        [-3.5, 1.0, 0.0],
        [1.0, 1.0, 0.0],
        [4.0, -1.5, 0.0],
        [1.0, -3.5, 0.0],
        [-3.5, -3.5, 0.0],
    ];

    /// Creates a point from its index, if in range.
    pub fn new(index: u8) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index))
    }

    /// Returns the point's index.
    pub fn index(self) -> u8 {
        self.0
    }

    /// Iterates over all six points in index order.
    pub fn all() -> impl Iterator<Item = Point> {
        (0..Self::COUNT).map(Point)
    }

    /// Display position of the point on the board plane.
    ///
    /// Pure configuration data; never consulted by gameplay.
    pub fn position(self) -> [f32; 3] {
        Self::LAYOUT[self.0 as usize]
    }
}

impl TryFrom<u8> for Point {
    type Error = EdgeError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Point::new(index).ok_or(EdgeError::OutOfRange(index))
    }
}

impl From<Point> for u8 {
    fn from(point: Point) -> u8 {
        point.0
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unordered pair of distinct points.
///
/// Always stored with `a < b`, so `Edge::new(p, q) == Edge::new(q, p)` and
/// set membership never depends on the order the pair was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 2]", into = "[u8; 2]")]
pub struct Edge {
    a: Point,
    b: Point,
}

impl Edge {
    /// Number of distinct edges on the board, C(6, 2).
    pub const COUNT: usize = 15;

    /// Creates the canonical edge joining two distinct points.
    pub fn new(p: Point, q: Point) -> Result<Self, EdgeError> {
        match p.cmp(&q) {
            std::cmp::Ordering::Less => Ok(Self { a: p, b: q }),
            std::cmp::Ordering::Greater => Ok(Self { a: q, b: p }),
            std::cmp::Ordering::Equal => Err(EdgeError::Loop(p.index())),
        }
    }

    /// Creates an edge from two point indices.
    pub fn from_indices(p: u8, q: u8) -> Result<Self, EdgeError> {
        Self::new(Point::try_from(p)?, Point::try_from(q)?)
    }

    /// The lower endpoint.
    pub fn a(self) -> Point {
        self.a
    }

    /// The higher endpoint.
    pub fn b(self) -> Point {
        self.b
    }

    /// Both endpoints, lower first.
    pub fn points(self) -> (Point, Point) {
        (self.a, self.b)
    }

    /// Whether `point` is one of the endpoints.
    pub fn touches(self, point: Point) -> bool {
        self.a == point || self.b == point
    }

    /// Iterates over all fifteen edges in canonical order.
    pub fn all() -> impl Iterator<Item = Edge> {
        Point::all().flat_map(|a| {
            Point::all()
                .filter(move |b| a < *b)
                .map(move |b| Edge { a, b })
        })
    }
}

impl TryFrom<[u8; 2]> for Edge {
    type Error = EdgeError;

    fn try_from([p, q]: [u8; 2]) -> Result<Self, Self::Error> {
        Edge::from_indices(p, q)
    }
}

impl From<Edge> for [u8; 2] {
    fn from(edge: Edge) -> [u8; 2] {
        [edge.a.index(), edge.b.index()]
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

impl FromStr for Edge {
    type Err = EdgeError;

    /// Parses `"0-1"`, `"0,1"`, `"0 1"` or `"[1, 0]"`.
    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparsable = || EdgeError::Unparsable(s.to_string());
        let trimmed = s.trim().trim_start_matches(['[', '(']).trim_end_matches([']', ')']);
        let mut parts = trimmed
            .split(|c: char| c == ',' || c == '-' || c.is_whitespace())
            .filter(|part| !part.is_empty());

        let p = parts.next().ok_or_else(unparsable)?;
        let q = parts.next().ok_or_else(unparsable)?;
        if parts.next().is_some() {
            return Err(unparsable());
        }

        let p: u8 = p.parse().map_err(|_| unparsable())?;
        let q: u8 = q.parse().map_err(|_| unparsable())?;
        Edge::from_indices(p, q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn there_are_fifteen_distinct_edges() {
        let edges: BTreeSet<Edge> = Edge::all().collect();
        assert_eq!(edges.len(), Edge::COUNT);
        assert!(edges.iter().all(|e| e.a() < e.b()));
    }

    #[test]
    fn edge_order_is_canonical() {
        let forward = Edge::from_indices(4, 1).unwrap();
        let backward = Edge::from_indices(1, 4).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.points(), (Point::new(1).unwrap(), Point::new(4).unwrap()));
    }

    #[test]
    fn loops_and_out_of_range_points_are_rejected() {
        assert_eq!(Edge::from_indices(2, 2), Err(EdgeError::Loop(2)));
        assert_eq!(Edge::from_indices(0, 6), Err(EdgeError::OutOfRange(6)));
    }

    #[test]
    fn parses_common_spellings() {
        let expected = Edge::from_indices(0, 3).unwrap();
        for input in ["0-3", "3,0", " 0 3 ", "[3, 0]", "(0,3)"] {
            assert_eq!(input.parse::<Edge>().unwrap(), expected, "input {input:?}");
        }
        assert!("0".parse::<Edge>().is_err());
        assert!("0,1,2".parse::<Edge>().is_err());
        assert!("a,b".parse::<Edge>().is_err());
    }

    #[test]
    fn serializes_as_point_pair() {
        let edge = Edge::from_indices(5, 2).unwrap();
        assert_eq!(serde_json::to_string(&edge).unwrap(), "[2,5]");
    }
}
