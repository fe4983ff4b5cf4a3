use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt, str::FromStr};

/// Opaque node identifier.
///
/// Ids allocated by the store look like `n7`, but ids read from a snapshot
/// may be any non-empty string; nothing parses their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Prefix used for store-allocated ids.
    pub const PREFIX: char = 'n';

    pub(crate) fn allocated(seq: u64) -> Self {
        Self(format!("{}{seq}", Self::PREFIX))
    }

    /// Sequence number if this id has the allocator's `n<digits>` shape.
    pub(crate) fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(Self::PREFIX)?.parse().ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for NodeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Free-form 2D coordinate. Owned by its node and never computed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A labeled vertex of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub position: Position,
}

/// A directed edge `from -> to`. Carries no payload beyond its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    #[must_use]
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_ids_round_trip_their_sequence() {
        let id = NodeId::allocated(42);
        assert_eq!(id.as_str(), "n42");
        assert_eq!(id.sequence(), Some(42));
    }

    #[test]
    fn foreign_ids_have_no_sequence() {
        assert_eq!(NodeId::from("1697040000123").sequence(), None);
        assert_eq!(NodeId::from("node-a").sequence(), None);
        assert_eq!(NodeId::from("n").sequence(), None);
    }

    #[test]
    fn node_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&NodeId::from("n3")).unwrap();
        assert_eq!(json, "\"n3\"");
    }

    #[test]
    fn position_finiteness() {
        assert!(Position::new(1.5, -2.0).is_finite());
        assert!(!Position::new(f64::NAN, 0.0).is_finite());
        assert!(!Position::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn edge_display_and_self_loop() {
        let edge = Edge::new("a", "b");
        assert_eq!(edge.to_string(), "a -> b");
        assert!(!edge.is_self_loop());
        assert!(Edge::new("a", "a").is_self_loop());
    }
}
