use serde::{Deserialize, Serialize};

use super::node::{Edge, Node, NodeId};

/// A complete, independent copy of graph state.
///
/// This is both the value handed to read-only consumers and the shape of the
/// import/export exchange document. Node order is insertion order; edge order
/// is the order edges were added.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id.as_str() == id)
    }

    /// Label for `id`, or the id itself when the node is absent.
    #[must_use]
    pub fn label_of<'a>(&'a self, id: &'a NodeId) -> &'a str {
        self.node(id.as_str()).map_or(id.as_str(), |node| node.label.as_str())
    }
}
