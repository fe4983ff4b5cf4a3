//! JSON exchange format for whole-graph snapshots.
//!
//! ```json
//! {
//!   "nodes": [ { "id": "n1", "label": "A", "position": { "x": 0.0, "y": 0.0 } } ],
//!   "edges": [ { "from": "n1", "to": "n2" } ]
//! }
//! ```
//!
//! [`decode`] only checks shape. Whether a decoded [`Graph`] is a legal DAG is
//! answered by [`validate`], which [`GraphStore::replace`] runs before it
//! commits anything.
//!
//! [`GraphStore::replace`]: crate::graph::GraphStore::replace

use std::collections::HashSet;

use thiserror::Error;

use crate::error::GraphError;
use crate::graph::cycles::{Cycle, find_cycle};
use crate::model::{Graph, NodeId};

/// Compact JSON, node and edge order preserved.
pub fn encode(graph: &Graph) -> serde_json::Result<String> {
    serde_json::to_string(graph)
}

/// Indented JSON for files people read and edit by hand.
pub fn encode_pretty(graph: &Graph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(graph)
}

/// Parse a snapshot document. Unknown fields are ignored.
pub fn decode(text: &str) -> Result<Graph, GraphError> {
    serde_json::from_str(text).map_err(GraphError::malformed)
}

/// The first structural problem found in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotDefect {
    #[error("node at index {index} has an empty id")]
    EmptyNodeId { index: usize },

    #[error("node id '{id}' appears more than once")]
    DuplicateNodeId { id: NodeId },

    #[error("node '{id}' has an empty label")]
    EmptyLabel { id: NodeId },

    #[error("node '{id}' has a non-finite position")]
    NonFinitePosition { id: NodeId },

    #[error("edge {from} -> {to} references unknown node '{missing}'")]
    DanglingEdge {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    #[error("edge {id} -> {id} is a self-loop")]
    SelfLoop { id: NodeId },

    #[error("edge {from} -> {to} appears more than once")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("graph contains a cycle: {0}")]
    Cycle(Cycle),
}

/// Check every store invariant against `graph`.
///
/// Nodes are checked first, then edges one at a time, then acyclicity over
/// the whole edge list.
pub fn validate(graph: &Graph) -> Result<(), SnapshotDefect> {
    let mut ids: HashSet<&NodeId> = HashSet::with_capacity(graph.nodes.len());
    for (index, node) in graph.nodes.iter().enumerate() {
        if node.id.as_str().is_empty() {
            return Err(SnapshotDefect::EmptyNodeId { index });
        }
        if !ids.insert(&node.id) {
            return Err(SnapshotDefect::DuplicateNodeId {
                id: node.id.clone(),
            });
        }
        if node.label.trim().is_empty() {
            return Err(SnapshotDefect::EmptyLabel {
                id: node.id.clone(),
            });
        }
        if !node.position.is_finite() {
            return Err(SnapshotDefect::NonFinitePosition {
                id: node.id.clone(),
            });
        }
    }

    let mut seen = HashSet::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        if let Some(missing) = [&edge.from, &edge.to].into_iter().find(|id| !ids.contains(id)) {
            return Err(SnapshotDefect::DanglingEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
                missing: missing.clone(),
            });
        }
        if edge.is_self_loop() {
            return Err(SnapshotDefect::SelfLoop {
                id: edge.from.clone(),
            });
        }
        if !seen.insert(edge) {
            return Err(SnapshotDefect::DuplicateEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
            });
        }
    }

    match find_cycle(&graph.edges) {
        Some(cycle) => Err(SnapshotDefect::Cycle(cycle)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Node, Position};

    fn node(id: &str, label: &str) -> Node {
        Node {
            id: NodeId::from(id),
            label: label.to_string(),
            position: Position::new(0.0, 0.0),
        }
    }

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
        Graph {
            nodes: nodes.iter().map(|id| node(id, id)).collect(),
            edges: edges.iter().map(|&(a, b)| Edge::new(a, b)).collect(),
        }
    }

    #[test]
    fn three_nodes_two_edges_survive_the_trip() {
        let original = graph(&["n1", "n2", "n3"], &[("n1", "n2"), ("n2", "n3")]);
        let text = encode(&original).unwrap();
        assert_eq!(decode(&text).unwrap(), original);

        let pretty = encode_pretty(&original).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(decode(&pretty).unwrap(), original);
    }

    #[test]
    fn encode_uses_the_exchange_field_names() {
        let text = encode(&graph(&["n1", "n2"], &[("n1", "n2")])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["nodes"][0]["id"], "n1");
        assert_eq!(value["nodes"][0]["position"]["x"], 0.0);
        assert_eq!(value["edges"][0]["from"], "n1");
        assert_eq!(value["edges"][0]["to"], "n2");
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let text = r#"{
            "version": 3,
            "nodes": [{"id": "a", "label": "A", "position": {"x": 1, "y": 2}, "color": "red"}],
            "edges": []
        }"#;
        let decoded = decode(text).unwrap();
        assert_eq!(decoded.nodes[0].position, Position::new(1.0, 2.0));
    }

    #[test]
    fn decode_reports_shape_errors_as_malformed() {
        for text in [
            "",
            "not json",
            "[]",
            r#"{"nodes": []}"#,
            r#"{"nodes": [{"id": "a", "label": "A"}], "edges": []}"#,
            r#"{"nodes": [], "edges": [{"from": "a"}]}"#,
            r#"{"nodes": [{"id": 1, "label": "A", "position": {"x": 0, "y": 0}}], "edges": []}"#,
        ] {
            assert!(
                matches!(decode(text), Err(GraphError::Malformed { .. })),
                "expected malformed for {text:?}"
            );
        }
    }

    #[test]
    fn validate_accepts_a_dag() {
        let diamond = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        assert_eq!(validate(&diamond), Ok(()));
        assert_eq!(validate(&Graph::default()), Ok(()));
    }

    #[test]
    fn validate_rejects_node_defects() {
        let mut dup = graph(&["a", "a"], &[]);
        assert!(matches!(validate(&dup), Err(SnapshotDefect::DuplicateNodeId { .. })));

        dup.nodes[1].id = NodeId::from("");
        assert_eq!(validate(&dup), Err(SnapshotDefect::EmptyNodeId { index: 1 }));

        let mut blank = graph(&["a"], &[]);
        blank.nodes[0].label = "  ".to_string();
        assert!(matches!(validate(&blank), Err(SnapshotDefect::EmptyLabel { .. })));

        let mut far = graph(&["a"], &[]);
        far.nodes[0].position = Position::new(f64::INFINITY, 0.0);
        assert!(matches!(validate(&far), Err(SnapshotDefect::NonFinitePosition { .. })));
    }

    #[test]
    fn validate_rejects_edge_defects() {
        let dangling = graph(&["a"], &[("a", "ghost")]);
        assert_eq!(
            validate(&dangling),
            Err(SnapshotDefect::DanglingEdge {
                from: NodeId::from("a"),
                to: NodeId::from("ghost"),
                missing: NodeId::from("ghost"),
            })
        );

        let looped = graph(&["a"], &[("a", "a")]);
        assert!(matches!(validate(&looped), Err(SnapshotDefect::SelfLoop { .. })));

        let doubled = graph(&["a", "b"], &[("a", "b"), ("a", "b")]);
        assert!(matches!(validate(&doubled), Err(SnapshotDefect::DuplicateEdge { .. })));
    }

    #[test]
    fn validate_reports_the_cycle_path() {
        let cyclic = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let defect = validate(&cyclic).unwrap_err();
        assert_eq!(defect.to_string(), "graph contains a cycle: a → b → c → a");
    }
}
