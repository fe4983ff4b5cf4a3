//! The authoritative owner of a graph's nodes and edges.
//!
//! Every mutation either commits completely or returns a [`GraphError`] with
//! the store untouched. Validation always happens before the first write, so
//! no caller can observe a half-applied operation.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use tracing::{debug, instrument, warn};

use super::cycles::introduces_cycle;
use super::placement::Placement;
use crate::codec;
use crate::error::{GraphError, Missing};
use crate::model::{Edge, Graph, Node, NodeId, Position};

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Insertion-ordered nodes.
    nodes: Vec<Node>,
    /// id -> index into `nodes`.
    index: HashMap<NodeId, usize>,
    /// Edges in the order they were added.
    edges: Vec<Edge>,
    edge_set: HashSet<Edge>,
    /// Next candidate sequence for allocated ids.
    next_seq: u64,
    placement: Placement,
}

impl GraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_placement(placement: Placement) -> Self {
        Self {
            placement,
            ..Self::default()
        }
    }

    /// Build a store from a snapshot, validating it first.
    pub fn from_graph(graph: Graph, placement: Placement) -> Result<Self, GraphError> {
        let mut store = Self::with_placement(placement);
        store.replace(graph)?;
        Ok(store)
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    /// Add a node with the trimmed `label` and return its fresh id.
    pub fn add_node(&mut self, label: &str) -> Result<NodeId, GraphError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(GraphError::EmptyLabel);
        }

        let id = self.allocate_id();
        let position = self.placement.slot(self.nodes.len());
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node {
            id: id.clone(),
            label: label.to_string(),
            position,
        });

        debug!(id = %id, label, "node added");
        Ok(id)
    }

    /// Remove a node and every edge that touches it.
    pub fn delete_node(&mut self, id: &str) -> Result<(), GraphError> {
        let Some(&position) = self.index.get(id) else {
            return Err(not_found_node(id));
        };

        let removed = self.nodes.remove(position);
        self.index.remove(id);
        for (offset, node) in self.nodes[position..].iter().enumerate() {
            self.index.insert(node.id.clone(), position + offset);
        }

        let before = self.edges.len();
        self.edges.retain(|edge| edge.from != removed.id && edge.to != removed.id);
        self.edge_set
            .retain(|edge| edge.from != removed.id && edge.to != removed.id);

        debug!(
            id = %removed.id,
            edges_removed = before - self.edges.len(),
            "node deleted"
        );
        Ok(())
    }

    /// Move a node. Never interacts with acyclicity.
    pub fn reposition_node(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        if !position.is_finite() {
            return Err(GraphError::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }
        node.position = position;
        debug!(id, x = position.x, y = position.y, "node repositioned");
        Ok(())
    }

    /// Replace a node's label with the trimmed `label`.
    pub fn relabel_node(&mut self, id: &str, label: &str) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        let label = label.trim();
        if label.is_empty() {
            return Err(GraphError::EmptyLabel);
        }
        node.label = label.to_string();
        debug!(id, label, "node relabeled");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    /// Add the directed edge `from -> to`.
    ///
    /// Checks run in a fixed order so the reported reason is deterministic:
    /// unknown endpoint, self-loop, duplicate, then cycle.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        for endpoint in [from, to] {
            if !self.index.contains_key(endpoint) {
                return Err(GraphError::UnknownNode {
                    id: NodeId::from(endpoint),
                });
            }
        }

        let candidate = Edge::new(from, to);
        if candidate.is_self_loop() {
            return Err(GraphError::SelfLoop { id: candidate.from });
        }
        if self.edge_set.contains(&candidate) {
            return Err(GraphError::DuplicateEdge {
                from: candidate.from,
                to: candidate.to,
            });
        }
        if introduces_cycle(&self.edges, &candidate) {
            debug!(edge = %candidate, "edge rejected: would create a cycle");
            return Err(GraphError::WouldCreateCycle {
                from: candidate.from,
                to: candidate.to,
            });
        }

        debug!(edge = %candidate, "edge added");
        self.edge_set.insert(candidate.clone());
        self.edges.push(candidate);
        Ok(())
    }

    /// Remove the edge `from -> to`. No cascading effects.
    pub fn delete_edge(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        let target = Edge::new(from, to);
        if !self.edge_set.remove(&target) {
            return Err(GraphError::NotFound(Missing::Edge {
                from: target.from,
                to: target.to,
            }));
        }
        self.edges.retain(|edge| *edge != target);
        debug!(edge = %target, "edge deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Whole-graph operations
    // -----------------------------------------------------------------------

    /// Reset to the empty graph. Placement and the id counter are kept, so ids
    /// handed out before the clear are never reissued by this store.
    pub fn clear(&mut self) {
        let nodes = self.nodes.len();
        let edges = self.edges.len();
        let next_seq = self.next_seq;
        *self = Self::with_placement(self.placement);
        self.next_seq = next_seq;
        debug!(nodes, edges, "graph cleared");
    }

    /// Adopt `graph` wholesale, or leave the store unchanged.
    ///
    /// Edges are not validated one at a time; instead the whole snapshot must
    /// pass [`codec::validate`] before anything is committed. The id counter
    /// only moves forward: it ends past both its old value and every imported
    /// `n<k>` id. Labels are stored trimmed, as [`GraphStore::add_node`]
    /// stores them.
    pub fn replace(&mut self, mut graph: Graph) -> Result<(), GraphError> {
        if let Err(defect) = codec::validate(&graph) {
            warn!(%defect, "snapshot rejected");
            return Err(GraphError::malformed(defect));
        }

        for node in &mut graph.nodes {
            let trimmed = node.label.trim();
            if trimmed.len() != node.label.len() {
                node.label = trimmed.to_string();
            }
        }

        let index: HashMap<NodeId, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id.clone(), position))
            .collect();
        let edge_set: HashSet<Edge> = graph.edges.iter().cloned().collect();
        let next_seq = graph
            .nodes
            .iter()
            .filter_map(|node| node.id.sequence())
            .max()
            .map_or(0, |seq| seq.saturating_add(1))
            .max(self.next_seq);

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "graph replaced"
        );
        self.nodes = graph.nodes;
        self.edges = graph.edges;
        self.index = index;
        self.edge_set = edge_set;
        self.next_seq = next_seq;
        Ok(())
    }

    /// Decode a snapshot document and adopt it atomically.
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn import(&mut self, text: &str) -> Result<(), GraphError> {
        let graph = codec::decode(text)?;
        self.replace(graph)
    }

    /// Independent copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Graph {
        Graph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.edge_set.contains(&Edge::new(from, to))
    }

    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Sequence the allocator will try next. Persist it alongside the
    /// snapshot so a reloaded store keeps handing out unused ids.
    #[must_use]
    pub const fn next_sequence(&self) -> u64 {
        self.next_seq
    }

    /// Move the allocator forward to at least `seq`. Never moves it back.
    pub fn advance_sequence(&mut self, seq: u64) {
        self.next_seq = self.next_seq.max(seq);
    }

    /// Direct successors of `id`, in edge order.
    pub fn successors(&self, id: &str) -> Result<Vec<&NodeId>, GraphError> {
        self.require(id)?;
        Ok(self
            .edges
            .iter()
            .filter(|edge| edge.from.as_str() == id)
            .map(|edge| &edge.to)
            .collect())
    }

    /// Direct predecessors of `id`, in edge order.
    pub fn predecessors(&self, id: &str) -> Result<Vec<&NodeId>, GraphError> {
        self.require(id)?;
        Ok(self
            .edges
            .iter()
            .filter(|edge| edge.to.as_str() == id)
            .map(|edge| &edge.from)
            .collect())
    }

    /// Nodes without incoming edges, in insertion order.
    #[must_use]
    pub fn roots(&self) -> Vec<&Node> {
        let targets: HashSet<&NodeId> = self.edges.iter().map(|edge| &edge.to).collect();
        self.nodes
            .iter()
            .filter(|node| !targets.contains(&node.id))
            .collect()
    }

    /// Nodes without outgoing edges, in insertion order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Node> {
        let sources: HashSet<&NodeId> = self.edges.iter().map(|edge| &edge.from).collect();
        self.nodes
            .iter()
            .filter(|node| !sources.contains(&node.id))
            .collect()
    }

    /// Every node ordered so that each edge points forward.
    pub fn topological_order(&self) -> Result<Vec<&Node>, GraphError> {
        let mut graph: DiGraph<usize, ()> =
            DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let handles: Vec<_> = (0..self.nodes.len()).map(|i| graph.add_node(i)).collect();
        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (self.index.get(&edge.from), self.index.get(&edge.to)) {
                graph.add_edge(handles[from], handles[to], ());
            }
        }

        let order = toposort(&graph, None).map_err(|cycle| {
            let id = &self.nodes[graph[cycle.node_id()]].id;
            GraphError::malformed(format!("cycle through node '{id}'"))
        })?;
        Ok(order.into_iter().map(|handle| &self.nodes[graph[handle]]).collect())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn allocate_id(&mut self) -> NodeId {
        loop {
            self.next_seq = self.next_seq.max(1);
            let id = NodeId::allocated(self.next_seq);
            self.next_seq += 1;
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    fn require(&self, id: &str) -> Result<(), GraphError> {
        if self.index.contains_key(id) {
            Ok(())
        } else {
            Err(not_found_node(id))
        }
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node, GraphError> {
        match self.index.get(id) {
            Some(&position) => Ok(&mut self.nodes[position]),
            None => Err(not_found_node(id)),
        }
    }
}

fn not_found_node(id: &str) -> GraphError {
    GraphError::NotFound(Missing::Node(NodeId::from(id)))
}
