//! Cycle detection over directed edge lists.
//!
//! # Overview
//!
//! The store calls [`introduces_cycle`] before committing any edge. The
//! question is asked on the *hypothetical* edge set (current edges plus the
//! candidate): the candidate closes a cycle iff a depth-first search from
//! `candidate.from` meets a node that is still on the active search path.
//!
//! Reaching an already-finished node through a second path is ordinary DAG
//! structure (a diamond), not a cycle, so the search tracks `visited` and
//! `on_stack` separately.
//!
//! # Design
//!
//! - **Explicit stack**: no recursion, so a 100k-node chain cannot overflow
//!   the thread stack. Back-edge semantics are the same as recursive DFS.
//! - **O(V+E)**: each node is pushed at most once per search and each edge
//!   is followed at most once.
//! - **Deterministic**: successors are explored in edge order and whole-graph
//!   scans start from nodes in order of first appearance, so reported cycle
//!   paths are stable for a given edge list.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::{Edge, NodeId};

// ---------------------------------------------------------------------------
// Cycle
// ---------------------------------------------------------------------------

/// A concrete cycle found in an edge list.
///
/// The path starts and ends at the same node, e.g. `["a", "b", "c", "a"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub path: Vec<NodeId>,
}

impl Cycle {
    /// Number of distinct nodes in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.len() == 1
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self_loop() {
            return write!(f, "self-loop on '{}'", self.path[0]);
        }
        let mut first = true;
        for id in &self.path {
            if !first {
                f.write_str(" → ")?;
            }
            first = false;
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Adjacency
// ---------------------------------------------------------------------------

struct Adjacency<'a> {
    /// Nodes in order of first appearance in the edge list.
    order: Vec<&'a NodeId>,
    successors: HashMap<&'a NodeId, Vec<&'a NodeId>>,
}

impl<'a> Adjacency<'a> {
    fn build(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let mut order = Vec::new();
        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut successors: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();

        for edge in edges {
            for id in [&edge.from, &edge.to] {
                if seen.insert(id) {
                    order.push(id);
                }
            }
            successors.entry(&edge.from).or_default().push(&edge.to);
        }

        Self { order, successors }
    }

    fn successors(&self, node: &NodeId) -> &[&'a NodeId] {
        self.successors
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Core detection
// ---------------------------------------------------------------------------

/// Decide whether adding `candidate` to `edges` would introduce a cycle.
///
/// Equivalent to "`candidate.to` already reaches `candidate.from`, or the
/// candidate is a self-loop". If the candidate duplicates an existing edge
/// the answer is the same as for the current graph (no new cycle).
///
/// # Complexity
///
/// O(V+E) over the nodes reachable from `candidate.from`.
#[must_use]
pub fn introduces_cycle(edges: &[Edge], candidate: &Edge) -> bool {
    if candidate.is_self_loop() {
        return true;
    }

    let adjacency = Adjacency::build(edges.iter().chain(std::iter::once(candidate)));
    let start = &candidate.from;

    let mut visited: HashSet<&NodeId> = HashSet::from([start]);
    let mut on_stack: HashSet<&NodeId> = HashSet::from([start]);
    // Each frame: (node, index of the next successor to explore).
    let mut stack: Vec<(&NodeId, usize)> = vec![(start, 0)];

    while let Some(frame) = stack.last_mut() {
        let node = frame.0;
        let index = frame.1;
        frame.1 += 1;

        match adjacency.successors(node).get(index) {
            Some(&next) => {
                if on_stack.contains(next) {
                    return true;
                }
                if visited.insert(next) {
                    on_stack.insert(next);
                    stack.push((next, 0));
                }
            }
            None => {
                on_stack.remove(node);
                stack.pop();
            }
        }
    }

    false
}

/// Find one cycle anywhere in `edges`, if there is one.
///
/// Used to validate imported snapshots, where edges arrive in bulk and were
/// never checked one at a time.
#[must_use]
pub fn find_cycle(edges: &[Edge]) -> Option<Cycle> {
    let adjacency = Adjacency::build(edges);
    let mut color: HashMap<&NodeId, Color> = HashMap::with_capacity(adjacency.order.len());

    for &root in &adjacency.order {
        if color.contains_key(root) {
            continue;
        }

        color.insert(root, Color::Gray);
        let mut stack: Vec<(&NodeId, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let index = frame.1;
            frame.1 += 1;

            let Some(&next) = adjacency.successors(node).get(index) else {
                color.insert(node, Color::Black);
                stack.pop();
                continue;
            };

            match color.get(next) {
                None => {
                    color.insert(next, Color::Gray);
                    stack.push((next, 0));
                }
                Some(Color::Gray) => {
                    // Back edge: `next` is on the stack, so the path from its
                    // frame to the top of the stack plus `next` is the cycle.
                    let start = stack
                        .iter()
                        .position(|(id, _)| *id == next)
                        .unwrap_or_default();
                    let mut path: Vec<NodeId> =
                        stack[start..].iter().map(|(id, _)| (*id).clone()).collect();
                    path.push(next.clone());
                    return Some(Cycle { path });
                }
                Some(Color::Black) => {}
            }
        }
    }

    None
}

/// Check whether `edges` contain any cycle at all.
///
/// # Complexity
///
/// O(V+E) in the worst case (no cycles).
#[must_use]
pub fn has_cycle(edges: &[Edge]) -> bool {
    find_cycle(edges).is_some()
}

/// DFS colors for whole-graph detection. Unvisited nodes are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Currently on the DFS stack.
    Gray,
    /// Fully processed.
    Black,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
