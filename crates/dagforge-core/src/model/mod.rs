//! Plain data types shared by the store, the cycle oracle and the codec.

pub mod graph;
pub mod node;

pub use graph::Graph;
pub use node::{Edge, Node, NodeId, Position};
