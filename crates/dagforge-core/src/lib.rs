//! dagforge-core: a directed acyclic graph store that refuses to become cyclic.
//!
//! [`GraphStore`] owns the nodes and edges. Every mutation is checked before
//! it is committed; edge insertions consult the cycle oracle in
//! [`graph::cycles`]. Snapshots travel as JSON through [`codec`], and
//! [`project`] persists them under `.dagforge/` for the `dagf` CLI.
//!
//! # Conventions
//!
//! - **Errors**: engine operations return [`GraphError`]; every variant maps
//!   to a stable [`ErrorCode`]. Config loading uses `anyhow::Result`.
//! - **Logging**: `tracing` macros only. Installing a subscriber is the
//!   binary's job.

pub mod codec;
pub mod config;
pub mod error;
pub mod graph;
pub mod lock;
pub mod model;
pub mod project;

pub use error::{ErrorCode, GraphError, Missing};
pub use graph::{GraphStore, Placement, SharedGraphStore};
pub use model::{Edge, Graph, Node, NodeId, Position};
