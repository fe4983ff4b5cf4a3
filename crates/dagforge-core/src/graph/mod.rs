//! The DAG invariant engine.
//!
//! ## Submodules
//!
//! - [`store`] — [`GraphStore`], the sole owner of nodes and edges. Every
//!   mutation is validated before it is committed.
//! - [`cycles`] — the cycle oracle consulted before each edge insertion, plus
//!   whole-graph checks used when a snapshot is imported.
//! - [`placement`] — grid slots for newly created nodes.
//! - [`shared`] — [`SharedGraphStore`], a lock-guarded handle for
//!   multi-threaded hosts.

pub mod cycles;
pub mod placement;
pub mod shared;
pub mod store;

pub use cycles::{Cycle, find_cycle, has_cycle, introduces_cycle};
pub use placement::Placement;
pub use shared::SharedGraphStore;
pub use store::GraphStore;
