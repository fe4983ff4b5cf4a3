//! A [`GraphStore`] behind one lock, for hosts with more than one thread.
//!
//! Each closure passed to [`SharedGraphStore::write`] runs under the write
//! lock, and store operations never leave partial state behind, so readers
//! only ever see the state before or after a mutation.

use std::sync::Arc;

use parking_lot::RwLock;

use super::store::GraphStore;
use crate::model::Graph;

#[derive(Debug, Clone, Default)]
pub struct SharedGraphStore {
    inner: Arc<RwLock<GraphStore>>,
}

impl SharedGraphStore {
    #[must_use]
    pub fn new(store: GraphStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&GraphStore) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut GraphStore) -> R) -> R {
        f(&mut self.inner.write())
    }

    #[must_use]
    pub fn snapshot(&self) -> Graph {
        self.read(GraphStore::snapshot)
    }
}
