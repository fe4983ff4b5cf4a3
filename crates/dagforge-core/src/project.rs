//! On-disk project layout and snapshot persistence.
//!
//! ```text
//! <root>/.dagforge/
//!   graph.json     current snapshot
//!   graph.lock     advisory lock file
//!   config.toml    project config
//! ```
//!
//! `graph.json` is the exchange document plus a `next_id` field holding the
//! id allocator's counter, so ids freed by a delete or a clear stay retired
//! across invocations. Other readers ignore the extra field.
//!
//! Saves write `graph.json.tmp` next to the snapshot and rename it into place,
//! so a concurrent reader sees either the old file or the new one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{self, ProjectConfig};
use crate::error::{ErrorCode, GraphError};
use crate::graph::{GraphStore, Placement};
use crate::lock::{LockError, ProjectLock, ProjectReadLock};
use crate::model::Graph;

pub const DAGFORGE_DIR: &str = ".dagforge";
pub const GRAPH_FILE: &str = "graph.json";
pub const LOCK_FILE: &str = "graph.lock";

/// How long a command waits for another `dagf` process to finish.
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const CONFIG_TEMPLATE: &str = "[layout]\n\
    origin_x = 40.0\n\
    origin_y = 40.0\n\
    spacing = 120.0\n\
    columns = 6\n\
    \n\
    [export]\n\
    pretty = true\n";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no .dagforge/ project found at or above {}", root.display())]
    NotInitialized { root: PathBuf },

    #[error("{} already exists", dir.display())]
    AlreadyInitialized { dir: PathBuf },

    #[error("could not lock the project")]
    Lock(#[from] LockError),

    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{} is not a valid snapshot", path.display())]
    Snapshot { path: PathBuf, source: GraphError },

    #[error("failed to encode snapshot")]
    Encode(#[from] serde_json::Error),
}

impl ProjectError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized { .. } => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::Read { .. } | Self::Write { .. } => ErrorCode::SnapshotWriteFailed,
            Self::Lock(err) => err.code(),
            Self::Snapshot { .. } => ErrorCode::MalformedSnapshot,
            Self::Encode(_) => ErrorCode::InternalUnexpected,
        }
    }
}

/// Contents of `graph.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredGraph {
    #[serde(flatten)]
    graph: Graph,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_id: Option<u64>,
}

/// A directory containing `.dagforge/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Create `.dagforge/` under `root` with an empty graph and a default
    /// config. With `force`, an existing snapshot is reset to empty and the
    /// existing config is left alone.
    pub fn init(root: &Path, force: bool) -> Result<Self, ProjectError> {
        let project = Self {
            root: root.to_path_buf(),
        };
        let dir = project.dir();
        if dir.exists() && !force {
            return Err(ProjectError::AlreadyInitialized { dir });
        }

        fs::create_dir_all(&dir).map_err(|source| ProjectError::Write {
            path: dir.clone(),
            source,
        })?;

        let _lock = project.lock()?;
        let config_path = project.config_path();
        if !config_path.exists() {
            fs::write(&config_path, CONFIG_TEMPLATE).map_err(|source| ProjectError::Write {
                path: config_path.clone(),
                source,
            })?;
        }
        project.write_snapshot(&StoredGraph::default())?;

        info!(root = %project.root.display(), "project initialized");
        Ok(project)
    }

    /// Find the nearest ancestor of `start` (inclusive) that holds a project.
    pub fn discover(start: &Path) -> Result<Self, ProjectError> {
        start
            .ancestors()
            .find(|dir| dir.join(DAGFORGE_DIR).is_dir())
            .map(|root| Self {
                root: root.to_path_buf(),
            })
            .ok_or_else(|| ProjectError::NotInitialized {
                root: start.to_path_buf(),
            })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn dir(&self) -> PathBuf {
        self.root.join(DAGFORGE_DIR)
    }

    #[must_use]
    pub fn graph_path(&self) -> PathBuf {
        self.dir().join(GRAPH_FILE)
    }

    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.dir().join(LOCK_FILE)
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        config::project_config_path(&self.root)
    }

    pub fn config(&self) -> anyhow::Result<ProjectConfig> {
        config::load_project_config(&self.root)
    }

    pub fn lock(&self) -> Result<ProjectLock, ProjectError> {
        Ok(ProjectLock::acquire(&self.lock_path(), LOCK_TIMEOUT)?)
    }

    pub fn read_lock(&self) -> Result<ProjectReadLock, ProjectError> {
        Ok(ProjectReadLock::acquire(&self.lock_path(), LOCK_TIMEOUT)?)
    }

    /// Load the snapshot into a fresh store. A missing snapshot file is an
    /// empty graph.
    pub fn load(&self, placement: Placement) -> Result<GraphStore, ProjectError> {
        let path = self.graph_path();
        let mut store = GraphStore::with_placement(placement);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(store),
            Err(source) => return Err(ProjectError::Read { path, source }),
        };

        let stored: StoredGraph = match serde_json::from_str(&text) {
            Ok(stored) => stored,
            Err(err) => {
                return Err(ProjectError::Snapshot {
                    path,
                    source: GraphError::malformed(err),
                });
            }
        };
        store
            .replace(stored.graph)
            .map_err(|source| ProjectError::Snapshot { path, source })?;
        if let Some(next_id) = stored.next_id {
            store.advance_sequence(next_id);
        }
        debug!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            "snapshot loaded"
        );
        Ok(store)
    }

    /// Persist the store's current state.
    pub fn save(&self, store: &GraphStore) -> Result<(), ProjectError> {
        self.write_snapshot(&StoredGraph {
            graph: store.snapshot(),
            next_id: Some(store.next_sequence()),
        })
    }

    fn write_snapshot(&self, stored: &StoredGraph) -> Result<(), ProjectError> {
        let path = self.graph_path();
        let tmp = path.with_extension("json.tmp");
        let mut text = serde_json::to_string_pretty(stored)?;
        text.push('\n');

        let write_err = |source| ProjectError::Write {
            path: tmp.clone(),
            source,
        };
        let mut file = fs::File::create(&tmp).map_err(write_err)?;
        file.write_all(text.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        fs::rename(&tmp, &path).map_err(|source| ProjectError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "snapshot saved");
        Ok(())
    }
}
