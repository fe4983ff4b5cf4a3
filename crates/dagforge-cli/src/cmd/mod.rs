pub mod clear;
pub mod completions;
pub mod edge;
pub mod export;
pub mod import;
pub mod init;
pub mod node;
pub mod show;

use std::path::Path;

use anyhow::Result;
use dagforge_core::config::ProjectConfig;
use dagforge_core::project::Project;
use dagforge_core::{GraphError, GraphStore};

/// Load, mutate, save under the project's exclusive lock.
///
/// When `f` fails nothing is written back, so the snapshot file keeps the
/// pre-command state.
pub fn mutate<T>(
    start: &Path,
    f: impl FnOnce(&mut GraphStore) -> Result<T, GraphError>,
) -> Result<T> {
    let project = Project::discover(start)?;
    let _lock = project.lock()?;
    let config = project.config()?;
    let mut store = project.load(config.layout.placement())?;

    let value = f(&mut store)?;
    project.save(&store)?;
    Ok(value)
}

/// Load the snapshot under a shared lock for a read-only command.
pub fn inspect<T>(
    start: &Path,
    f: impl FnOnce(&GraphStore, &ProjectConfig) -> Result<T>,
) -> Result<T> {
    let project = Project::discover(start)?;
    let _lock = project.read_lock()?;
    let config = project.config()?;
    let store = project.load(config.layout.placement())?;
    f(&store, &config)
}
