use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use super::mutate;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Snapshot file to load, or `-` for stdin.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
struct ImportOutput {
    ok: bool,
    nodes: usize,
    edges: usize,
}

/// Replace the whole graph with the snapshot at `path`.
///
/// The snapshot is validated as a unit; if any part is invalid the current
/// graph is kept and nothing is written.
pub fn run_import(args: &ImportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let text = read_source(&args.path)?;

    let (nodes, edges) = mutate(project_root, |store| {
        store.import(&text)?;
        Ok((store.node_count(), store.edge_count()))
    })?;
    info!(nodes, edges, source = %args.path.display(), "snapshot imported");

    let result = ImportOutput {
        ok: true,
        nodes,
        edges,
    };
    render(
        output,
        &result,
        |r, w| writeln!(w, "{}\t{}", r.nodes, r.edges),
        |r, w| writeln!(w, "✓ Imported {} nodes and {} edges", r.nodes, r.edges),
    )
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read snapshot from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
