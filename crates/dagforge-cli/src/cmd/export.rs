use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use dagforge_core::codec;
use serde::Serialize;

use super::inspect;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write the snapshot here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Single-line JSON, overriding `[export] pretty` in the project config.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Serialize)]
struct ExportOutput {
    ok: bool,
    path: String,
    nodes: usize,
    edges: usize,
}

/// Write the current snapshot in the exchange format.
///
/// To stdout the document itself is the output, whatever the output mode.
/// With `--output` the file is written and a short summary is rendered.
pub fn run_export(args: &ExportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (text, nodes, edges) = inspect(project_root, |store, config| {
        let graph = store.snapshot();
        let text = if config.export.pretty && !args.compact {
            codec::encode_pretty(&graph)?
        } else {
            codec::encode(&graph)?
        };
        Ok((text, graph.nodes.len(), graph.edges.len()))
    })?;

    let Some(path) = &args.output else {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        return Ok(());
    };

    fs::write(path, format!("{text}\n"))
        .with_context(|| format!("failed to write {}", path.display()))?;

    let result = ExportOutput {
        ok: true,
        path: path.display().to_string(),
        nodes,
        edges,
    };
    render(
        output,
        &result,
        |r, w| writeln!(w, "{}", r.path),
        |r, w| {
            writeln!(
                w,
                "✓ Exported {} nodes and {} edges to {}",
                r.nodes, r.edges, r.path
            )
        },
    )
}
