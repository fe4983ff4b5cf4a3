use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::mutate;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct ClearArgs {}

#[derive(Debug, Serialize)]
struct ClearOutput {
    ok: bool,
    nodes_removed: usize,
    edges_removed: usize,
}

pub fn run_clear(_args: &ClearArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (nodes_removed, edges_removed) = mutate(project_root, |store| {
        let counts = (store.node_count(), store.edge_count());
        store.clear();
        Ok(counts)
    })?;

    let result = ClearOutput {
        ok: true,
        nodes_removed,
        edges_removed,
    };
    render(
        output,
        &result,
        |r, w| writeln!(w, "{}\t{}", r.nodes_removed, r.edges_removed),
        |r, w| {
            writeln!(
                w,
                "✓ Cleared graph ({} nodes, {} edges removed)",
                r.nodes_removed, r.edges_removed
            )
        },
    )
}
