use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use dagforge_core::project::Project;
use serde::Serialize;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Reset an existing project's graph to empty. The config file is kept.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitOutput {
    ok: bool,
    root: String,
    graph: String,
    config: String,
}

/// Execute `dagf init`:
///
/// ```text
/// .dagforge/
///   graph.json    empty snapshot
///   config.toml   default layout and export settings
/// ```
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let project = Project::init(project_root, args.force)?;

    let result = InitOutput {
        ok: true,
        root: project.root().display().to_string(),
        graph: project.graph_path().display().to_string(),
        config: project.config_path().display().to_string(),
    };

    render(
        output,
        &result,
        |r, w| writeln!(w, "{}", r.root),
        |r, w| {
            writeln!(w, "✓ Initialized .dagforge/ in {}", r.root)?;
            writeln!(w)?;
            writeln!(w, "  Graph:  {}", r.graph)?;
            writeln!(w, "  Config: {}", r.config)?;
            writeln!(w)?;
            writeln!(w, "Next: dagf node add \"First step\"")
        },
    )
}
