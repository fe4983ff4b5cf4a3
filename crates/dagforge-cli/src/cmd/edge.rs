//! `dagf edge` — add and remove directed edges.
//!
//! `dagf edge add` is where the acyclicity guarantee shows up for users: an
//! edge that would close a cycle is rejected and the snapshot file is left
//! untouched.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use super::mutate;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct EdgeArgs {
    #[command(subcommand)]
    pub command: EdgeCommand,
}

#[derive(Subcommand, Debug)]
pub enum EdgeCommand {
    #[command(
        about = "Add the edge <FROM> -> <TO>",
        after_help = "EXAMPLES:\n    # n1 must finish before n2\n    dagf edge add n1 n2\n\n    # Rejected: would close the cycle n1 -> n2 -> n1\n    dagf edge add n2 n1"
    )]
    Add(EdgeEndpoints),

    #[command(
        about = "Remove the edge <FROM> -> <TO>",
        after_help = "EXAMPLES:\n    dagf edge rm n1 n2"
    )]
    Rm(EdgeEndpoints),
}

#[derive(Args, Debug)]
pub struct EdgeEndpoints {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
}

#[derive(Debug, Serialize)]
struct EdgeOutput<'a> {
    ok: bool,
    action: &'static str,
    from: &'a str,
    to: &'a str,
}

pub fn run_edge(args: &EdgeArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (action, endpoints) = match &args.command {
        EdgeCommand::Add(e) => {
            mutate(project_root, |store| store.add_edge(&e.from, &e.to))?;
            ("added", e)
        }
        EdgeCommand::Rm(e) => {
            mutate(project_root, |store| store.delete_edge(&e.from, &e.to))?;
            ("removed", e)
        }
    };

    let result = EdgeOutput {
        ok: true,
        action,
        from: &endpoints.from,
        to: &endpoints.to,
    };
    render(
        output,
        &result,
        |r, w| writeln!(w, "{}\t{}", r.from, r.to),
        |r, w| writeln!(w, "✓ Edge {} -> {} {}", r.from, r.to, r.action),
    )
}
