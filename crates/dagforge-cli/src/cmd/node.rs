//! `dagf node` — create, delete, move and rename nodes.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use dagforge_core::{GraphError, GraphStore, Missing, Node, NodeId, Position};
use serde::Serialize;

use super::mutate;
use crate::output::{OutputMode, render};

// ---------------------------------------------------------------------------
// Clap types
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct NodeArgs {
    #[command(subcommand)]
    pub command: NodeCommand,
}

#[derive(Subcommand, Debug)]
pub enum NodeCommand {
    #[command(
        about = "Add a node",
        after_help = "EXAMPLES:\n    # Add a node and print its id\n    dagf node add \"Fetch sources\"\n\n    # Capture the id in a script\n    id=$(dagf node add Build --format text)"
    )]
    Add(NodeAddArgs),

    #[command(
        about = "Delete a node and every edge touching it",
        after_help = "EXAMPLES:\n    dagf node rm n3"
    )]
    Rm(NodeRmArgs),

    #[command(
        about = "Move a node to new coordinates",
        after_help = "EXAMPLES:\n    dagf node move n1 200 80\n\n    # Negative coordinates are accepted\n    dagf node move n1 -40 10.5"
    )]
    Move(NodeMoveArgs),

    #[command(
        about = "Change a node's label",
        after_help = "EXAMPLES:\n    dagf node rename n1 \"Fetch and verify sources\""
    )]
    Rename(NodeRenameArgs),
}

#[derive(Args, Debug)]
pub struct NodeAddArgs {
    /// Node label. Surrounding whitespace is trimmed; must not be blank.
    pub label: String,
}

#[derive(Args, Debug)]
pub struct NodeRmArgs {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct NodeMoveArgs {
    pub id: String,
    #[arg(allow_negative_numbers = true)]
    pub x: f64,
    #[arg(allow_negative_numbers = true)]
    pub y: f64,
}

#[derive(Args, Debug)]
pub struct NodeRenameArgs {
    pub id: String,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct NodeRmOutput {
    ok: bool,
    id: String,
    edges_removed: usize,
}

fn current(store: &GraphStore, id: &str) -> Result<Node, GraphError> {
    store
        .node(id)
        .cloned()
        .ok_or_else(|| GraphError::NotFound(Missing::Node(NodeId::from(id))))
}

// ---------------------------------------------------------------------------
// Command runners
// ---------------------------------------------------------------------------

pub fn run_node(args: &NodeArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    match &args.command {
        NodeCommand::Add(a) => run_node_add(a, output, project_root),
        NodeCommand::Rm(a) => run_node_rm(a, output, project_root),
        NodeCommand::Move(a) => run_node_move(a, output, project_root),
        NodeCommand::Rename(a) => run_node_rename(a, output, project_root),
    }
}

fn run_node_add(args: &NodeAddArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let node = mutate(project_root, |store| {
        let id = store.add_node(&args.label)?;
        current(store, id.as_str())
    })?;

    render(
        output,
        &node,
        |r, w| writeln!(w, "{}", r.id),
        |r, w| writeln!(w, "✓ Added {} \"{}\" at {}", r.id, r.label, r.position),
    )
}

fn run_node_rm(args: &NodeRmArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let edges_removed = mutate(project_root, |store| {
        let before = store.edge_count();
        store.delete_node(&args.id)?;
        Ok(before - store.edge_count())
    })?;

    let result = NodeRmOutput {
        ok: true,
        id: args.id.clone(),
        edges_removed,
    };
    render(
        output,
        &result,
        |r, w| writeln!(w, "{}\t{}", r.id, r.edges_removed),
        |r, w| {
            writeln!(
                w,
                "✓ Deleted {} ({} edge{} removed)",
                r.id,
                r.edges_removed,
                if r.edges_removed == 1 { "" } else { "s" }
            )
        },
    )
}

fn run_node_move(args: &NodeMoveArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let position = Position::new(args.x, args.y);
    let node = mutate(project_root, |store| {
        store.reposition_node(&args.id, position)?;
        current(store, &args.id)
    })?;

    render(
        output,
        &node,
        |r, w| writeln!(w, "{}\t{}\t{}", r.id, r.position.x, r.position.y),
        |r, w| writeln!(w, "✓ Moved {} to {}", r.id, r.position),
    )
}

fn run_node_rename(args: &NodeRenameArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let node = mutate(project_root, |store| {
        store.relabel_node(&args.id, &args.label)?;
        current(store, &args.id)
    })?;

    render(
        output,
        &node,
        |r, w| writeln!(w, "{}\t{}", r.id, r.label),
        |r, w| writeln!(w, "✓ Renamed {} to \"{}\"", r.id, r.label),
    )
}
