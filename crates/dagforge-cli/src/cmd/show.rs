use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use clap::Args;
use dagforge_core::{Graph, GraphStore, Node, NodeId};
use serde::Serialize;

use super::inspect;
use crate::output::{OutputMode, pretty_section, render};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// List nodes in dependency order (every edge points forward).
    #[arg(long)]
    pub topo: bool,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    #[serde(flatten)]
    graph: Graph,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<Vec<NodeId>>,
    roots: Vec<NodeId>,
    leaves: Vec<NodeId>,
}

impl ShowOutput {
    fn collect(store: &GraphStore, topo: bool) -> Result<Self> {
        let ids = |nodes: Vec<&Node>| -> Vec<NodeId> {
            nodes.into_iter().map(|n| n.id.clone()).collect()
        };
        let order = if topo {
            Some(ids(store.topological_order()?))
        } else {
            None
        };
        Ok(Self {
            graph: store.snapshot(),
            order,
            roots: ids(store.roots()),
            leaves: ids(store.leaves()),
        })
    }

    /// Nodes in display order: topological when requested, else insertion.
    fn ordered_nodes(&self) -> Vec<&Node> {
        match &self.order {
            Some(order) => order
                .iter()
                .filter_map(|id| self.graph.node(id.as_str()))
                .collect(),
            None => self.graph.nodes.iter().collect(),
        }
    }
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let result = inspect(project_root, |store, _| ShowOutput::collect(store, args.topo))?;
    render(output, &result, render_text, render_pretty)
}

fn render_text(r: &ShowOutput, w: &mut dyn Write) -> io::Result<()> {
    for node in r.ordered_nodes() {
        writeln!(
            w,
            "node\t{}\t{}\t{}\t{}",
            node.id, node.label, node.position.x, node.position.y
        )?;
    }
    for edge in &r.graph.edges {
        writeln!(w, "edge\t{}\t{}", edge.from, edge.to)?;
    }
    Ok(())
}

fn render_pretty(r: &ShowOutput, w: &mut dyn Write) -> io::Result<()> {
    if r.graph.nodes.is_empty() {
        return writeln!(w, "Graph is empty. Add a node with `dagf node add <LABEL>`.");
    }

    let heading = if r.order.is_some() {
        format!("Nodes ({}, dependency order)", r.graph.nodes.len())
    } else {
        format!("Nodes ({})", r.graph.nodes.len())
    };
    pretty_section(w, &heading)?;
    for node in r.ordered_nodes() {
        writeln!(w, "  {:<8} {:<32} {}", node.id, node.label, node.position)?;
    }

    writeln!(w)?;
    pretty_section(w, &format!("Edges ({})", r.graph.edges.len()))?;
    if r.graph.edges.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for edge in &r.graph.edges {
        writeln!(
            w,
            "  {} -> {}    {} -> {}",
            edge.from,
            edge.to,
            r.graph.label_of(&edge.from),
            r.graph.label_of(&edge.to)
        )?;
    }

    writeln!(w)?;
    writeln!(w, "Roots:  {}", join(&r.roots))?;
    writeln!(w, "Leaves: {}", join(&r.leaves))
}

fn join(ids: &[NodeId]) -> String {
    ids.iter().map(NodeId::as_str).collect::<Vec<_>>().join(", ")
}
