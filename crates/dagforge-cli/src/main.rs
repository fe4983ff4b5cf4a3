#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "dagf",
    author,
    version,
    about = "dagf: edit a directed acyclic graph that refuses to become cyclic",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by DAGFORGE_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Shorthand for `--format json`.
    #[arg(long, global = true)]
    json: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Project directory (default: nearest ancestor of the working directory
    /// containing .dagforge/).
    #[arg(long, global = true, value_name = "PATH")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Project",
        about = "Create .dagforge/ with an empty graph",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    dagf init\n\n    # Start over with an empty graph\n    dagf init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Add, delete, move or rename nodes",
        after_help = "EXAMPLES:\n    dagf node add \"Fetch sources\"\n    dagf node move n1 200 80\n    dagf node rename n1 Fetch\n    dagf node rm n1"
    )]
    Node(cmd::node::NodeArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Add or remove edges; cycles are rejected",
        after_help = "EXAMPLES:\n    dagf edge add n1 n2\n    dagf edge rm n1 n2"
    )]
    Edge(cmd::edge::EdgeArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show nodes, edges, roots and leaves",
        after_help = "EXAMPLES:\n    # Insertion order\n    dagf show\n\n    # Dependency order\n    dagf show --topo\n\n    # Machine-readable\n    dagf show --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Remove every node and edge",
        after_help = "EXAMPLES:\n    dagf clear"
    )]
    Clear(cmd::clear::ClearArgs),

    #[command(
        next_help_heading = "Exchange",
        about = "Write the graph as a JSON snapshot",
        after_help = "EXAMPLES:\n    # To stdout\n    dagf export\n\n    # To a file\n    dagf export --output graph.json"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Exchange",
        about = "Replace the graph with a JSON snapshot",
        long_about = "Replace the graph with a JSON snapshot. The snapshot is validated as a whole; if any node or edge is invalid, or the edges contain a cycle, the current graph is kept.",
        after_help = "EXAMPLES:\n    dagf import graph.json\n\n    # From stdin\n    cat graph.json | dagf import -"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    dagf completions bash > /etc/bash_completion.d/dagf"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("DAGFORGE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "dagforge_core=debug,dagf=debug,info"
        } else {
            "dagforge_core=info,dagf=info,warn"
        })
    });

    let format = env::var("DAGFORGE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli, output: OutputMode) -> anyhow::Result<()> {
    let start = match cli.dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    let project_root = std::path::absolute(&start)?;
    debug!(root = %project_root.display(), ?output, "dispatching");

    match cli.command {
        Commands::Init(args) => cmd::init::run_init(&args, output, &project_root),
        Commands::Node(args) => cmd::node::run_node(&args, output, &project_root),
        Commands::Edge(args) => cmd::edge::run_edge(&args, output, &project_root),
        Commands::Show(args) => cmd::show::run_show(&args, output, &project_root),
        Commands::Clear(args) => cmd::clear::run_clear(&args, output, &project_root),
        Commands::Export(args) => cmd::export::run_export(&args, output, &project_root),
        Commands::Import(args) => cmd::import::run_import(&args, output, &project_root),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = cli.output_mode();

    match run(cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("command failed: {err:?}");
            if let Err(render_err) = render_error(output, &CliError::from(&err)) {
                eprintln!("error: {err:#} (while rendering: {render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
