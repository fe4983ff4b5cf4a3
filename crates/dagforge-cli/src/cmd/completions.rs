use std::io::{self, Write};

use anyhow::{Context as _, Result};
use clap::Args;
use clap_complete::{Shell, generate};

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print a completion script for `command` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = io::stdout().lock();
    write_completions(shell, command, &mut out);
    out.flush().context("failed to write completion script")
}

/// Completion script for the binary `command` describes, named after it.
fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    let bin = command.get_name().to_string();
    generate(shell, command, bin, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};

    fn sample() -> Command {
        Command::new("dagf")
            .subcommand(Command::new("show").arg(Arg::new("topo").long("topo").num_args(0)))
    }

    #[test]
    fn script_names_the_binary_and_its_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let mut buf = Vec::new();
            write_completions(shell, &mut sample(), &mut buf);
            let script = String::from_utf8(buf).unwrap();
            assert!(script.contains("dagf"), "{shell} script lacks binary name");
            assert!(script.contains("show"), "{shell} script lacks subcommand");
        }
    }
}
