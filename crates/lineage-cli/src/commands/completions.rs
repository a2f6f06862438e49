//! Shell completion scripts for `lineage`

use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use super::write_output;
use crate::Cli;

const BIN_NAME: &str = "lineage";

#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell (default: detected from $SHELL)
    #[arg(value_enum)]
    pub shell: Option<Shell>,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Completion script for one shell
fn script(shell: Shell) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    generate(shell, &mut Cli::command(), BIN_NAME, &mut buf);
    Ok(String::from_utf8(buf)?)
}

pub fn run(args: &CompletionsArgs) -> anyhow::Result<()> {
    let Some(shell) = args.shell.or_else(Shell::from_env) else {
        anyhow::bail!("Cannot detect the shell from $SHELL; pass one explicitly");
    };
    tracing::debug!("Generating {} completions", shell);

    write_output(args.output.as_deref(), &script(shell)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_covers_subcommands() {
        let bash = script(Shell::Bash).unwrap();
        assert!(bash.contains(BIN_NAME));
        assert!(bash.contains("generations"));
        assert!(bash.contains("--export-format"));

        let fish = script(Shell::Fish).unwrap();
        assert!(fish.contains("complete -c lineage"));
    }
}
