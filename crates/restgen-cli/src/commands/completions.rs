//! Shell completion generation command.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use restgen_core::cli::ExitCode;
use std::io::{self, Write};

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use restgen_cli::commands::completions::write_completions;
///
/// let mut cmd = Command::new("restgen").subcommand(Command::new("generate"));
/// let mut script = Vec::new();
/// write_completions(Shell::Bash, &mut cmd, &mut script);
/// assert!(String::from_utf8(script).unwrap().contains("generate"));
/// ```
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
pub async fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    tracing::debug!("Generating {shell} completions");
    write_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
