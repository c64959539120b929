//! `anexos completions <shell>`.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;
use std::process::ExitCode;

use crate::cli::Cli;

pub fn run_completions(shell: Shell) -> Result<ExitCode> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "anexos", &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
