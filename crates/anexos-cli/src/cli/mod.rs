//! CLI for the Anexo I/II fetcher.

mod commands;

use anyhow::Result;
use anexos_core::config::{self, AnexosConfig};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{run_checksum, run_completions, run_links, run_pipeline};

/// Top-level CLI. Without a subcommand the pipeline runs once.
#[derive(Debug, Parser)]
#[command(name = "anexos")]
#[command(
    about = "Download the ANS Anexo I/II PDFs and pack them into a timestamped ZIP",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the page, download both anexos, and write anexos_<timestamp>.zip.
    Run {
        /// Directory for the archive (default: config output_dir, else the working directory).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Show the Anexo links found on the page without downloading them.
    Links,

    /// Compute SHA-256 of a file (e.g. a produced archive).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Loads the config file; an unreadable config is not fatal.
fn load_config() -> AnexosConfig {
    match config::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!("using default config: {:#}", err);
            AnexosConfig::default()
        }
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();
        let command = cli.command.unwrap_or(CliCommand::Run { output_dir: None });

        match command {
            CliCommand::Run { output_dir } => {
                let mut cfg = load_config();
                tracing::debug!("loaded config: {:?}", cfg);
                if output_dir.is_some() {
                    cfg.output_dir = output_dir;
                }
                run_pipeline(&cfg)
            }
            CliCommand::Links => run_links(&load_config()),
            CliCommand::Checksum { path } => run_checksum(&path),
            CliCommand::Completions { shell } => run_completions(shell),
        }
    }
}

#[cfg(test)]
mod tests;
