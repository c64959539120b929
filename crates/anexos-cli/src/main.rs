use anexos_core::logging;
use std::process::ExitCode;

mod cli;

use crate::cli::CliCommand;

fn main() -> ExitCode {
    let target = logging::init_logging();
    tracing::debug!(?target, "logging ready");

    // Parse CLI and dispatch.
    match CliCommand::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("anexos error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
