//! `anexos run` – the full fetch/download/archive pipeline.

use anyhow::Result;
use anexos_core::config::AnexosConfig;
use anexos_core::pipeline::{Pipeline, PipelineEvent};
use std::process::ExitCode;

fn print_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::Downloaded { label, .. } => println!("Downloaded '{}'", label),
        PipelineEvent::ArchiveCreated { file_name, .. } => {
            println!("Created ZIP archive: '{}'", file_name)
        }
        PipelineEvent::StageEntered(_) => {}
    }
}

/// Runs the pipeline once. Exit status is failure when no archive was produced.
pub fn run_pipeline(cfg: &AnexosConfig) -> Result<ExitCode> {
    let outcome = Pipeline::from_config(cfg).and_then(|p| p.with_observer(print_event).try_run());

    match outcome {
        Ok(outcome) => {
            if let Some(digest) = &outcome.sha256 {
                println!("{}  {}", digest, outcome.file_name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!(stage = %err.stage(), kind = ?err.kind(), "{}", err);
            eprintln!("{}", err.diagnostic());
            eprintln!("Failed to create ZIP file");
            Ok(ExitCode::FAILURE)
        }
    }
}
