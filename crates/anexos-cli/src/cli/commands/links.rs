//! `anexos links` – dry run that only discovers the document links.

use anyhow::Result;
use anexos_core::config::AnexosConfig;
use anexos_core::downloader::resolve_url;
use anexos_core::pipeline::{self, Pipeline};
use std::process::ExitCode;

pub fn run_links(cfg: &AnexosConfig) -> Result<ExitCode> {
    let links = match Pipeline::from_config(cfg).and_then(|p| p.discover()) {
        Ok(links) => links,
        Err(err) => {
            eprintln!("{}", err.diagnostic());
            return Ok(ExitCode::FAILURE);
        }
    };

    for (label, href) in links.iter() {
        println!("{:<9} {}", label.as_str(), resolve_url(&cfg.page_url, href));
    }

    match pipeline::validate(&links) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}", err.diagnostic());
            Ok(ExitCode::FAILURE)
        }
    }
}
