//! CLI command handlers, one per file.

mod checksum;
mod completions;
mod links;
mod run;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use links::run_links;
pub use run::run_pipeline;
