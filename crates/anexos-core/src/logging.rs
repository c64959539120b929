//! Run log: appended to a file under the XDG state dir, or written to stderr
//! when that file can't be opened.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info,anexos=debug,anexos_core=debug";

/// Where log records end up after [`init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// `$XDG_STATE_HOME/anexos/runs.log`.
pub fn log_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::new()?;
    Ok(dirs.get_state_home().join("anexos").join("runs.log"))
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Prefers the run log file; any problem
/// opening it degrades to stderr and is reported through the log itself.
///
/// A subscriber installed earlier (tests, embedding callers) is left alone.
pub fn init_logging() -> LogTarget {
    let opened = log_path().and_then(|path| open_log(&path).map(|file| (path, file)));
    match opened {
        Ok((path, file)) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
            tracing::debug!(log = %path.display(), "run log opened");
            LogTarget::File(path)
        }
        Err(err) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .try_init();
            tracing::warn!("run log unavailable, logging to stderr: {:#}", err);
            LogTarget::Stderr
        }
    }
}
