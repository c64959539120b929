//! Pipeline stages, failure categories, and progress events.

use std::fmt;
use std::path::PathBuf;

use crate::label::AnexoLabel;

/// Where a run currently is. `Failed` is reported through `PipelineError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    Validating,
    Downloading,
    Archiving,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Validating => "validating",
            Stage::Downloading => "downloading",
            Stage::Archiving => "archiving",
            Stage::Done => "done",
        };
        f.write_str(s)
    }
}

/// Failure category used for the user-facing diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP status or transport failure on the page or a document.
    Network,
    /// The page had no usable Anexo links.
    Extraction,
    /// Links were found but a required label is missing.
    Validation,
    /// Scratch file, scratch directory, or archive could not be written.
    Filesystem,
}

/// Progress notification emitted while a run advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    StageEntered(Stage),
    Downloaded {
        label: AnexoLabel,
        url: String,
        bytes: u64,
    },
    ArchiveCreated {
        file_name: String,
        path: PathBuf,
    },
}
