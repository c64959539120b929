//! Tagged pipeline failure with stage context.

use thiserror::Error;

use super::stage::{FailureKind, Stage};
use crate::archive::ArchiveError;
use crate::extract::ExtractError;
use crate::http::FetchError;
use crate::label::{join_labels, AnexoLabel};
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch page: {0}")]
    Page(#[source] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    #[error("Missing required anexos: {}", join_labels(.missing))]
    MissingAnexos { missing: Vec<AnexoLabel> },
    #[error("failed to create scratch directory: {0}")]
    ScratchDir(#[source] std::io::Error),
    #[error("failed to download '{label}': {source}")]
    Download {
        label: AnexoLabel,
        #[source]
        source: FetchError,
    },
    #[error("failed to store '{label}': {source}")]
    Store {
        label: AnexoLabel,
        #[source]
        source: StorageError,
    },
    #[error("failed to create archive {file_name}: {source}")]
    Archive {
        file_name: String,
        #[source]
        source: ArchiveError,
    },
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::Page(_) | PipelineError::Download { .. } => FailureKind::Network,
            PipelineError::Extraction(_) => FailureKind::Extraction,
            PipelineError::MissingAnexos { .. } => FailureKind::Validation,
            PipelineError::ScratchDir(_)
            | PipelineError::Store { .. }
            | PipelineError::Archive { .. } => FailureKind::Filesystem,
        }
    }

    /// Stage the run was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Page(_) => Stage::Fetching,
            PipelineError::Extraction(_) => Stage::Extracting,
            PipelineError::MissingAnexos { .. } => Stage::Validating,
            PipelineError::ScratchDir(_)
            | PipelineError::Download { .. }
            | PipelineError::Store { .. } => Stage::Downloading,
            PipelineError::Archive { .. } => Stage::Archiving,
        }
    }

    /// One-line, user-facing description prefixed by failure category.
    pub fn diagnostic(&self) -> String {
        match self.kind() {
            FailureKind::Network => format!("HTTP error occurred: {}", self),
            FailureKind::Extraction => format!("Link extraction failed: {}", self),
            FailureKind::Validation => format!("Validation failed: {}", self),
            FailureKind::Filesystem => format!("Filesystem error: {}", self),
        }
    }
}
