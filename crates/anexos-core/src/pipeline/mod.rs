//! Orchestrator: fetch → extract → validate → download → archive.
//!
//! A run is strictly sequential. Documents are downloaded into a scratch
//! directory owned by the run (`tempfile::TempDir`), which is removed when
//! the run returns, whichever stage it stopped in. The archive is only
//! created after both downloads succeeded, so there is never a partial one.

mod error;
mod stage;

pub use error::PipelineError;
pub use stage::{FailureKind, PipelineEvent, Stage};

use chrono::Local;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::archive;
use crate::checksum;
use crate::config::AnexosConfig;
use crate::downloader::{self, DownloadError};
use crate::extract::LinkExtractor;
use crate::fetcher;
use crate::http::HttpClient;
use crate::label::{AnexoLabel, LinkMap};

/// Where a run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub page_url: String,
    pub link_class: String,
    /// Directory the archive is written to.
    pub output_dir: PathBuf,
    /// Parent of the per-run scratch directory (None = system temp dir).
    pub scratch_dir: Option<PathBuf>,
}

impl PipelineOptions {
    pub fn from_config(cfg: &AnexosConfig) -> Self {
        Self {
            page_url: cfg.page_url.clone(),
            link_class: cfg.link_class.clone(),
            output_dir: cfg.output_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            scratch_dir: cfg.scratch_dir.clone(),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    /// `anexos_<YYYYMMDDHHMMSS>.zip`
    pub file_name: String,
    pub path: PathBuf,
    /// Entry names, in archive order.
    pub entries: Vec<String>,
    /// Hex SHA-256 of the archive; None if it could not be read back.
    pub sha256: Option<String>,
}

type Observer = Box<dyn Fn(&PipelineEvent)>;

pub struct Pipeline {
    client: HttpClient,
    extractor: LinkExtractor,
    options: PipelineOptions,
    observer: Option<Observer>,
}

impl Pipeline {
    pub fn new(client: HttpClient, options: PipelineOptions) -> Result<Self, PipelineError> {
        let extractor = LinkExtractor::new(&options.link_class)?;
        Ok(Self {
            client,
            extractor,
            options,
            observer: None,
        })
    }

    pub fn from_config(cfg: &AnexosConfig) -> Result<Self, PipelineError> {
        Self::new(
            HttpClient::new(cfg.http_options()),
            PipelineOptions::from_config(cfg),
        )
    }

    /// Registers a callback for progress events.
    pub fn with_observer(mut self, observer: impl Fn(&PipelineEvent) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Runs the pipeline once, returning the archive file name.
    ///
    /// Any failure is logged and yields `None`.
    pub fn run(&self) -> Option<String> {
        match self.try_run() {
            Ok(outcome) => Some(outcome.file_name),
            Err(err) => {
                tracing::error!(stage = %err.stage(), kind = ?err.kind(), "{}", err.diagnostic());
                None
            }
        }
    }

    /// Runs the pipeline once, returning the tagged error on failure.
    pub fn try_run(&self) -> Result<ArchiveOutcome, PipelineError> {
        let links = self.discover()?;

        self.enter(Stage::Validating);
        validate(&links)?;

        self.enter(Stage::Downloading);
        let scratch = self.scratch_dir()?;
        let downloaded = self.download_all(&links, &scratch)?;

        self.enter(Stage::Archiving);
        let file_name = archive::archive_name(&Local::now());
        let path = self.options.output_dir.join(&file_name);
        let entries = archive::create_archive(downloaded.values(), &path).map_err(|source| {
            PipelineError::Archive {
                file_name: file_name.clone(),
                source,
            }
        })?;

        let sha256 = match checksum::sha256_path(&path) {
            Ok(digest) => Some(digest),
            Err(e) => {
                tracing::warn!("could not checksum {}: {:#}", path.display(), e);
                None
            }
        };
        tracing::info!(archive = %path.display(), sha256 = ?sha256, "created ZIP archive");
        self.notify(&PipelineEvent::ArchiveCreated {
            file_name: file_name.clone(),
            path: path.clone(),
        });

        if let Err(e) = scratch.close() {
            tracing::warn!("could not remove scratch directory: {}", e);
        }

        self.enter(Stage::Done);
        Ok(ArchiveOutcome {
            file_name,
            path,
            entries,
            sha256,
        })
    }

    /// Fetches the page and extracts the Anexo links without downloading.
    pub fn discover(&self) -> Result<LinkMap, PipelineError> {
        self.enter(Stage::Fetching);
        let markup =
            fetcher::fetch_page(&self.client, &self.options.page_url).map_err(PipelineError::Page)?;

        self.enter(Stage::Extracting);
        let links = self.extractor.extract(&markup)?;
        for (label, href) in links.iter() {
            tracing::info!(%label, href, "discovered link");
        }
        Ok(links)
    }

    fn download_all(
        &self,
        links: &LinkMap,
        scratch: &TempDir,
    ) -> Result<BTreeMap<AnexoLabel, PathBuf>, PipelineError> {
        let mut downloaded = BTreeMap::new();
        for label in AnexoLabel::REQUIRED {
            let Some(href) = links.get(label) else {
                return Err(PipelineError::MissingAnexos {
                    missing: vec![label],
                });
            };
            let url = downloader::resolve_url(&self.options.page_url, href);
            let destination = scratch.path().join(label.file_name());

            let bytes = downloader::download(&self.client, &url, &destination).map_err(|e| {
                match e {
                    DownloadError::Fetch(source) => PipelineError::Download { label, source },
                    DownloadError::Storage(source) => PipelineError::Store { label, source },
                }
            })?;

            tracing::info!(%label, url = %url, bytes, "downloaded");
            self.notify(&PipelineEvent::Downloaded { label, url, bytes });
            downloaded.insert(label, destination);
        }
        Ok(downloaded)
    }

    fn scratch_dir(&self) -> Result<TempDir, PipelineError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("anexos-");
        let dir = match &self.options.scratch_dir {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(PipelineError::ScratchDir)?;
        tracing::debug!(path = %dir.path().display(), "scratch directory created");
        Ok(dir)
    }

    fn enter(&self, stage: Stage) {
        tracing::debug!(%stage, "entering stage");
        self.notify(&PipelineEvent::StageEntered(stage));
    }

    fn notify(&self, event: &PipelineEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}

/// Checks that every required label has a link.
pub fn validate(links: &LinkMap) -> Result<(), PipelineError> {
    let missing = links.missing(&AnexoLabel::REQUIRED);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::MissingAnexos { missing })
    }
}
