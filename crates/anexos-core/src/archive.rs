//! Zip archiver for the downloaded documents.
//!
//! Entries are named by each file's base name; the archive itself is written
//! through a `.part` file so it only appears under its final name once complete.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::storage::{PartFile, StorageError};

const ARCHIVE_PREFIX: &str = "anexos_";
const ARCHIVE_SUFFIX: &str = ".zip";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{} has no usable file name", .path.display())]
    NoFileName { path: PathBuf },
    #[error("failed to add {}: {source}", .path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Archive file name for a run at `at`: `anexos_<YYYYMMDDHHMMSS>.zip`.
pub fn archive_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!(
        "{}{}{}",
        ARCHIVE_PREFIX,
        at.format(TIMESTAMP_FORMAT),
        ARCHIVE_SUFFIX
    )
}

/// True if `name` has the shape produced by [`archive_name`].
pub fn is_archive_name(name: &str) -> bool {
    name.strip_prefix(ARCHIVE_PREFIX)
        .and_then(|rest| rest.strip_suffix(ARCHIVE_SUFFIX))
        .is_some_and(|ts| ts.len() == 14 && ts.bytes().all(|b| b.is_ascii_digit()))
}

/// Writes every file in `files` into a new deflate zip at `archive_path`,
/// replacing any existing file. Returns the entry names in insertion order.
pub fn create_archive<I, P>(files: I, archive_path: &Path) -> Result<Vec<String>, ArchiveError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut part = PartFile::create(archive_path)?;
    let mut entries = Vec::new();

    {
        let mut zip = ZipWriter::new(part.file_mut());
        for path in files {
            let path = path.as_ref();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| ArchiveError::NoFileName {
                    path: path.to_path_buf(),
                })?;
            let source_err = |source: io::Error| ArchiveError::Source {
                path: path.to_path_buf(),
                source,
            };

            let mut source = File::open(path).map_err(source_err)?;
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(name, options)?;
            io::copy(&mut source, &mut zip).map_err(source_err)?;
            entries.push(name.to_string());
        }
        zip.finish()?;
    }

    part.finalize()?;
    tracing::debug!(path = %archive_path.display(), entries = entries.len(), "archive written");
    Ok(entries)
}
