//! Atomic file writes.
//!
//! Data is written to a `.part` sibling, synced, and renamed onto the final
//! name, so a failed or interrupted write never leaves a truncated file
//! under the final name. An unfinished `.part` file is removed on drop.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Path for the temp file: appends `.part` to the final path (e.g. `Anexo I.pdf` → `Anexo I.pdf.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Open `.part` file that becomes `final_path` on [`PartFile::finalize`].
#[derive(Debug)]
pub struct PartFile {
    file: File,
    temp_path: PathBuf,
    final_path: PathBuf,
    finalized: bool,
}

impl PartFile {
    /// Creates (or truncates) the `.part` file for `final_path`.
    pub fn create(final_path: &Path) -> Result<Self, StorageError> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|source| StorageError::Create {
                path: temp_path.clone(),
                source,
            })?;
        Ok(PartFile {
            file,
            temp_path,
            final_path: final_path.to_path_buf(),
            finalized: false,
        })
    }

    /// Underlying file, for writers that need `Write + Seek` (e.g. zip).
    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), StorageError> {
        self.file
            .write_all(data)
            .map_err(|source| StorageError::Write {
                path: self.temp_path.clone(),
                source,
            })
    }

    /// Syncs and renames the `.part` file onto the final path, replacing any existing file.
    pub fn finalize(mut self) -> Result<(), StorageError> {
        self.file.sync_all().map_err(|source| StorageError::Write {
            path: self.temp_path.clone(),
            source,
        })?;
        self.finalized = true;
        let temp_path = self.temp_path.clone();
        let final_path = self.final_path.clone();
        // Close the handle before renaming.
        drop(self);

        if let Err(source) = fs::rename(&temp_path, &final_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::Rename {
                from: temp_path,
                to: final_path,
                source,
            });
        }
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.finalized {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                tracing::debug!(path = %self.temp_path.display(), "could not remove part file: {}", e);
            }
        }
    }
}

/// Writes `data` to `path` atomically, overwriting any existing file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let mut part = PartFile::create(path)?;
    part.write_all(data)?;
    part.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("Anexo I.pdf"));
        assert_eq!(p.to_string_lossy(), "Anexo I.pdf.part");
        let p2 = temp_path(Path::new("/tmp/anexos_20240101120000.zip"));
        assert_eq!(p2.to_string_lossy(), "/tmp/anexos_20240101120000.zip.part");
    }

    #[test]
    fn write_atomic_creates_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Anexo II.pdf");

        write_atomic(&path, b"first version, longer").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn dropped_part_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        {
            let mut part = PartFile::create(&path).unwrap();
            part.write_all(b"partial").unwrap();
            assert!(temp_path(&path).exists());
        }
        assert!(!temp_path(&path).exists());
        assert!(!path.exists());
    }

    #[test]
    fn create_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.bin");
        let err = write_atomic(&path, b"x").unwrap_err();
        assert!(matches!(err, StorageError::Create { .. }));
    }
}
