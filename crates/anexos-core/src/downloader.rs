//! File downloader: GET a document and store its bytes at a local path.

use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::http::{FetchError, HttpClient};
use crate::storage::{self, StorageError};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Downloads `url` into `destination`, overwriting it. Returns the number of bytes written.
///
/// Nothing is written unless the response was 2xx.
pub fn download(client: &HttpClient, url: &str, destination: &Path) -> Result<u64, DownloadError> {
    let response = client.get(url)?;
    storage::write_atomic(destination, &response.body)?;
    Ok(response.body.len() as u64)
}

/// Resolves a (possibly relative) `href` against the page it was found on.
///
/// Absolute hrefs come back unchanged; if either side fails to parse, the
/// raw href is returned and the request reports the problem.
pub fn resolve_url(page_url: &str, href: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
