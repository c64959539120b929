//! Page fetcher: GET the listing page and return its markup.

use crate::http::{FetchError, HttpClient};

/// Fetches `url` and decodes the body as text.
pub fn fetch_page(client: &HttpClient, url: &str) -> Result<String, FetchError> {
    let response = client.get(url)?;
    tracing::info!(
        url,
        bytes = response.body.len(),
        content_type = ?response.content_type,
        "fetched page"
    );
    Ok(response.text())
}
