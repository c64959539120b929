//! Blocking HTTP GET over libcurl.
//!
//! One `HttpClient` is created per run and holds the request settings
//! explicitly; nothing is shared through global state. Each request uses a
//! fresh `curl::easy::Easy` handle, follows redirects, and treats any
//! non-2xx final status as an error.

mod charset;

pub use charset::decode_body;

use std::collections::BTreeMap;
use std::str;
use std::time::Duration;
use thiserror::Error;

/// Request settings applied to every GET issued by an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub user_agent: String,
    /// Extra headers sent verbatim ("Name: value").
    pub headers: BTreeMap<String, String>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

/// Transport or status failure of a single GET.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// Curl reported an error (DNS, connect, timeout, etc.).
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// Final response had a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
}

/// Successful (2xx) response with the full body in memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// `Content-Type` of the final response, if present.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body decoded as text using the charset from `Content-Type`.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Executes GET requests with a fixed set of [`HttpOptions`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    options: HttpOptions,
}

impl HttpClient {
    pub fn new(options: HttpOptions) -> Self {
        Self { options }
    }

    /// Performs a GET and returns the whole response body.
    ///
    /// Runs in the current thread; no retries.
    pub fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let transport = |source: curl::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let mut body: Vec<u8> = Vec::new();
        let mut headers: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        easy.follow_location(true).map_err(&transport)?;
        easy.max_redirections(10).map_err(&transport)?;
        easy.useragent(&self.options.user_agent)
            .map_err(&transport)?;
        easy.connect_timeout(self.options.connect_timeout)
            .map_err(&transport)?;
        easy.timeout(self.options.timeout).map_err(&transport)?;

        if !self.options.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in &self.options.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))
                    .map_err(&transport)?;
            }
            easy.http_headers(list).map_err(&transport)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        let line = s.trim_end();
                        // A new status line starts a new response (redirect hop).
                        if line.starts_with("HTTP/") {
                            headers.clear();
                        }
                        headers.push(line.to_string());
                    }
                    true
                })
                .map_err(&transport)?;
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(&transport)?;
            transfer.perform().map_err(&transport)?;
        }

        let code = easy.response_code().map_err(&transport)?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Status {
                url: url.to_string(),
                code,
            });
        }

        tracing::debug!(url, status = code, bytes = body.len(), "GET complete");

        Ok(HttpResponse {
            content_type: header_value(&headers, "content-type"),
            body,
        })
    }
}

/// Last value of header `name` (case-insensitive) among raw header lines.
fn header_value(lines: &[String], name: &str) -> Option<String> {
    lines
        .iter()
        .filter_map(|line| line.split_once(':'))
        .filter(|(k, _)| k.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim().to_string())
        .last()
}
