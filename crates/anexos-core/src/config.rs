use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::extract::DEFAULT_LINK_CLASS;
use crate::http::HttpOptions;

/// Page listing the current Anexo I/II documents.
pub const DEFAULT_PAGE_URL: &str = "https://www.gov.br/ans/pt-br/acesso-a-informacao/participacao-da-sociedade/atualizacao-do-rol-de-procedimentos";

/// Browser-like User-Agent; the page rejects obvious non-browser clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Global configuration loaded from `~/.config/anexos/config.toml`.
///
/// Every field has a default, so a partial (or empty) file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnexosConfig {
    /// Page that links to the Anexo PDFs.
    pub page_url: String,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// CSS class an anchor must carry to be considered a candidate link.
    pub link_class: String,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Directory where the archive is written (None = working directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Parent for the per-run scratch directory (None = system temp dir).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
    /// Extra request headers ("Name" = "value").
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Default for AnexosConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            link_class: DEFAULT_LINK_CLASS.to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 120,
            output_dir: None,
            scratch_dir: None,
            headers: BTreeMap::new(),
        }
    }
}

impl AnexosConfig {
    /// Request settings for the HTTP client of a single run.
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            user_agent: self.user_agent.clone(),
            headers: self.headers.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Load configuration from `$XDG_CONFIG_HOME/anexos/config.toml` (or the XDG
/// config dirs). A missing file yields the defaults; nothing is written.
pub fn load() -> Result<AnexosConfig> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("anexos")?;
    match xdg_dirs.find_config_file("config.toml") {
        Some(path) => load_from(&path),
        None => Ok(AnexosConfig::default()),
    }
}

/// Read-only load from an explicit path; defaults when the file is absent.
pub fn load_from(path: &Path) -> Result<AnexosConfig> {
    if !path.exists() {
        return Ok(AnexosConfig::default());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: AnexosConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
