//! Browser selection and launch options.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scrapers::{ScrapeError, ScrapeResult};

/// Which browser to drive and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "target")]
pub enum BrowserKind {
    /// Chrome through a chromedriver binary started locally.
    LocalExecutable(PathBuf),
    /// Chrome through an already running Selenium/WebDriver endpoint.
    RemoteEndpoint(String),
    /// Firefox through a geckodriver binary started locally.
    Firefox(PathBuf),
}

impl BrowserKind {
    /// Build a kind from the `driver_kind` setting and its companion options.
    ///
    /// Recognized kinds are `chrome` (alias `local`), `remote` and `firefox`.
    /// When no executable path is configured the driver binary is looked up
    /// in `PATH`.
    pub fn from_settings(
        driver_kind: &str,
        executable_path: Option<&Path>,
        remote_endpoint: Option<&str>,
    ) -> ScrapeResult<Self> {
        match driver_kind.trim().to_ascii_lowercase().as_str() {
            "chrome" | "local" => {
                let path = resolve_executable(executable_path, "chromedriver")?;
                Ok(BrowserKind::LocalExecutable(path))
            }
            "firefox" => {
                let path = resolve_executable(executable_path, "geckodriver")?;
                Ok(BrowserKind::Firefox(path))
            }
            "remote" => {
                let endpoint = remote_endpoint
                    .filter(|s| !s.trim().is_empty())
                    .ok_or(ScrapeError::MissingSetting("remote_endpoint"))?;
                Ok(BrowserKind::RemoteEndpoint(endpoint.to_string()))
            }
            _ => Err(ScrapeError::UnsupportedBrowserKind(driver_kind.to_string())),
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            BrowserKind::LocalExecutable(_) => "chrome",
            BrowserKind::RemoteEndpoint(_) => "remote",
            BrowserKind::Firefox(_) => "firefox",
        }
    }
}

fn resolve_executable(configured: Option<&Path>, binary: &'static str) -> ScrapeResult<PathBuf> {
    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }
    which::which(binary).map_err(|_| ScrapeError::MissingSetting("executable_path"))
}

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub kind: BrowserKind,
    /// Run without a visible window.
    pub headless: bool,
}

impl BrowserOptions {
    pub fn new(kind: BrowserKind, headless: bool) -> Self {
        Self { kind, headless }
    }
}
