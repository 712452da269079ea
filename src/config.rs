//! Configuration for imdbscrape using the prefer crate for discovery.
//!
//! Precedence, lowest to highest: built-in defaults, config file (explicit
//! `--config` or auto-discovered), `IMDBSCRAPE_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::scrapers::imdb::DEFAULT_BASE_URL;
use crate::scrapers::{BrowserKind, BrowserOptions, ScrapeResult};

/// Default address the HTTP server binds to.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Default browser kind.
pub const DEFAULT_DRIVER_KIND: &str = "chrome";

/// Environment variable prefix for overrides.
const ENV_PREFIX: &str = "IMDBSCRAPE_";

/// Effective runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// `chrome`, `firefox` or `remote`.
    pub driver_kind: String,
    /// Path to chromedriver/geckodriver; looked up in PATH when unset.
    pub executable_path: Option<PathBuf>,
    /// Selenium endpoint for the `remote` kind.
    pub remote_endpoint: Option<String>,
    pub headless: bool,
    /// Page holding the search form.
    pub base_url: String,
    /// HTTP bind address (HOST:PORT).
    pub bind: String,
    /// Bearer tokens accepted by the HTTP API.
    #[serde(skip)]
    pub api_tokens: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            driver_kind: DEFAULT_DRIVER_KIND.to_string(),
            executable_path: None,
            remote_endpoint: None,
            headless: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            bind: DEFAULT_BIND.to_string(),
            api_tokens: Vec::new(),
        }
    }
}

impl Settings {
    /// Apply `IMDBSCRAPE_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` to read variables.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|s| !s.trim().is_empty())
        };

        if let Some(kind) = get("DRIVER_KIND") {
            tracing::debug!("Using IMDBSCRAPE_DRIVER_KIND from environment: {}", kind);
            self.driver_kind = kind;
        }
        if let Some(path) = get("EXECUTABLE_PATH") {
            self.executable_path = Some(expand_path(&path));
        }
        if let Some(endpoint) = get("REMOTE_ENDPOINT") {
            tracing::debug!("Using IMDBSCRAPE_REMOTE_ENDPOINT from environment: {}", endpoint);
            self.remote_endpoint = Some(endpoint);
        }
        if let Some(headless) = get("HEADLESS") {
            self.headless = parse_bool(&headless);
        }
        if let Some(base_url) = get("BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(bind) = get("BIND") {
            self.bind = bind;
        }
        if let Some(tokens) = get("API_TOKENS") {
            self.api_tokens = split_tokens(&tokens);
        }
    }

    /// Check URLs before anything tries to use them.
    pub fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.base_url))?;
        if let Some(ref endpoint) = self.remote_endpoint {
            url::Url::parse(endpoint)
                .with_context(|| format!("Invalid remote_endpoint: {}", endpoint))?;
        }
        Ok(())
    }

    /// Browser options for new sessions.
    pub fn browser_options(&self) -> ScrapeResult<BrowserOptions> {
        let kind = BrowserKind::from_settings(
            &self.driver_kind,
            self.executable_path.as_deref(),
            self.remote_endpoint.as_deref(),
        )?;
        Ok(BrowserOptions::new(kind, self.headless))
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn split_tokens(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn expand_path(path_str: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path_str).as_ref())
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_tokens: Vec<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover an `imdbscrape` config file in the standard locations.
    pub async fn load() -> Self {
        match prefer::load("imdbscrape").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config file: {:#}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// The format follows the extension: TOML, YAML, or JSON otherwise.
    pub async fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).context("Failed to parse TOML config")?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).context("Failed to parse YAML config")?
            }
            _ => serde_json::from_str(&contents).context("Failed to parse JSON config")?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Directory relative paths in this config are resolved against.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let path = expand_path(path_str);
        if path.is_absolute() {
            path
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref kind) = self.driver_kind {
            settings.driver_kind = kind.clone();
        }
        if let Some(ref path) = self.executable_path {
            settings.executable_path = Some(self.resolve_path(path, base_dir));
        }
        if let Some(ref endpoint) = self.remote_endpoint {
            settings.remote_endpoint = Some(endpoint.clone());
        }
        if let Some(headless) = self.headless {
            settings.headless = headless;
        }
        if let Some(ref base_url) = self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
        if !self.api_tokens.is_empty() {
            settings.api_tokens = self.api_tokens.clone();
        }
    }
}

/// Options controlling where settings come from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file (skips discovery).
    pub config_path: Option<PathBuf>,
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> anyhow::Result<(Settings, Config)> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir);
    settings.apply_env_overrides();
    settings.validate()?;

    if let Some(ref path) = config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    Ok((settings, config))
}
