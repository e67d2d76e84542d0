//! Configuration for the board client.
//!
//! Settings come from `~/.anonboard/config.toml`, with environment overrides
//! applied on top. They are resolved once at startup into [`Settings`]:
//!
//! ```toml
//! [api]
//! base_url = "https://board.example.com/api"
//! connect_timeout_secs = 30
//!
//! [storage]
//! identity_path = "/home/me/.local/share/anonboard/randomUserId"
//! ```
//!
//! A missing base URL is not an error here. It resolves to `api_base: None`,
//! and every remote call then fails fast with a configuration-missing condition.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Environment variable that overrides `[api] base_url`.
pub const API_URL_ENV: &str = "ANONBOARD_API_URL";

const CONFIG_DIR: &str = ".anonboard";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Deserialize)]
pub struct BoardConfig {
    pub api: Option<ApiSection>,
    pub storage: Option<StorageSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    /// Base URL every endpoint path is resolved against.
    pub base_url: Option<String>,
    /// TCP connect timeout. Default: 30.
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageSection {
    /// Override for the durable identity slot.
    pub identity_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid API base URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
}

impl BoardConfig {
    /// Load the config file from its default location. `Ok(None)` if it does not exist.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to read config: {source}");
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map(Some).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to parse config: {source}");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

/// Validated API base URL. Always ends in `/` so endpoint paths join beneath it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        Url::parse(&with_slash)
            .map(Self)
            .map_err(|source| ConfigError::InvalidBaseUrl {
                value: raw.to_string(),
                source,
            })
    }

    /// Resolve an endpoint path such as `get_threads.php` against the base.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.0.join(path.trim_start_matches('/'))
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Debug for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiBase({})", self.0)
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Effective, process-wide settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base: Option<ApiBase>,
    pub connect_timeout: Duration,
    pub identity_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            identity_path: None,
        }
    }
}

impl Settings {
    /// Combine the file config with environment overrides.
    ///
    /// `env` is injected so resolution can be exercised without touching the process environment.
    pub fn resolve(
        file: Option<&BoardConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api = file.and_then(|c| c.api.as_ref());
        let storage = file.and_then(|c| c.storage.as_ref());

        let raw_base = env(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| api.and_then(|a| a.base_url.clone()))
            .filter(|v| !v.trim().is_empty());

        let api_base = raw_base.as_deref().map(ApiBase::parse).transpose()?;
        if api_base.is_none() {
            tracing::warn!("No API base URL configured; remote calls will be refused");
        }

        let connect_timeout = api
            .and_then(|a| a.connect_timeout_secs)
            .filter(|secs| *secs > 0)
            .map_or(
                Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
                Duration::from_secs,
            );

        Ok(Self {
            api_base,
            connect_timeout,
            identity_path: storage.and_then(|s| s.identity_path.clone()),
        })
    }

    /// Read the config file and the process environment.
    pub fn from_environment() -> Result<Self, ConfigError> {
        let file = BoardConfig::load()?;
        Self::resolve(file.as_ref(), |key| std::env::var(key).ok())
    }
}
