use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-user configuration directory.
const APP_DIR: &str = "beacon-devkit";

/// Environment variable that overrides `remote.api_key`.
pub const API_KEY_ENV: &str = "BEACON_API_KEY";

/// Cross-platform configuration directory manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the main configuration directory path following platform conventions:
    /// - Linux: $XDG_CONFIG_HOME/beacon-devkit or ~/.config/beacon-devkit
    /// - macOS: ~/Library/Application Support/beacon-devkit
    /// - Windows: %APPDATA%\beacon-devkit
    pub fn config_dir() -> Result<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
                Ok(PathBuf::from(xdg_config).join(APP_DIR))
            } else {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                Ok(home.join(".config").join(APP_DIR))
            }
        }

        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home.join("Library").join("Application Support").join(APP_DIR))
        }

        #[cfg(target_os = "windows")]
        {
            Ok(dirs::config_dir()
                .context("Failed to get Windows config directory")?
                .join(APP_DIR))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home.join(".beacon-devkit"))
        }
    }

    /// Get the config file path (config.toml)
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the log file path
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("beacon.log"))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
        Ok(config_dir)
    }
}

/// Configuration rejected by [`BeaconConfig::validate`] or the exporter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("serve.port must be non-zero")]
    ZeroPort,

    #[error("serve.workers must be at least 1")]
    NoWorkers,

    #[error("remote.base_url is not set; run 'beacon config --base-url <URL>'")]
    MissingBaseUrl,

    #[error("remote.base_url must start with http:// or https:// (got '{0}')")]
    InvalidBaseUrl(String),

    #[error("remote.api_key is not set; use 'beacon config --api-key <KEY>' or $BEACON_API_KEY")]
    MissingApiKey,
}

/// Remote REST backend the exporter reads revision history from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Anonymous API key sent as both `apikey` and bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Table holding one row per saved page revision
    pub table: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: None,
            api_key: None,
            table: "page_versions".to_string(),
        }
    }
}

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServeConfig {
    pub interface: IpAddr,

    pub port: u16,

    /// Directory served over HTTP and published with git
    pub root: PathBuf,

    /// Size of the request worker pool
    pub workers: usize,

    /// Link shown in the widget after a successful publish
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            interface: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            root: PathBuf::from("."),
            workers: 4,
            live_url: None,
        }
    }
}

/// Where `git push` sends commits. Both unset means plain `git push`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PublishConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Output locations for `beacon export`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub markdown_output: PathBuf,
    pub snapshot_output: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            markdown_output: PathBuf::from("beacon_edits_backup.md"),
            snapshot_output: PathBuf::from("beacon_current_state.json"),
        }
    }
}

/// Complete configuration file (`config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BeaconConfig {
    pub remote: RemoteConfig,
    pub serve: ServeConfig,
    pub publish: PublishConfig,
    pub export: ExportConfig,
}

impl BeaconConfig {
    /// Load configuration for a command run: the file at `path` (or the
    /// default location) with environment overrides applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load_from(&ConfigManager::config_file_path()?)?,
        };
        Ok(config.with_env_overrides())
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(BeaconConfig::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply `BEACON_API_KEY` on top of the file value.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.remote.api_key = Some(key);
            }
        }
        self
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Check the settings every command depends on.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.serve.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.serve.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if let Some(url) = &self.remote.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidBaseUrl(url.clone()));
            }
        }
        Ok(())
    }

    /// Base URL and API key, or the first one that is missing.
    pub fn remote_credentials(&self) -> std::result::Result<(&str, &str), ConfigError> {
        let base_url = self
            .remote
            .base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        let api_key = self
            .remote
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        Ok((base_url, api_key))
    }

    /// Absolute serve root, resolved against the current directory.
    pub fn serve_root(&self) -> Result<PathBuf> {
        let root = if self.serve.root.is_absolute() {
            self.serve.root.clone()
        } else {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(&self.serve.root)
        };
        root.canonicalize()
            .with_context(|| format!("Serve root does not exist: {}", root.display()))
    }
}
