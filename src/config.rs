use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "nowplaying";
const ACCESS_TOKEN_ENV: &str = "SPOTIFY_ACCESS_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub spotify: SpotifyConfig,
    pub sync: SyncConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Spotify Web API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    /// Base URL of the Web API
    pub api_base: String,
    /// Pre-issued bearer token; the environment variable wins when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.spotify.com/v1".to_string(),
            access_token: None,
        }
    }
}

impl SpotifyConfig {
    pub fn resolve_access_token(&self) -> Option<String> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .or_else(|| self.access_token.clone())
            .filter(|token| !token.trim().is_empty())
    }
}

/// Refresh and progress simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Interval between scheduled refreshes in milliseconds
    pub poll_interval_ms: u64,
    /// Progress re-render cadence in milliseconds
    pub progress_tick_ms: u64,
    /// Drop responses that arrive after a newer one was applied
    pub discard_stale_responses: bool,
    /// Keep the simulated position within the item duration
    pub clamp_progress: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 3000,
            progress_tick_ms: 50,
            discard_stale_responses: true,
            clamp_progress: true,
        }
    }
}

/// UI customization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show the album art URL under the album name
    pub show_album_art_url: bool,
    /// Terminal input poll timeout in milliseconds
    pub input_poll_ms: u64,
    /// Minimum drag distance in cells that counts as a swipe
    pub swipe_threshold: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_album_art_url: true,
            input_poll_ms: 50,
            swipe_threshold: 6,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level, overridden by RUST_LOG
    pub level: String,
    /// Log file (empty = cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn log_path(&self) -> Result<PathBuf> {
        match self.file {
            Some(ref file) => Ok(PathBuf::from(file)),
            None => Ok(dirs::cache_dir()
                .context("Failed to get cache directory")?
                .join(APP_DIR_NAME)
                .join("nowplaying.log")),
        }
    }
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR_NAME);

        fs::create_dir_all(&config_dir)
            .context("Failed to create config directory")?;

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or create it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .context("Failed to read config file")?;

            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;

            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Generate example config content for documentation
    pub fn example_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
