use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LOCATION_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: Option<String>,
    #[serde(default = "default_location_timeout")]
    pub location_timeout_secs: u64,
    /// No timeout is applied to advisory requests unless this is set.
    #[serde(default)]
    pub advisory_timeout_secs: Option<u64>,
}

const CONFIG_FILE_PATH: &str = "config.toml";

fn default_location_timeout() -> u64 {
    DEFAULT_LOCATION_TIMEOUT_SECS
}

fn crisisguard_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".crisisguard")
}

fn crisisguard_config_json_path() -> PathBuf {
    crisisguard_dir().join("config.json")
}

fn parse_secs_env(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: None,
            location_timeout_secs: DEFAULT_LOCATION_TIMEOUT_SECS,
            advisory_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load from `~/.crisisguard/config.json`, else `./config.toml`, then
    /// apply environment overrides.
    pub fn new() -> Self {
        let mut config = Self::load_file(&crisisguard_config_json_path())
            .or_else(|| Self::load_file(Path::new(CONFIG_FILE_PATH)))
            .unwrap_or_default();
        config.apply_env();
        config
    }

    /// Parse a JSON or TOML config file; unreadable or invalid files yield `None`.
    pub fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str::<Config>(&content).map_err(|e| e.to_string()),
            _ => toml::from_str::<Config>(&content).map_err(|e| e.to_string()),
        };
        match parsed {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring invalid config file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Ok(api_base) = std::env::var("API_BASE") {
            self.api_base = Some(api_base);
        }
        if let Ok(model) = std::env::var("MODEL") {
            self.model = Some(model);
        }
        if let Some(secs) = std::env::var("LOCATION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| parse_secs_env(&v))
        {
            self.location_timeout_secs = secs;
        }
        if let Some(secs) = std::env::var("ADVISORY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| parse_secs_env(&v))
        {
            self.advisory_timeout_secs = Some(secs);
        }
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs.max(1))
    }

    pub fn advisory_timeout(&self) -> Option<Duration> {
        self.advisory_timeout_secs.map(Duration::from_secs)
    }
}
