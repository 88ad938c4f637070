//! Application settings storage
//!
//! Stores API keys and the model name in a JSON file in the config directory.
//! Environment variables take precedence over stored values, so deployments
//! can inject secrets without touching the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Global settings instance
static SETTINGS: RwLock<Option<Settings>> = RwLock::new(None);

const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub tavily_api_key: Option<String>,
    /// Model used for claim extraction and verdict judging
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            tavily_api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from disk or create default
    fn load(path: &PathBuf) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => Settings::default(),
            }
        } else {
            Settings::default()
        }
    }
}

/// Initialize settings from the config directory
pub fn init(config_dir: PathBuf) {
    let config_path = config_dir.join("settings.json");
    let settings = Settings::load(&config_path);
    *SETTINGS.write().unwrap() = Some(settings);
}

/// Default config directory for this app
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("claimcheck"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Anthropic API key (env var first, then stored setting)
pub fn get_anthropic_api_key() -> Option<String> {
    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        if !key.is_empty() {
            return Some(key);
        }
    }
    SETTINGS
        .read()
        .unwrap()
        .as_ref()
        .and_then(|s| s.anthropic_api_key.clone())
        .filter(|k| !k.is_empty())
}

/// Tavily API key (env var first, then stored setting)
pub fn get_tavily_api_key() -> Option<String> {
    if let Ok(key) = std::env::var("TAVILY_API_KEY") {
        if !key.is_empty() {
            return Some(key);
        }
    }
    SETTINGS
        .read()
        .unwrap()
        .as_ref()
        .and_then(|s| s.tavily_api_key.clone())
        .filter(|k| !k.is_empty())
}

/// Model name for API calls
pub fn get_model() -> String {
    SETTINGS
        .read()
        .unwrap()
        .as_ref()
        .map(|s| s.model.clone())
        .unwrap_or_else(default_model)
}
