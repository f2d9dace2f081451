use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the TED talk extractor and downloader
///
/// The base and GraphQL URLs are injected into the extractor at construction
/// time so tests can point it at a local server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the TED site, no trailing slash
    pub base_url: String,

    /// GraphQL endpoint used by the primary extraction path
    pub graphql_url: String,

    /// User-Agent sent on every request
    pub user_agent: String,

    /// HTTP timeout in seconds
    pub timeout_seconds: u64,

    /// Retain raw API/HTML responses for inspection
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.ted.com".to_string(),
            graphql_url: "https://www.ted.com/graphql".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_seconds: 30,
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from the first readable config file
    pub fn load() -> Result<Self> {
        let config_paths = [
            "tedgrab.toml",
            "config/tedgrab.toml",
            "~/.config/tedgrab/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Err(anyhow!("No configuration file found"))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
