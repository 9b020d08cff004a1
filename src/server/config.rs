use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// API key entry in config
#[derive(Debug, Clone, Deserialize)]
struct ApiKeyEntry {
    key: String,
    /// Label used in logs
    #[serde(default)]
    name: Option<String>,
}

/// Config file structure
#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    api_keys: Vec<ApiKeyEntry>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,
    /// Path to config file
    pub config_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = std::env::var("TABLEKEEP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let config_path = std::env::var("TABLEKEEP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("tablekeep-server")
                    .join("config.yaml")
            });

        Self { port, config_path }
    }
}

/// Client that presented a valid key, added to request extensions after auth
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub name: String,
}

/// API key store - maps key -> client
#[derive(Debug, Clone, Default)]
pub struct ApiKeyStore {
    keys: HashMap<String, ApiClient>,
}

impl ApiKeyStore {
    /// Load API keys from config file. A missing or broken file yields an
    /// empty store, which leaves the API open.
    pub fn load(config_path: &Path) -> Self {
        let contents = match std::fs::read_to_string(config_path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    "No config file at {} ({}), API is open",
                    config_path.display(),
                    e
                );
                return Self::default();
            }
        };

        match serde_yaml::from_str::<ConfigFile>(&contents) {
            Ok(config) => {
                let store = Self::from_entries(config.api_keys);
                tracing::info!("Loaded {} API key(s)", store.len());
                store
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file: {}, API is open", e);
                Self::default()
            }
        }
    }

    fn from_entries(entries: Vec<ApiKeyEntry>) -> Self {
        let keys = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let name = entry.name.unwrap_or_else(|| format!("client-{}", i + 1));
                (entry.key, ApiClient { name })
            })
            .collect();
        Self { keys }
    }

    #[cfg(test)]
    pub fn with_key(mut self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.keys.insert(key.into(), ApiClient { name: name.into() });
        self
    }

    /// Validate an API key and return the associated client
    pub fn validate(&self, key: &str) -> Option<ApiClient> {
        self.keys.get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
