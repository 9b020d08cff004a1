use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Client configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the tablekeep API
    pub api_url: ConfigValue<String>,
    /// Bearer key sent with every request
    #[serde(serialize_with = "mask_api_key")]
    pub api_key: ConfigValue<Option<String>>,
    /// Directory holding the offline cache
    pub data_dir: ConfigValue<PathBuf>,
    pub request_timeout_secs: ConfigValue<u64>,
    /// Never talk to the API
    pub offline: ConfigValue<bool>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    api_key: Option<String>,
    data_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    offline: Option<bool>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::load`] with the environment supplied by `env`.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut api_url = ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default);
        let mut api_key = ConfigValue::new(None, ConfigSource::Default);
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut request_timeout_secs =
            ConfigValue::new(DEFAULT_REQUEST_TIMEOUT_SECS, ConfigSource::Default);
        let mut offline = ConfigValue::new(false, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(url) = file_config.api_url {
                api_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(key) = file_config.api_key {
                api_key = ConfigValue::new(Some(key), ConfigSource::File);
            }
            if let Some(dir) = file_config.data_dir {
                data_dir = ConfigValue::new(resolve_relative(&path, dir), ConfigSource::File);
            }
            if let Some(secs) = file_config.request_timeout_secs {
                request_timeout_secs = ConfigValue::new(secs, ConfigSource::File);
            }
            if let Some(flag) = file_config.offline {
                offline = ConfigValue::new(flag, ConfigSource::File);
            }
        }

        if let Some(url) = env("TK_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Some(key) = env("TK_API_KEY") {
            api_key = ConfigValue::new(Some(key), ConfigSource::Environment);
        }
        if let Some(dir) = env("TK_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Some(secs) = env("TK_REQUEST_TIMEOUT") {
            let parsed = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TK_REQUEST_TIMEOUT", secs.clone()))?;
            request_timeout_secs = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Some(flag) = env("TK_OFFLINE") {
            let parsed =
                parse_flag(&flag).ok_or_else(|| ConfigError::InvalidValue("TK_OFFLINE", flag))?;
            offline = ConfigValue::new(parsed, ConfigSource::Environment);
        }

        Ok(Self {
            api_url,
            api_key,
            data_dir,
            request_timeout_secs,
            offline,
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/tablekeep/
    /// - macOS: ~/Library/Application Support/tablekeep/
    /// - Windows: %APPDATA%/tablekeep/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tablekeep")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/tablekeep/
    /// - macOS: ~/Library/Application Support/tablekeep/
    /// - Windows: %APPDATA%/tablekeep/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tablekeep")
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn resolve_relative(config_path: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_relative() {
        config_path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
    } else {
        dir
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn mask_api_key<S: Serializer>(
    key: &ConfigValue<Option<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    ConfigValue::new(key.value.as_ref().map(|_| "********"), key.source).serialize(serializer)
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value '{}' for {}", value, name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load_with_env(Some(config_path), no_env).unwrap();
        assert_eq!(config.api_url.value, DEFAULT_API_URL);
        assert_eq!(config.api_url.source, ConfigSource::Default);
        assert!(config.api_key.value.is_none());
        assert!(config.data_dir.value.ends_with("tablekeep"));
        assert_eq!(config.request_timeout_secs.value, 10);
        assert!(!config.offline.value);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_url: https://api.example.com").unwrap();
        writeln!(file, "api_key: secret").unwrap();
        writeln!(file, "data_dir: /var/lib/tablekeep").unwrap();
        writeln!(file, "request_timeout_secs: 3").unwrap();
        writeln!(file, "offline: true").unwrap();

        let config = Config::load_with_env(Some(config_path.clone()), no_env).unwrap();
        assert_eq!(config.api_url.value, "https://api.example.com");
        assert_eq!(config.api_url.source, ConfigSource::File);
        assert_eq!(config.api_key.value.as_deref(), Some("secret"));
        assert_eq!(config.data_dir.value, PathBuf::from("/var/lib/tablekeep"));
        assert_eq!(config.request_timeout_secs.value, 3);
        assert!(config.offline.value);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_data_dir_resolves_against_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "data_dir: cache\n").unwrap();

        let config = Config::load_with_env(Some(config_path), no_env).unwrap();
        assert_eq!(config.data_dir.value, temp_dir.path().join("cache"));
    }

    #[test]
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "api_url: http://fromfile:1\noffline: true\n").unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            ("TK_API_URL", "http://fromenv:2"),
            ("TK_OFFLINE", "no"),
            ("TK_REQUEST_TIMEOUT", "30"),
        ]);
        let config = Config::load_with_env(Some(config_path), |name| {
            env.get(name).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.api_url.value, "http://fromenv:2");
        assert_eq!(config.api_url.source, ConfigSource::Environment);
        assert!(!config.offline.value);
        assert_eq!(config.offline.source, ConfigSource::Environment);
        assert_eq!(config.request_timeout_secs.value, 30);
    }

    #[test]
    fn test_invalid_env_value() {
        let temp_dir = tempdir().unwrap();
        let result = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), |name| {
            (name == "TK_REQUEST_TIMEOUT").then(|| "soon".to_string())
        });
        let err = result.unwrap_err();
        assert!(err.to_string().contains("TK_REQUEST_TIMEOUT"));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load_with_env(Some(config_path), no_env);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_api_key_is_masked_in_json() {
        let temp_dir = tempdir().unwrap();
        let config = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), |name| {
            (name == "TK_API_KEY").then(|| "super-secret".to_string())
        })
        .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(json.contains("********"));
    }
}
