use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
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

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MOCK_LATENCY_MS: u64 = 300;

/// Remote API settings
#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub base_url: ConfigValue<String>,
    /// Use the in-process mock instead of the HTTP API
    pub use_mock: ConfigValue<bool>,
    pub timeout_secs: ConfigValue<u64>,
    pub page_size: ConfigValue<u32>,
    pub mock_latency_ms: ConfigValue<u64>,
    /// Reload from the remote before read commands
    pub auto_refresh: ConfigValue<bool>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default),
            use_mock: ConfigValue::new(true, ConfigSource::Default),
            timeout_secs: ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default),
            page_size: ConfigValue::new(DEFAULT_PAGE_SIZE, ConfigSource::Default),
            mock_latency_ms: ConfigValue::new(DEFAULT_MOCK_LATENCY_MS, ConfigSource::Default),
            auto_refresh: ConfigValue::new(true, ConfigSource::Default),
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding snapshots and the session
    pub data_dir: ConfigValue<PathBuf>,
    pub api: ApiConfig,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    api: Option<ApiFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiFile {
    base_url: Option<String>,
    use_mock: Option<bool>,
    timeout_secs: Option<u64>,
    page_size: Option<u32>,
    mock_latency_ms: Option<u64>,
    auto_refresh: Option<bool>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut api = ApiConfig::default();
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Relative paths are resolved against the config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(file_api) = file_config.api {
                api.apply_file(file_api);
            }
        }

        if let Ok(dir) = std::env::var("PRESENCA_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("PRESENCA_API_URL") {
            api.base_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("PRESENCA_USE_MOCK") {
            let use_mock = parse_bool(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("PRESENCA_USE_MOCK".to_string(), raw))?;
            api.use_mock = ConfigValue::new(use_mock, ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            api,
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/presenca/
    /// - macOS: ~/Library/Application Support/presenca/
    /// - Windows: %APPDATA%/presenca/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("presenca")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/presenca/
    /// - macOS: ~/Library/Application Support/presenca/
    /// - Windows: %APPDATA%/presenca/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("presenca")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

impl ApiConfig {
    fn apply_file(&mut self, file: ApiFile) {
        if let Some(url) = file.base_url {
            self.base_url = ConfigValue::new(url, ConfigSource::File);
        }
        if let Some(use_mock) = file.use_mock {
            self.use_mock = ConfigValue::new(use_mock, ConfigSource::File);
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout_secs = ConfigValue::new(secs, ConfigSource::File);
        }
        if let Some(size) = file.page_size {
            self.page_size = ConfigValue::new(size, ConfigSource::File);
        }
        if let Some(ms) = file.mock_latency_ms {
            self.mock_latency_ms = ConfigValue::new(ms, ConfigSource::File);
        }
        if let Some(auto) = file.auto_refresh {
            self.auto_refresh = ConfigValue::new(auto, ConfigSource::File);
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
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
