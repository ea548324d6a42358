//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `NEMDATA_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sqlite: SqliteConfig,

    #[serde(default)]
    pub influx: InfluxConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Unit reference database
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteConfig {
    #[serde(default = "default_sqlite_path")]
    pub path: PathBuf,
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("/data/database.sqlite")
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_sqlite_path(),
        }
    }
}

/// InfluxDB v2 connection
#[derive(Debug, Clone, Deserialize)]
pub struct InfluxConfig {
    #[serde(default = "default_influx_url")]
    pub url: String,

    #[serde(default)]
    pub token: String,

    #[serde(default = "default_influx_org")]
    pub org: String,

    #[serde(default = "default_influx_bucket")]
    pub bucket: String,

    #[serde(default = "default_influx_timeout")]
    pub timeout_secs: u64,
}

fn default_influx_url() -> String {
    "http://localhost:8086".to_string()
}

fn default_influx_org() -> String {
    "nema".to_string()
}

fn default_influx_bucket() -> String {
    "nema_bucket".to_string()
}

fn default_influx_timeout() -> u64 {
    30
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            url: default_influx_url(),
            token: String::new(),
            org: default_influx_org(),
            bucket: default_influx_bucket(),
            timeout_secs: default_influx_timeout(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3005
}

fn default_cors_origins() -> Vec<String> {
    ["localhost", "127.0.0.1"]
        .iter()
        .flat_map(|host| [3000, 3005].map(|port| format!("http://{}:{}", host, port)))
        .collect()
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("nemdata").join("config.toml")),
            Some(PathBuf::from("/etc/nemdata/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("NEMDATA_SQLITE_PATH") {
            self.sqlite.path = PathBuf::from(path);
        }

        if let Some(url) = lookup("NEMDATA_INFLUX_URL") {
            self.influx.url = url;
        }
        if let Some(token) = lookup("NEMDATA_INFLUX_TOKEN") {
            self.influx.token = token;
        }
        if let Some(org) = lookup("NEMDATA_INFLUX_ORG") {
            self.influx.org = org;
        }
        if let Some(bucket) = lookup("NEMDATA_INFLUX_BUCKET") {
            self.influx.bucket = bucket;
        }

        if let Some(host) = lookup("NEMDATA_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("NEMDATA_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Some(level) = lookup("NEMDATA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("NEMDATA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# nemdata configuration
#
# Environment variables override these settings:
# - NEMDATA_SQLITE_PATH
# - NEMDATA_INFLUX_URL
# - NEMDATA_INFLUX_TOKEN
# - NEMDATA_INFLUX_ORG
# - NEMDATA_INFLUX_BUCKET
# - NEMDATA_API_HOST
# - NEMDATA_API_PORT
# - NEMDATA_LOG_LEVEL
# - NEMDATA_LOG_FORMAT

[sqlite]
# Unit reference database (opened read-only)
path = "/data/database.sqlite"

[influx]
# InfluxDB v2 base URL
url = "http://localhost:8086"

# API token with read access to the bucket
token = ""

# Organisation and bucket holding demand, rooftop and generation series
org = "nema"
bucket = "nema_bucket"

# Query timeout in seconds
timeout_secs = 30

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 3005

# Allowed CORS origins
cors_origins = [
    "http://localhost:3000",
    "http://localhost:3005",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3005",
]

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
