//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dashboard server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

/// Forecasting model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Width of the uncertainty interval around each estimate
    #[serde(default = "default_interval_width")]
    pub interval_width: f64,

    /// Simulated draws used to estimate the interval (0 disables intervals)
    #[serde(default = "default_uncertainty_samples")]
    pub uncertainty_samples: u32,
}

fn default_interval_width() -> f64 {
    0.8
}

fn default_uncertainty_samples() -> u32 {
    1000
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            interval_width: default_interval_width(),
            uncertainty_samples: default_uncertainty_samples(),
        }
    }
}

/// What the dashboard page shows
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    #[serde(default = "default_tail_rows")]
    pub tail_rows: usize,

    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    #[serde(default = "default_panel_height")]
    pub panel_height: u32,
}

fn default_preview_rows() -> usize {
    5
}

fn default_tail_rows() -> usize {
    5
}

fn default_chart_width() -> u32 {
    900
}

fn default_panel_height() -> u32 {
    300
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
            tail_rows: default_tail_rows(),
            chart_width: default_chart_width(),
            panel_height: default_panel_height(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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
            dirs::config_dir().map(|p| p.join("salescast").join("config.toml")),
            Some(PathBuf::from("/etc/salescast/config.toml")),
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

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparseable values are ignored
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = lookup("SALESCAST_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SALESCAST_PORT").and_then(|s| s.parse().ok()) {
            self.server.port = port;
        }
        if let Some(limit) = lookup("SALESCAST_MAX_UPLOAD_BYTES").and_then(|s| s.parse().ok()) {
            self.server.max_upload_bytes = limit;
        }

        // Forecast overrides
        if let Some(width) = lookup("SALESCAST_INTERVAL_WIDTH").and_then(|s| s.parse().ok()) {
            self.forecast.interval_width = width;
        }
        if let Some(samples) = lookup("SALESCAST_UNCERTAINTY_SAMPLES").and_then(|s| s.parse().ok())
        {
            self.forecast.uncertainty_samples = samples;
        }

        // Logging overrides
        if let Some(level) = lookup("SALESCAST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SALESCAST_LOG_FORMAT") {
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
    r#"# Salescast Configuration
#
# Environment variables override these settings:
# - SALESCAST_HOST
# - SALESCAST_PORT
# - SALESCAST_MAX_UPLOAD_BYTES
# - SALESCAST_INTERVAL_WIDTH
# - SALESCAST_UNCERTAINTY_SAMPLES
# - SALESCAST_LOG_LEVEL
# - SALESCAST_LOG_FORMAT

[server]
# Dashboard server host
host = "0.0.0.0"

# Dashboard server port
port = 8501

# Largest accepted CSV upload (bytes)
max_upload_bytes = 10485760

# Allowed CORS origins for the JSON API (empty = any)
cors_origins = []

[forecast]
# Width of the uncertainty interval (0.8 = 80%)
interval_width = 0.8

# Simulated draws used to estimate the interval
uncertainty_samples = 1000

[dashboard]
# Rows of the uploaded table shown in the preview
preview_rows = 5

# Rows of the forecast table shown under "Forecasted Data"
tail_rows = 5

# Size of the component chart (pixels)
chart_width = 900
panel_height = 300

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
