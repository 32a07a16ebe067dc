//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, ServerConfig};
use crate::dashboard::DashboardSettings;
use crate::forecast::{Forecaster, ProphetForecaster};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Forecasting backend used for every upload
    pub forecaster: Arc<dyn Forecaster>,
    /// What each render pass shows
    pub settings: DashboardSettings,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with any forecasting backend
    pub fn new(
        forecaster: Arc<dyn Forecaster>,
        settings: DashboardSettings,
        config: ApiConfig,
    ) -> Self {
        Self {
            forecaster,
            settings,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Create AppState from loaded configuration with the Prophet backend
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(ProphetForecaster::from_config(&config.forecast)),
            DashboardSettings::from_config(config),
            ApiConfig::from(&config.server),
        )
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum CSV upload size in bytes
    pub max_upload_bytes: usize,
    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for ApiConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            max_upload_bytes: config.max_upload_bytes,
            cors_origins: config.cors_origins.clone(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Body limit for upload routes; leaves headroom for multipart framing
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes.saturating_add(64 * 1024)
    }
}
