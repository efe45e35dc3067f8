//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

use crate::error::CheckerError;
use crate::trains::TrainQuery;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Trains ===
    /// Train table: comma-separated `label=target`, target being a train
    /// number or a full status URL.
    #[serde(default = "default_trains")]
    pub trains: String,

    // === Upstream ===
    /// ViaggiaTreno REST base URL.
    #[serde(default = "default_base_url")]
    pub viaggiatreno_base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub http_connect_timeout_ms: u64,

    // === Server Configuration ===
    /// HTTP server port for the local service.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit JSON log lines.
    #[serde(default)]
    pub log_json: bool,

    /// Install the Prometheus recorder when serving.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_trains() -> String {
    "18:05=9638,18:10=9742,18:45=9336,19:00=9544".to_string()
}

fn default_base_url() -> String {
    "http://www.viaggiatreno.it/viaggiatrenonew/resteasy/viaggiatreno".to_string()
}

fn default_http_timeout_ms() -> u64 {
    5000
}

fn default_http_connect_timeout_ms() -> u64 {
    2000
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trains: default_trains(),
            viaggiatreno_base_url: default_base_url(),
            http_timeout_ms: default_http_timeout_ms(),
            http_connect_timeout_ms: default_http_connect_timeout_ms(),
            port: default_port(),
            rust_log: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        self.train_queries().map_err(|e| e.to_string())?;

        let base = Url::parse(&self.viaggiatreno_base_url)
            .map_err(|e| format!("VIAGGIATRENO_BASE_URL is not a url: {}", e))?;
        if base.cannot_be_a_base() {
            return Err("VIAGGIATRENO_BASE_URL cannot be used as a base url".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        if self.http_connect_timeout_ms == 0 {
            return Err("HTTP_CONNECT_TIMEOUT_MS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Parse the configured train table.
    pub fn train_queries(&self) -> Result<Vec<TrainQuery>, CheckerError> {
        TrainQuery::parse_table(&self.trains)
    }
}
