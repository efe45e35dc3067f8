//! ViaggiaTreno REST API client.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{CheckerError, LookupError};

use super::checker::StatusSource;
use super::types::{TrainInfo, TrainTarget};

/// Autocomplete line: `9638 - MILANO CENTRALE|9638-S01700`.
static TRAIN_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?P<number>\d+) - [^|\r\n]+\|\d+-(?P<code>[A-Z0-9]+)")
        .expect("valid regex")
});

/// ViaggiaTreno status client.
#[derive(Debug, Clone)]
pub struct ViaggiaTrenoClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL without trailing slash.
    base_url: String,
}

impl ViaggiaTrenoClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, CheckerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_millis(config.http_connect_timeout_ms))
            .user_agent(concat!("train-delays/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http(http, &config.viaggiatreno_base_url))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the autocomplete lookup for a train number.
    pub fn autocomplete_url(&self, train_number: &str) -> Result<Url, LookupError> {
        Ok(Url::parse(&format!(
            "{}/cercaNumeroTrenoTrenoAutocomplete/{}",
            self.base_url, train_number
        ))?)
    }

    /// URL of the status document for a train departing from `station_code`.
    pub fn status_url(&self, station_code: &str, train_number: &str) -> Result<Url, LookupError> {
        Ok(Url::parse(&format!(
            "{}/andamentoTreno/{}/{}",
            self.base_url, station_code, train_number
        ))?)
    }

    /// Resolve the origin station code of a train number.
    #[instrument(skip(self))]
    pub async fn resolve_train_code(&self, train_number: &str) -> Result<String, LookupError> {
        let url = self.autocomplete_url(train_number)?;

        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(LookupError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let code = parse_train_code(&body, train_number).ok_or_else(|| {
            LookupError::TrainCodeNotFound {
                train_number: train_number.to_string(),
            }
        })?;

        debug!(code = %code, "Resolved origin station code");
        Ok(code)
    }

    /// Fetch a status document and extract its delay description.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch_delay(&self, url: &Url) -> Result<String, LookupError> {
        let response = self.http.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(LookupError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let info: TrainInfo = response.json().await.map_err(|e| {
            LookupError::ParseError(format!("Failed to parse train status: {}", e))
        })?;

        let delay = info.delay().ok_or_else(|| LookupError::EmptyDelay {
            url: url.to_string(),
        })?;

        debug!(delay = %delay, "Retrieved delay");
        Ok(delay.to_string())
    }
}

impl StatusSource for ViaggiaTrenoClient {
    async fn train_delay(&self, target: &TrainTarget) -> Result<String, LookupError> {
        match target {
            TrainTarget::Url(url) => self.fetch_delay(url).await,
            TrainTarget::Number(number) => {
                let code = self.resolve_train_code(number).await?;
                let url = self.status_url(&code, number)?;
                self.fetch_delay(&url).await
            }
        }
    }
}

/// Find the origin station code for `train_number` in an autocomplete body.
///
/// Takes the first line whose train number matches.
pub fn parse_train_code(body: &str, train_number: &str) -> Option<String> {
    TRAIN_CODE_PATTERN
        .captures_iter(body)
        .find(|caps| &caps["number"] == train_number)
        .map(|caps| caps["code"].to_string())
}
