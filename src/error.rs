//! Unified error types for the train delay checker.

use thiserror::Error;

/// Unified error type for the train delay checker.
#[derive(Error, Debug)]
pub enum CheckerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// The configured train table could not be parsed.
    #[error("invalid train table: {0}")]
    InvalidTrainTable(String),

    /// Per-train lookup error.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// HTTP client error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while fetching the status of a single train.
///
/// These never reach the caller of the handler: the checker logs them and
/// reports the train as not available.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The upstream answered with a non-success status.
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code returned.
        status: u16,
    },

    /// The autocomplete response had no origin code for the train number.
    #[error("no origin station code found for train {train_number}")]
    TrainCodeNotFound {
        /// Train number that was looked up.
        train_number: String,
    },

    /// The status document carried no delay entry.
    #[error("status document for {url} has no delay entry")]
    EmptyDelay {
        /// Requested URL.
        url: String,
    },

    /// A URL could not be built from the configured base.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to decode an upstream body.
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// HTTP transport failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, CheckerError>;
