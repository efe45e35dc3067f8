//! Serverless train delay checker.
//!
//! Polls the public ViaggiaTreno API for a fixed set of scheduled trains and
//! reports their current delay as a JSON object keyed by schedule label:
//!
//! ```text
//! {
//!  "18:05": "ritardo 5 min",
//!  "18:10": "Not available"
//! }
//! ```
//!
//! Any per-train failure (network error, unknown train, malformed response)
//! is reported as `"Not available"` instead of failing the invocation.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`trains`]: Train queries, ViaggiaTreno client, checker and report
//! - [`api`]: Local HTTP service (health, trains, metrics)
//! - [`lambda`]: Serverless handler
//! - [`metrics`]: Lookup counters and latencies
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod lambda;
pub mod metrics;
pub mod trains;
pub mod utils;

pub use config::Config;
pub use error::{CheckerError, Result};
