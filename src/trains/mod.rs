//! Train status lookups against the ViaggiaTreno API.
//!
//! This module handles:
//! - Train queries and upstream payload types
//! - The ViaggiaTreno client (origin code lookup, status fetch)
//! - Sequential checking of the configured trains
//! - The aggregated JSON report
//! - Mock status source for testing

pub mod checker;
pub mod client;
pub mod mock;
pub mod report;
pub mod types;

pub use checker::{StatusSource, TrainChecker};
pub use client::ViaggiaTrenoClient;
pub use mock::MockStatusSource;
pub use report::{TrainStatusReport, NOT_AVAILABLE};
pub use types::{TrainInfo, TrainQuery, TrainTarget};
