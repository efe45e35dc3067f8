//! Mock status source for unit testing.
//!
//! Answers from an in-memory table without making network requests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::LookupError;

use super::checker::StatusSource;
use super::types::TrainTarget;

/// In-memory [`StatusSource`].
///
/// Targets are keyed by train number, or by the full URL for URL targets.
/// Unknown targets fail with [`LookupError::TrainCodeNotFound`].
#[derive(Debug, Clone, Default)]
pub struct MockStatusSource {
    /// Delay per target key.
    delays: HashMap<String, String>,
    /// Whether every lookup fails.
    fail_all: bool,
    /// Targets requested so far, in order.
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockStatusSource {
    /// Create an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `delay` for the given number or URL.
    pub fn with_delay(mut self, key: impl Into<String>, delay: impl Into<String>) -> Self {
        self.delays.insert(key.into(), delay.into());
        self
    }

    /// Fail every lookup.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Targets requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn key(target: &TrainTarget) -> String {
        match target {
            TrainTarget::Url(url) => url.to_string(),
            TrainTarget::Number(number) => number.clone(),
        }
    }
}

impl StatusSource for MockStatusSource {
    async fn train_delay(&self, target: &TrainTarget) -> Result<String, LookupError> {
        self.calls.lock().unwrap().push(target.to_string());

        if self.fail_all {
            return Err(LookupError::ParseError("Mock lookup failure".to_string()));
        }

        self.delays
            .get(&Self::key(target))
            .cloned()
            .ok_or_else(|| LookupError::TrainCodeNotFound {
                train_number: Self::key(target),
            })
    }
}
