//! Sequential train status check.

use std::future::Future;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::LookupError;
use crate::metrics;

use super::report::TrainStatusReport;
use super::types::{TrainQuery, TrainTarget};

/// Anything that can tell the current delay of a train.
pub trait StatusSource {
    /// Fetch the delay description for a single target.
    fn train_delay(
        &self,
        target: &TrainTarget,
    ) -> impl Future<Output = Result<String, LookupError>> + Send;
}

/// Checks a fixed set of trains against a status source.
#[derive(Debug, Clone)]
pub struct TrainChecker<S> {
    source: S,
    queries: Vec<TrainQuery>,
}

impl<S: StatusSource + Sync> TrainChecker<S> {
    /// Create a new checker.
    pub fn new(source: S, queries: Vec<TrainQuery>) -> Self {
        Self { source, queries }
    }

    /// Configured trains.
    pub fn queries(&self) -> &[TrainQuery] {
        &self.queries
    }

    /// Status source reference.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Query every configured train, one after another.
    ///
    /// Never fails: a train whose lookup fails is reported as not available.
    pub async fn run(&self) -> TrainStatusReport {
        let check_start = Instant::now();
        let mut report = TrainStatusReport::new();

        for query in &self.queries {
            let start = Instant::now();
            let outcome = self.source.train_delay(&query.target).await;
            metrics::record_lookup_latency(start);

            match outcome {
                Ok(delay) => {
                    metrics::inc_lookups(true);
                    info!(label = %query.label, delay = %delay, "Train status retrieved");
                    report.insert(&query.label, delay);
                }
                Err(e) => {
                    metrics::inc_lookups(false);
                    warn!(
                        label = %query.label,
                        target = %query.target,
                        error = %e,
                        "Train status not available"
                    );
                    report.insert_unavailable(&query.label);
                }
            }
        }

        metrics::record_check(check_start);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trains::mock::MockStatusSource;
    use crate::trains::report::NOT_AVAILABLE;
    use pretty_assertions::assert_eq;

    fn queries() -> Vec<TrainQuery> {
        TrainQuery::parse_table("18:05=9638,18:10=9742,18:45=9336").unwrap()
    }

    #[tokio::test]
    async fn every_label_is_reported() {
        let source = MockStatusSource::new()
            .with_delay("9638", "ritardo 5 min")
            .with_delay("9742", "in orario")
            .with_delay("9336", "ritardo 12 min");
        let checker = TrainChecker::new(source, queries());

        let report = checker.run().await;

        assert_eq!(report.len(), 3);
        assert_eq!(report.get("18:05"), Some("ritardo 5 min"));
        assert_eq!(report.get("18:10"), Some("in orario"));
        assert_eq!(report.get("18:45"), Some("ritardo 12 min"));
    }

    #[tokio::test]
    async fn failures_are_substituted() {
        let source = MockStatusSource::new().with_delay("9742", "in orario");
        let checker = TrainChecker::new(source, queries());

        let report = checker.run().await;

        assert_eq!(report.get("18:05"), Some(NOT_AVAILABLE));
        assert_eq!(report.get("18:10"), Some("in orario"));
        assert_eq!(report.get("18:45"), Some(NOT_AVAILABLE));
    }

    #[tokio::test]
    async fn trains_are_queried_in_configured_order() {
        let source = MockStatusSource::new();
        let checker = TrainChecker::new(source, queries());

        checker.run().await;

        assert_eq!(
            checker.source().calls(),
            vec!["train 9638", "train 9742", "train 9336"]
        );
    }
}
