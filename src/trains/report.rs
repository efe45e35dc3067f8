//! Aggregated train status report.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Value reported for a train whose status could not be retrieved.
pub const NOT_AVAILABLE: &str = "Not available";

/// Content type of the rendered report.
pub const CONTENT_TYPE: &str = "application/json";

/// Reply marker header attached to every report response.
pub const REPLY_HEADER: &str = "X-Func-Reply";

/// Value of [`REPLY_HEADER`].
pub const REPLY_HEADER_VALUE: &str = "train-delays-handler";

/// Schedule label to delay description, serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrainStatusReport {
    statuses: BTreeMap<String, String>,
}

impl TrainStatusReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the delay of a train.
    pub fn insert(&mut self, label: &str, delay: impl Into<String>) {
        self.statuses.insert(label.to_string(), delay.into());
    }

    /// Record a train as not available.
    pub fn insert_unavailable(&mut self, label: &str) {
        self.insert(label, NOT_AVAILABLE);
    }

    /// Delay recorded for a label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.statuses.get(label).map(String::as_str)
    }

    /// Number of trains in the report.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Whether the report has no trains.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Iterate over `(label, delay)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.statuses.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as pretty JSON with a one-space indent.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b" "));
        self.serialize(&mut serializer)?;

        String::from_utf8(out).map_err(serde::ser::Error::custom)
    }
}
