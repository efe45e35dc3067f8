//! Train query and upstream payload types.

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use url::Url;

use crate::error::CheckerError;

/// Where the status of a train is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainTarget {
    /// Fully qualified `andamentoTreno` URL, fetched as-is.
    Url(Url),
    /// Bare train number, resolved to its origin station code first.
    Number(String),
}

impl TrainTarget {
    /// Parse a target from its configuration form.
    ///
    /// `http://` and `https://` values are URLs; anything else must be a
    /// train number made of ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("empty train target".to_string());
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Url::parse(raw)
                .map(TrainTarget::Url)
                .map_err(|e| format!("invalid train url {}: {}", raw, e));
        }

        if raw.chars().all(|c| c.is_ascii_digit()) {
            Ok(TrainTarget::Number(raw.to_string()))
        } else {
            Err(format!("train target {} is neither a url nor a train number", raw))
        }
    }
}

impl fmt::Display for TrainTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainTarget::Url(url) => write!(f, "{}", url),
            TrainTarget::Number(number) => write!(f, "train {}", number),
        }
    }
}

/// A scheduled train to check, keyed by a human-readable label (e.g. "18:05").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainQuery {
    /// Schedule label used as the key in the report.
    pub label: String,
    /// Status source for this train.
    pub target: TrainTarget,
}

impl TrainQuery {
    /// Create a new query.
    pub fn new(label: impl Into<String>, target: TrainTarget) -> Self {
        Self {
            label: label.into(),
            target,
        }
    }

    /// Parse a train table of the form `label=target,label=target`.
    ///
    /// Labels may contain `:` but not `=` or `,`. Order is preserved.
    pub fn parse_table(raw: &str) -> Result<Vec<TrainQuery>, CheckerError> {
        let mut queries = Vec::new();
        let mut seen = HashSet::new();

        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (label, target) = entry.split_once('=').ok_or_else(|| {
                CheckerError::InvalidTrainTable(format!("entry {} is not label=target", entry))
            })?;

            let label = label.trim();
            if label.is_empty() {
                return Err(CheckerError::InvalidTrainTable(format!(
                    "entry {} has an empty label",
                    entry
                )));
            }

            if !seen.insert(label.to_string()) {
                return Err(CheckerError::InvalidTrainTable(format!(
                    "duplicate label {}",
                    label
                )));
            }

            let target = TrainTarget::parse(target).map_err(CheckerError::InvalidTrainTable)?;
            queries.push(TrainQuery::new(label, target));
        }

        if queries.is_empty() {
            return Err(CheckerError::InvalidTrainTable(
                "no trains configured".to_string(),
            ));
        }

        Ok(queries)
    }
}

/// `andamentoTreno` status document.
///
/// Only the delay descriptions are read; the rest of the document is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainInfo {
    /// Localized delay descriptions, e.g. `["ritardo 5 min", "delay 5 min", ...]`.
    #[serde(rename = "compRitardo", alias = "CompRitardo", default)]
    pub comp_ritardo: Option<Vec<String>>,
}

impl TrainInfo {
    /// The primary delay description, if present.
    pub fn delay(&self) -> Option<&str> {
        self.comp_ritardo
            .as_ref()
            .and_then(|descriptions| descriptions.first())
            .map(String::as_str)
    }
}
