//! Typed configuration document for the worker.

use fileutils_core::OperationPolicy;
use fileutils_telemetry::LogFormat;
use serde::Deserialize;

/// A configured list that may be written as a single string, a sequence, or omitted.
///
/// `null` entries inside a sequence mark positions with no value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<RawList>")]
pub struct ListField(Vec<Option<String>>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    One(String),
    Many(Vec<Option<String>>),
}

impl From<Option<RawList>> for ListField {
    fn from(raw: Option<RawList>) -> Self {
        match raw {
            None => Self::default(),
            Some(RawList::One(value)) => Self(vec![Some(value)]),
            Some(RawList::Many(values)) => Self(values),
        }
    }
}

impl ListField {
    /// Number of positions, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no positions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`; out-of-range, `null` and blank entries are all absent.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0
            .get(index)
            .and_then(Option::as_deref)
            .filter(|value| !value.trim().is_empty())
    }

    /// Raw value at `index`, keeping blank strings (used for file content).
    #[must_use]
    pub fn get_raw(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(Option::as_deref)
    }
}

impl<S: Into<String>> FromIterator<S> for ListField {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|value| Some(value.into())).collect())
    }
}

/// Logging overrides carried in the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Log level (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: Option<String>,
    /// Output format.
    pub format: Option<LogFormat>,
}

/// Full worker configuration: four parallel operation lists plus policy and logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Operation kinds, one per batch position.
    pub operation: ListField,
    /// Destination paths, one per batch position.
    pub destination: ListField,
    /// Source paths for `move` and `rename` positions.
    pub source: ListField,
    /// File payloads for `create_file` positions.
    pub content: ListField,
    /// Execution policy applied to every record.
    pub policy: OperationPolicy,
    /// Logging overrides.
    pub logging: LoggingSection,
}
