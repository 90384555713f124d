//! Validation helpers for configuration documents.

use fileutils_core::{OperationError, OperationPolicy};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ListField, LoggingSection};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

pub(crate) fn validate_policy(policy: &OperationPolicy) -> ConfigResult<()> {
    policy.validate().map_err(|err| match err {
        OperationError::InvalidPolicy {
            field,
            reason,
            value,
        } => ConfigError::InvalidField {
            field,
            reason,
            value,
        },
        _ => ConfigError::InvalidField {
            field: "policy",
            reason: "rejected",
            value: Some(err.to_string()),
        },
    })
}

pub(crate) fn validate_logging(logging: &LoggingSection) -> ConfigResult<()> {
    match logging.level.as_deref() {
        Some(level) if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) => {
            Err(ConfigError::InvalidField {
                field: "logging.level",
                reason: "expected one of trace, debug, info, warn, error, off",
                value: Some(level.to_string()),
            })
        }
        _ => Ok(()),
    }
}

/// Surplus entries in an optional list cannot be attributed to any operation.
pub(crate) fn check_list_len(
    field: &'static str,
    list: &ListField,
    batch: usize,
) -> ConfigResult<()> {
    if list.len() > batch {
        return Err(ConfigError::UnresolvableLengths {
            field,
            len: list.len(),
            batch,
        });
    }
    Ok(())
}
