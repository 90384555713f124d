//! Result payload rendering.
//!
//! stdout carries exactly one pretty-printed JSON document per run.

use std::io::Write;

use anyhow::Context;
use fileutils_core::BatchSummary;
use serde::Serialize;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Status {
    Success,
    Error,
}

/// Top-level document printed when the worker exits.
#[derive(Debug, Serialize)]
pub(crate) struct Payload<'a> {
    pub(crate) status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<&'a BatchSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

impl<'a> Payload<'a> {
    /// The batch ran; per-record failures live inside `data`.
    pub(crate) const fn success(summary: &'a BatchSummary) -> Self {
        Self {
            status: Status::Success,
            data: Some(summary),
            message: None,
        }
    }

    pub(crate) fn error(error: &CliError) -> Self {
        Self {
            status: Status::Error,
            data: None,
            message: Some(error.display_message()),
        }
    }
}

pub(crate) fn write_payload(out: &mut impl Write, payload: &Payload<'_>) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(payload)
        .context("failed to serialise result payload")
        .map_err(CliError::failure)?;
    writeln!(out, "{rendered}")
        .context("failed to write result payload")
        .map_err(CliError::failure)
}
