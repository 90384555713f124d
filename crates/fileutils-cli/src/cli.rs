//! Argument parsing, configuration selection and batch execution.

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fileutils_config::{
    CONFIG_PATH_ENV, ConfigError, ConfigResult, ListField, PluginConfig, resolve_config_path,
};
use fileutils_core::{BatchRunner, BatchSummary, FsExecutor, OperationRecord};
use fileutils_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, RunContextGuard, init_logging,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{CliError, CliResult};
use crate::output::{Payload, write_payload};

/// Parses arguments, runs the configured batch and prints the result payload.
/// Returns the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();
    let run_id = Uuid::new_v4().to_string();
    let prepared = prepare(&cli);

    let logging = logging_settings(&cli, &prepared);
    if let Err(err) = init_logging(&logging.as_config()) {
        let err =
            CliError::failure(anyhow::Error::new(err).context("failed to initialise logging"));
        eprintln!("error: {}", err.display_message());
        return finish(&Err(err), &mut io::stdout().lock());
    }
    let _context = RunContextGuard::new(&run_id);

    let outcome = prepared
        .map_err(CliError::from)
        .map(|batch| batch.execute(&run_id));
    finish(&outcome, &mut io::stdout().lock())
}

/// Render the outcome and map it to an exit code.
fn finish(outcome: &CliResult<BatchSummary>, out: &mut impl io::Write) -> i32 {
    let (payload, exit_code) = match outcome {
        Ok(summary) => (Payload::success(summary), 0),
        Err(err) => {
            error!(error = %err.display_message(), "batch could not be run");
            (Payload::error(err), err.exit_code())
        }
    };

    match write_payload(out, &payload) {
        Ok(()) => exit_code,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "fileutils",
    about = "Run declarative filesystem operations and report the outcome as JSON"
)]
struct Cli {
    #[arg(long, env = CONFIG_PATH_ENV, help = "YAML configuration file (default plugin.yaml)")]
    config: Option<PathBuf>,
    #[arg(long, num_args = 1.., help = "Operation kinds, one per batch position")]
    operation: Vec<String>,
    #[arg(long, num_args = 1.., help = "Destination paths, one per batch position")]
    destination: Vec<String>,
    #[arg(long, num_args = 1.., help = "Source paths for move/rename positions; '' skips one")]
    source: Vec<String>,
    #[arg(long, num_args = 1.., help = "File payloads for create_file positions")]
    content: Vec<String>,
    #[arg(long, env = "FILEUTILS_LOG_LEVEL")]
    log_level: Option<String>,
    #[arg(long, env = "FILEUTILS_LOG_FORMAT", value_enum)]
    log_format: Option<LogFormatArg>,
}

impl Cli {
    const fn has_lists(&self) -> bool {
        !self.operation.is_empty() || !self.destination.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Pretty => Self::Pretty,
        }
    }
}

/// Validated configuration plus the records it expands to.
#[derive(Debug)]
struct PreparedBatch {
    config: PluginConfig,
    records: Vec<OperationRecord>,
    origin: String,
}

impl PreparedBatch {
    fn execute(self, run_id: &str) -> BatchSummary {
        info!(
            origin = %self.origin,
            operations = self.records.len(),
            "executing batch"
        );
        BatchRunner::new(FsExecutor::new(self.config.policy))
            .with_run_id(run_id)
            .run(&self.records)
    }
}

/// Select the configuration source, apply command-line overrides and validate.
///
/// Nothing touches the filesystem beyond reading the configuration file.
fn prepare(cli: &Cli) -> ConfigResult<PreparedBatch> {
    let (mut config, origin) = if cli.has_lists() {
        let lists = PluginConfig::from_lists(
            list(&cli.operation),
            list(&cli.destination),
            list(&cli.source),
            list(&cli.content),
        );
        match cli.config.as_deref() {
            Some(path) => {
                let base = PluginConfig::load(path)?;
                let config = PluginConfig {
                    policy: base.policy,
                    logging: base.logging,
                    ..lists
                };
                (config, format!("command line with {}", path.display()))
            }
            None => (lists, "command line".to_string()),
        }
    } else {
        let path = resolve_config_path(cli.config.as_deref());
        let config = PluginConfig::load(&path)?;
        (config, path.display().to_string())
    };

    if let Some(level) = &cli.log_level {
        config.logging.level = Some(level.clone());
    }
    if let Some(format) = cli.log_format {
        config.logging.format = Some(format.into());
    }
    config.validate()?;

    let records = config.records()?;
    Ok(PreparedBatch {
        config,
        records,
        origin,
    })
}

fn list(values: &[String]) -> ListField {
    values.iter().cloned().collect()
}

/// Owned logging settings resolved from flags, then the document, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoggingSettings {
    level: String,
    format: LogFormat,
}

impl LoggingSettings {
    fn as_config(&self) -> LoggingConfig<'_> {
        LoggingConfig {
            level: &self.level,
            format: self.format,
            ..LoggingConfig::default()
        }
    }
}

fn logging_settings(cli: &Cli, prepared: &ConfigResult<PreparedBatch>) -> LoggingSettings {
    let section = prepared.as_ref().ok().map(|batch| &batch.config.logging);
    // Only a rejected level falls back; other configuration errors keep `--log-level`.
    let level_rejected = matches!(
        prepared,
        Err(ConfigError::InvalidField {
            field: "logging.level",
            ..
        })
    );
    let level = cli
        .log_level
        .clone()
        .filter(|_| !level_rejected)
        .or_else(|| section.and_then(|logging| logging.level.clone()))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let format = cli
        .log_format
        .map(LogFormat::from)
        .or_else(|| section.and_then(|logging| logging.format))
        .unwrap_or_else(LogFormat::infer);
    LoggingSettings { level, format }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use fileutils_test_support::scratch_dir;
    use serde_json::Value;
    use std::fs;
    use std::path::Path;

    fn parse(args: &[&str]) -> Result<Cli> {
        Ok(Cli::try_parse_from(
            std::iter::once("fileutils").chain(args.iter().copied()),
        )?)
    }

    fn manifest_dir() -> &'static Path {
        Path::new(env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn command_line_lists_become_records() -> Result<()> {
        let cli = parse(&[
            "--operation",
            "create_file",
            "rename",
            "--destination",
            "/tmp/a.txt",
            "/tmp/b.txt",
            "--source",
            "",
            "/tmp/a.txt",
            "--content",
            "hello",
        ])?;

        let prepared = prepare(&cli)?;

        assert_eq!(
            prepared.records,
            vec![
                OperationRecord::create_file("/tmp/a.txt", "hello"),
                OperationRecord::rename("/tmp/a.txt", "/tmp/b.txt"),
            ]
        );
        Ok(())
    }

    #[test]
    fn explicit_config_supplies_policy_for_command_line_lists() -> Result<()> {
        let scratch = scratch_dir(manifest_dir(), "fileutils-cli-")?;
        let config_path = scratch.path().join("plugin.yaml");
        fs::write(
            &config_path,
            "operation: [delete]\ndestination: [/ignored]\npolicy:\n  allow_destructive: false\n",
        )?;
        let config_arg = config_path.display().to_string();

        let cli = parse(&[
            "--config",
            &config_arg,
            "--operation",
            "create_dir",
            "--destination",
            "/tmp/x",
        ])?;
        let prepared = prepare(&cli)?;

        assert!(!prepared.config.policy.allow_destructive);
        assert_eq!(prepared.records, vec![OperationRecord::create_dir("/tmp/x")]);
        Ok(())
    }

    #[test]
    fn unknown_log_level_is_a_configuration_error() -> Result<()> {
        let cli = parse(&[
            "--operation",
            "create_dir",
            "--destination",
            "/tmp/x",
            "--log-level",
            "chatty",
        ])?;

        let result = prepare(&cli);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidField {
                field: "logging.level",
                ..
            })
        ));
        let settings = logging_settings(&cli, &result);
        assert_eq!(settings.level, DEFAULT_LOG_LEVEL);
        Ok(())
    }

    #[test]
    fn valid_log_level_survives_other_configuration_errors() -> Result<()> {
        let scratch = scratch_dir(manifest_dir(), "fileutils-cli-")?;
        let missing = scratch.path().join("absent.yaml").display().to_string();
        let cli = parse(&["--config", &missing, "--log-level", "debug"])?;

        let result = prepare(&cli);

        assert!(matches!(result, Err(ConfigError::Io { .. })));
        assert_eq!(logging_settings(&cli, &result).level, "debug");
        Ok(())
    }

    #[test]
    fn flags_override_the_document_logging_section() -> Result<()> {
        let cli = parse(&[
            "--operation",
            "create_dir",
            "--destination",
            "/tmp/x",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])?;
        let prepared = prepare(&cli);

        assert_eq!(
            logging_settings(&cli, &prepared),
            LoggingSettings {
                level: "debug".to_string(),
                format: LogFormat::Json,
            }
        );
        Ok(())
    }

    #[test]
    fn finish_reports_configuration_failures_with_exit_two() -> Result<()> {
        let mut out = Vec::new();
        let err = CliError::from(ConfigError::UnresolvableLengths {
            field: "source",
            len: 2,
            batch: 1,
        });

        let code = finish(&Err(err), &mut out);

        let value: Value = serde_json::from_slice(&out)?;
        assert_eq!(code, 2);
        assert_eq!(value["status"], "error");
        assert!(value["data"].is_null());
        Ok(())
    }

    #[test]
    fn executed_batch_exits_zero_even_with_failed_records() -> Result<()> {
        let scratch = scratch_dir(manifest_dir(), "fileutils-cli-")?;
        let target = scratch.path().join("made");
        let target_arg = target.display().to_string();
        let stray_arg = scratch.path().join("stray").display().to_string();
        let cli = parse(&[
            "--operation",
            "create_dir",
            "frobnicate",
            "--destination",
            &target_arg,
            &stray_arg,
        ])?;

        let summary = prepare(&cli)?.execute("test-run");
        let mut out = Vec::new();
        let code = finish(&Ok(summary), &mut out);

        let value: Value = serde_json::from_slice(&out)?;
        assert_eq!(code, 0);
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["successful_operations"], 1);
        assert_eq!(value["data"]["failed_operations"], 1);
        assert_eq!(
            value["data"]["results"][1]["error"],
            "unknown operation: frobnicate"
        );
        assert!(target.is_dir());
        Ok(())
    }
}
