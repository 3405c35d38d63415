//! tabload CLI.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use tabload_cli::config::resolve_config;
use tabload_cli::logging::{LogConfig, LogFormat, init_logging};
use tabload_cli::pipeline::{self, NoProgress, ProgressSink};
use tabload_db::{DbError, SqliteDestination};
use tabload_model::RunReport;
use tracing::level_filters::LevelFilter;
use tracing::{error, warn};

mod cli;
mod progress;
mod summary;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};
use crate::progress::BatchProgressBar;
use crate::summary::print_summary;

/// Every file committed.
const EXIT_OK: i32 = 0;
/// At least one file failed.
const EXIT_FILE_FAILURES: i32 = 1;
/// Nothing was loaded: bad configuration or unusable database.
const EXIT_FATAL: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_FATAL);
    }
    let exit_code = match run(&cli) {
        Ok(report) => {
            print_summary(&report);
            match write_report(&cli, &report) {
                Ok(()) if report.all_succeeded() => EXIT_OK,
                Ok(()) => EXIT_FILE_FAILURES,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    EXIT_FATAL
                }
            }
        }
        Err(error) => {
            error!(error = %format!("{error:#}"), "import aborted");
            eprintln!("error: {error:#}");
            if let Some(DbError::Connection { target, .. }) = error.downcast_ref::<DbError>() {
                print_connection_help(target);
            }
            EXIT_FATAL
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<RunReport> {
    let config = resolve_config(cli.config.as_deref(), cli.overrides())?;
    let mut dest = SqliteDestination::open(&config.db_target)?;

    let mut bar;
    let mut quiet = NoProgress;
    let progress: &mut dyn ProgressSink = if !cli.no_progress && io::stderr().is_terminal() {
        bar = BatchProgressBar::new();
        &mut bar
    } else {
        &mut quiet
    };

    let report = pipeline::run(&config, &mut dest, progress)?;
    if let Err(error) = dest.close() {
        warn!(error = %error, "closing the database failed");
    }
    Ok(report)
}

fn print_connection_help(target: &str) {
    eprintln!("The destination database {target} could not be opened. Check that:");
    eprintln!("  - the directory containing the database file exists and is writable");
    eprintln!("  - the file, if it exists, is a SQLite database");
    eprintln!("  - the file exists when --no-create (or create_if_missing = false) is set");
}

fn write_report(cli: &Cli, report: &RunReport) -> Result<()> {
    let Some(path) = cli.report_json.as_deref() else {
        return Ok(());
    };
    write_report_json(path, report)
}

fn write_report_json(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    fs::write(path, json).with_context(|| format!("write run report {}", path.display()))?;
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level(level_filter)
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_format(format)
        .with_ansi(ansi)
        .with_log_file(cli.log_file.clone())
}
