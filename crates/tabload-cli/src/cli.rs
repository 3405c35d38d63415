//! CLI argument definitions for tabload.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use tabload_cli::config::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "tabload",
    version,
    about = "Load a folder of delimited text files into database tables",
    long_about = "Load every delimited text file of a folder into its own SQLite table.\n\n\
                  Delimiters are detected per file, table and column names are sanitized,\n\
                  and each file is inserted in batches inside one transaction.\n\
                  Existing tables with the same name are replaced."
)]
pub struct Cli {
    /// Folder containing the source files (default: current directory).
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Destination SQLite database file, or `:memory:`.
    #[arg(long = "db", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Fail instead of creating the database file when it does not exist.
    #[arg(long = "no-create")]
    pub no_create: bool,

    /// Rows written per insert batch.
    #[arg(long = "batch-size", value_name = "ROWS")]
    pub batch_size: Option<usize>,

    /// Stored values are cut to this many characters.
    #[arg(long = "max-text-len", value_name = "CHARS")]
    pub max_text_len: Option<usize>,

    /// Maximum length of table and column names.
    #[arg(long = "max-ident-len", value_name = "CHARS")]
    pub max_ident_len: Option<usize>,

    /// Extension of the files to load.
    #[arg(long = "extension", value_name = "EXT")]
    pub extension: Option<String>,

    /// TOML file with loader settings; flags take precedence.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the run report as JSON to this file.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Hide the batch progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Loader settings given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_dir: self.source_dir.clone(),
            db_path: self.db.clone(),
            no_create: self.no_create,
            batch_size: self.batch_size,
            max_text_len: self.max_text_len,
            max_ident_len: self.max_ident_len,
            extension: self.extension.clone(),
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
