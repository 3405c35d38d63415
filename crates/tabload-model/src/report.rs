//! Per-file outcomes and the run-level report.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::delimiter::Delimiter;

/// Maximum length of an error message kept in a report.
pub const MAX_ERROR_MESSAGE_LEN: usize = 200;

/// Processing stage of a single source file.
///
/// Files move forward through the stages in declaration order until
/// `Committed`; any stage may drop to `Failed`, which is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStage {
    #[default]
    Pending,
    DelimiterDetected,
    Loaded,
    TableCreated,
    Inserting,
    Committed,
    Failed,
}

impl FileStage {
    /// Returns true for `Committed` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub fn can_advance_to(self, next: FileStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (_, Self::Failed) => true,
            (current, next) => next > current,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::DelimiterDetected => "delimiter_detected",
            Self::Loaded => "loaded",
            Self::TableCreated => "table_created",
            Self::Inserting => "inserting",
            Self::Committed => "committed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The file could not be read or parsed as a whole.
    FileParse,
    /// The destination table could not be (re)created.
    Schema,
    /// A batch insert failed; the file's rows were rolled back.
    Insert,
}

impl FailureKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FileParse => "parse",
            Self::Schema => "schema",
            Self::Insert => "insert",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a file failed, with the message cut to [`MAX_ERROR_MESSAGE_LEN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FileFailure {
    pub fn new(kind: FailureKind, message: impl AsRef<str>) -> Self {
        Self {
            kind,
            message: truncate_message(message.as_ref()),
        }
    }
}

/// Cuts `message` to at most [`MAX_ERROR_MESSAGE_LEN`] characters.
#[must_use]
pub fn truncate_message(message: &str) -> String {
    message.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

/// Outcome of processing one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub delimiter: Option<Delimiter>,
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub columns: usize,
    pub table: Option<String>,
    pub rows_inserted: usize,
    pub truncated_headers: usize,
    pub stage: FileStage,
    pub failure: Option<FileFailure>,
}

impl FileReport {
    /// A fresh report in the `Pending` stage.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            delimiter: None,
            rows_read: 0,
            rows_skipped: 0,
            columns: 0,
            table: None,
            rows_inserted: 0,
            truncated_headers: 0,
            stage: FileStage::Pending,
            failure: None,
        }
    }

    /// File name without directories, for display.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.display().to_string())
    }

    /// Moves to `stage` if the transition is legal; returns whether it moved.
    pub fn advance(&mut self, stage: FileStage) -> bool {
        if self.stage.can_advance_to(stage) {
            self.stage = stage;
            true
        } else {
            false
        }
    }

    /// Marks the file failed. A committed file cannot fail afterwards.
    pub fn fail(&mut self, failure: FileFailure) {
        if self.advance(FileStage::Failed) {
            self.rows_inserted = 0;
            self.failure = Some(failure);
        }
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.stage == FileStage::Committed
    }
}

/// Row and column counts of one destination table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub rows: u64,
    /// Data columns, not counting the surrogate key.
    pub columns: usize,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Destination database, for display.
    pub database: String,
    pub files: Vec<FileReport>,
    pub tables: Vec<TableSummary>,
}

impl RunReport {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    /// Number of files attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.files.len()
    }

    /// Number of files committed.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|file| file.succeeded()).count()
    }

    /// Number of files that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Summary for table `name`, if it exists in the destination.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableSummary> {
        self.tables.iter().find(|table| table.name == name)
    }
}
