//! Error types for source file ingestion.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while discovering or reading source files.
///
/// Row-level problems never surface here: malformed rows are skipped and
/// counted by the loader. Every variant aborts the affected file only.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// The header record could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// File is empty or holds only blank lines.
    #[error("file is empty: {path}")]
    EmptyFile { path: PathBuf },

    /// First record has no usable column names.
    #[error("no header row found in {path}")]
    NoHeaderDetected { path: PathBuf },
}

impl IngestError {
    /// Maps an `open`/`read` failure to `FileNotFound` or `FileRead`.
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
