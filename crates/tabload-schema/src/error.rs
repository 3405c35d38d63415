//! Error types for table spec construction.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The file name has no characters usable in a table name.
    #[error("cannot derive a table name from {path}")]
    EmptyTableName { path: PathBuf },

    /// There are no columns to create.
    #[error("{path} has no columns")]
    NoColumns { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
